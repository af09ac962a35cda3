#![no_main]

use k1::format::Format;
use k1::public_key::PublicKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(public_key) = PublicKey::import(data, None) else {
        return;
    };

    // Every accepted key re-imports from each of its encodings
    for format in Format::ALL {
        let encoded = public_key.serialize(format);
        let reimported = PublicKey::import(&encoded, Some(format)).expect("Error");
        if format != Format::XOnly {
            assert_eq!(reimported, public_key);
        }
    }

    // P + (-P) is the point at infinity
    assert!(public_key.subtract(&public_key).is_err());
});
