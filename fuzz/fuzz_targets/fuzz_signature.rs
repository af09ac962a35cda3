#![no_main]

use k1::ecdsa_signature::{EcdsaSignature, ValidationMode};
use k1::keys_management::PrivateKey;
use k1::schnorr_single_signature::SchnorrSignature;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let public_key = PrivateKey::import(&[0x11; 32]).expect("Error").public_key();
    let digest = [0x42u8; 32];

    if let Ok(signature) = EcdsaSignature::from_der(data) {
        let der = signature.to_der().expect("Error");
        assert_eq!(EcdsaSignature::from_der(&der).expect("Error"), signature);
        let _ = signature.verify(&digest, &public_key, ValidationMode::AcceptSignatureMalleability);
    }

    if let Ok(signature) = EcdsaSignature::from_compact(data) {
        let _ = signature.verify(&digest, &public_key, ValidationMode::RejectMalleability);
    }

    if let Ok(signature) = SchnorrSignature::from_bytes(data) {
        let _ = signature.verify(&digest, &public_key);
    }
});
