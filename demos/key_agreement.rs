use k1::key_agreement::{agree, Sha256Compressed};
use k1::keys_management::PrivateKey;
use rand_core::OsRng;

fn main() {
    // Each party creates a key and publishes the public half
    let alice = PrivateKey::generate_random(&mut OsRng);
    let bob = PrivateKey::generate_random(&mut OsRng);

    // Both sides derive the secret from their own key and the peer's public key
    let alice_shared =
        agree(&alice, &bob.public_key(), &Sha256Compressed).expect("Key agreement failed");
    let bob_shared =
        agree(&bob, &alice.public_key(), &Sha256Compressed).expect("Key agreement failed");

    let result = alice_shared.expose_secret() == bob_shared.expose_secret();
    println!("Shared secrets match: {:?}", result);
    assert!(result);
}
