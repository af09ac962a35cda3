use k1::ecdsa_signature::{EcdsaSignature, ValidationMode};
use k1::keys_management::PrivateKey;
use k1::schnorr_single_signature::SchnorrSignature;
use rand_core::OsRng;

fn main() {
    let csprng = OsRng;
    // Create the signer's key
    let private_key = PrivateKey::generate_random(&mut OsRng);
    let public_key = private_key.public_key();

    // Message to be signed
    let message = b"Hello World";

    // Schnorr signature generation and verification
    let schnorr = SchnorrSignature::sign_with_rng(message, &private_key, csprng)
        .expect("BIP-340 signing failed");
    let result = schnorr.verify(message, &public_key);
    println!("Schnorr verification result: {:?}", result);
    assert!(result);

    // ECDSA signature generation and verification
    let ecdsa = EcdsaSignature::sign_message(message, &private_key).expect("ECDSA signing failed");
    let result = ecdsa.verify_message(message, &public_key, ValidationMode::RejectMalleability);
    println!("ECDSA verification result: {:?}", result);
    assert!(result);

    let der = ecdsa.to_der().expect("signature is in range");
    println!("ECDSA signature (DER): {}", hex::encode(der));
}
