//! Elliptic Curve Diffie-Hellman over secp256k1.
//!
//! The shared point `d·Q` is encoded in compressed form and handed to a
//! [`KeyDerivation`] hook. The result lives in a [`SharedSecret`], which
//! zeroizes its buffer when dropped.

use crate::error::{InternalFailure, Result};
use crate::format::Format;
use crate::keys_management::PrivateKey;
use crate::public_key::PublicKey;
use secrecy::zeroize::Zeroize;
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

/// Length of the raw agreement: the compressed shared point.
pub const RAW_AGREEMENT_LENGTH: usize = 33;

/// Turns the raw agreement bytes into key material of a declared length.
pub trait KeyDerivation {
    fn output_len(&self) -> usize;

    fn derive(&self, raw_agreement: &[u8; RAW_AGREEMENT_LENGTH]) -> Vec<u8>;
}

/// Identity hook: the 33-byte compressed shared point.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCompressed;

impl KeyDerivation for RawCompressed {
    fn output_len(&self) -> usize {
        RAW_AGREEMENT_LENGTH
    }

    fn derive(&self, raw_agreement: &[u8; RAW_AGREEMENT_LENGTH]) -> Vec<u8> {
        raw_agreement.to_vec()
    }
}

/// X coordinate of the shared point.
#[derive(Debug, Clone, Copy, Default)]
pub struct XCoordinate;

impl KeyDerivation for XCoordinate {
    fn output_len(&self) -> usize {
        32
    }

    fn derive(&self, raw_agreement: &[u8; RAW_AGREEMENT_LENGTH]) -> Vec<u8> {
        raw_agreement[1..].to_vec()
    }
}

/// SHA-256 of the compressed shared point, as libsecp256k1 does by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Compressed;

impl KeyDerivation for Sha256Compressed {
    fn output_len(&self) -> usize {
        32
    }

    fn derive(&self, raw_agreement: &[u8; RAW_AGREEMENT_LENGTH]) -> Vec<u8> {
        Sha256::digest(raw_agreement).to_vec()
    }
}

/// A caller-supplied derivation function with a fixed output length.
pub struct CustomKdf<F> {
    output_len: usize,
    derive: F,
}

impl<F> CustomKdf<F>
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    pub fn new(output_len: usize, derive: F) -> CustomKdf<F> {
        CustomKdf { output_len, derive }
    }
}

impl<F> KeyDerivation for CustomKdf<F>
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    fn output_len(&self) -> usize {
        self.output_len
    }

    fn derive(&self, raw_agreement: &[u8; RAW_AGREEMENT_LENGTH]) -> Vec<u8> {
        (self.derive)(&raw_agreement[..])
    }
}

/// Key agreement output, owned by the caller and zeroized on drop.
pub struct SharedSecret {
    bytes: Secret<Vec<u8>>,
}

use std::fmt;
impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SharedSecret {{ len: {} }}", self.len())
    }
}

impl SharedSecret {
    pub fn expose_secret(&self) -> &[u8] {
        self.bytes.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.bytes.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes `private_key · other` and derives the shared secret from it.
///
/// Fails with [`InternalFailure::SharedSecretIncorrectSize`] when the hook
/// returns a buffer whose length differs from its `output_len`.
#[tracing::instrument(name = "Deriving the ECDH shared secret", skip(private_key, kdf))]
pub fn agree<K>(private_key: &PrivateKey, other: &PublicKey, kdf: &K) -> Result<SharedSecret>
where
    K: KeyDerivation,
{
    let shared_point = other.scalar_multiply(private_key);
    let mut compressed = shared_point.serialize(Format::Compressed);
    let mut raw_agreement = [0u8; RAW_AGREEMENT_LENGTH];
    raw_agreement.copy_from_slice(&compressed);
    compressed.zeroize();

    let mut derived = kdf.derive(&raw_agreement);
    raw_agreement.zeroize();

    let expected = kdf.output_len();
    if derived.len() != expected {
        let got = derived.len();
        derived.zeroize();
        tracing::warn!(expected, got, "Key derivation returned the wrong length");
        return Err(InternalFailure::SharedSecretIncorrectSize { expected, got }.into());
    }
    Ok(SharedSecret {
        bytes: Secret::new(derived),
    })
}

/// [`agree`] over encoded inputs; import failures surface as
/// `InvalidScalar`, `InvalidPoint` or a byte-count error.
pub fn agree_encoded<K>(private_key: &[u8], other: &[u8], kdf: &K) -> Result<SharedSecret>
where
    K: KeyDerivation,
{
    let private_key = PrivateKey::import(private_key)?;
    let other = PublicKey::import(other, None)?;
    agree(&private_key, &other, kdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::multiple_of_generator;
    use crate::error::Error;
    use hex_literal::hex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn be(k: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = k;
        bytes
    }

    fn three_g() -> PublicKey {
        multiple_of_generator(3).unwrap()
    }

    #[test]
    fn raw_agreement_is_the_compressed_product() {
        let two = PrivateKey::import(&be(2)).unwrap();
        let secret = agree(&two, &three_g(), &RawCompressed).unwrap();
        assert_eq!(
            secret.expose_secret(),
            hex!("03fff97bd5755eeea420453a14355235d382f6472f8568a18b2f057a1460297556")
        );
    }

    #[test]
    fn builtin_derivations() {
        let two = PrivateKey::import(&be(2)).unwrap();
        let x = agree(&two, &three_g(), &XCoordinate).unwrap();
        assert_eq!(x.expose_secret(), multiple_of_generator(6).unwrap().x_only());

        let hashed = agree(&two, &three_g(), &Sha256Compressed).unwrap();
        assert_eq!(
            hashed.expose_secret(),
            hex!("c7d9ba2fa1496c81be20038e5c608f2fd5d0246d8643783730df6c2bbb855cb2")
        );
    }

    #[test]
    fn both_parties_agree() {
        let mut rng = StdRng::seed_from_u64(99);
        let alice = PrivateKey::generate_random(&mut rng);
        let bob = PrivateKey::generate_random(&mut rng);

        let alice_shared = agree(&alice, &bob.public_key(), &Sha256Compressed).unwrap();
        let bob_shared = agree(&bob, &alice.public_key(), &Sha256Compressed).unwrap();
        assert_eq!(alice_shared.expose_secret(), bob_shared.expose_secret());
    }

    #[test]
    fn custom_kdf() {
        let two = PrivateKey::import(&be(2)).unwrap();
        let truncate = CustomKdf::new(16, |raw: &[u8]| raw[1..17].to_vec());
        let secret = agree(&two, &three_g(), &truncate).unwrap();
        assert_eq!(secret.len(), 16);
        assert_eq!(secret.expose_secret(), &multiple_of_generator(6).unwrap().x_only()[..16]);
    }

    #[test]
    fn kdf_with_wrong_length_is_an_internal_failure() {
        let two = PrivateKey::import(&be(2)).unwrap();
        let lying = CustomKdf::new(16, |raw: &[u8]| Sha256::digest(raw).to_vec());
        assert_eq!(
            agree(&two, &three_g(), &lying).unwrap_err(),
            Error::InternalFailure(InternalFailure::SharedSecretIncorrectSize {
                expected: 16,
                got: 32,
            })
        );
    }

    #[test]
    fn encoded_inputs_are_validated() {
        let point = three_g().serialize(Format::Compressed);
        assert_eq!(
            agree_encoded(&[0u8; 32], &point, &RawCompressed).unwrap_err(),
            Error::InvalidScalar
        );
        let mut not_a_point = point.clone();
        not_a_point[0] = 0x07;
        assert_eq!(
            agree_encoded(&be(2), &not_a_point, &RawCompressed).unwrap_err(),
            Error::InvalidPoint
        );
        not_a_point[0] = 0x05;
        assert_eq!(
            agree_encoded(&be(2), &not_a_point, &RawCompressed).unwrap_err(),
            Error::InvalidPoint
        );
        assert!(agree_encoded(&be(2), &point, &RawCompressed).is_ok());
    }

    #[test]
    fn debug_does_not_print_the_secret() {
        let two = PrivateKey::import(&be(2)).unwrap();
        let secret = agree(&two, &three_g(), &RawCompressed).unwrap();
        assert_eq!(format!("{:?}", secret), "SharedSecret { len: 33 }");
        assert!(!secret.is_empty());
    }
}
