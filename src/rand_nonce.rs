use rand::{CryptoRng, RngCore};
use secrecy::{ExposeSecret, Secret};

/// 32 bytes of auxiliary randomness mixed into a Schnorr nonce.
pub struct AuxiliaryRandomness {
    pub(crate) bytes: Secret<[u8; 32]>,
}

use std::fmt;
impl fmt::Debug for AuxiliaryRandomness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AuxiliaryRandomness {{ .. }}")
    }
}

impl Clone for AuxiliaryRandomness {
    fn clone(&self) -> Self {
        AuxiliaryRandomness {
            bytes: Secret::new(*self.bytes.expose_secret()),
        }
    }
}

impl AuxiliaryRandomness {
    pub fn new_rand<R>(mut rng: R) -> AuxiliaryRandomness
    where
        R: CryptoRng + RngCore,
    {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        AuxiliaryRandomness {
            bytes: Secret::new(bytes),
        }
    }

    /// Caller-provided randomness, e.g. from a test vector.
    pub fn from_bytes(bytes: [u8; 32]) -> AuxiliaryRandomness {
        AuxiliaryRandomness {
            bytes: Secret::new(bytes),
        }
    }

    /// All-zero randomness; signing stays deterministic.
    pub fn zero() -> AuxiliaryRandomness {
        AuxiliaryRandomness::from_bytes([0u8; 32])
    }
}
