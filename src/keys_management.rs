use crate::error::{Error, Result};
use crate::public_key::PublicKey;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use secrecy::zeroize::Zeroize;
use secrecy::{ExposeSecret, Secret};

/// A secp256k1 scalar `d` with `1 <= d < n`, together with its public point `d·G`.
///
/// The scalar is zeroized when the key is dropped and is never printed.
pub struct PrivateKey {
    scalar: Secret<NonZeroScalar>,
    public_key: PublicKey,
}

use std::fmt;
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Format the PrivateKey struct without including the scalar
        write!(f, "PrivateKey {{ public_key: {:?} }}", self.public_key)
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        let scalar_clone = Secret::new(*self.scalar.expose_secret());

        PrivateKey {
            scalar: scalar_clone,
            public_key: self.public_key,
        }
    }
}

impl PrivateKey {
    pub const LENGTH: usize = 32;

    fn from_nonzero(scalar: NonZeroScalar) -> PrivateKey {
        let public_key = PublicKey::from_affine((ProjectivePoint::GENERATOR * *scalar).to_affine());
        PrivateKey {
            scalar: Secret::new(scalar),
            public_key,
        }
    }

    fn from_scalar(scalar: Scalar) -> Result<PrivateKey> {
        Option::<NonZeroScalar>::from(NonZeroScalar::new(scalar))
            .map(PrivateKey::from_nonzero)
            .ok_or(Error::InvalidScalar)
    }

    /// Imports a 32-byte big-endian scalar in `[1, n)`.
    pub fn import(bytes: &[u8]) -> Result<PrivateKey> {
        let Ok(mut repr) = <[u8; 32]>::try_from(bytes) else {
            return Err(Error::IncorrectByteCountOfPrivateKey {
                got: bytes.len(),
                acceptable: vec![Self::LENGTH],
            });
        };
        let scalar = NonZeroScalar::from_repr(FieldBytes::from(repr));
        repr.zeroize();
        Option::<NonZeroScalar>::from(scalar)
            .map(PrivateKey::from_nonzero)
            .ok_or(Error::InvalidScalar)
    }

    /// Draws 32 bytes from `rng` until they form a valid scalar.
    pub fn generate_random<R>(rng: &mut R) -> PrivateKey
    where
        R: CryptoRng + RngCore,
    {
        let mut candidate = [0u8; Self::LENGTH];
        loop {
            rng.fill_bytes(&mut candidate);
            let imported = PrivateKey::import(&candidate);
            candidate.zeroize();
            match imported {
                Ok(private_key) => return private_key,
                Err(_) => tracing::warn!("Random draw was not a valid scalar, retrying"),
            }
        }
    }

    /// Generates a key from the operating system's randomness source.
    pub fn generate() -> PrivateKey {
        PrivateKey::generate_random(&mut OsRng)
    }

    /// `d·G`, computed once when the key was constructed.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Big-endian scalar bytes.
    pub fn to_bytes(&self) -> Secret<[u8; 32]> {
        Secret::new(self.as_scalar().to_bytes().into())
    }

    pub(crate) fn as_scalar(&self) -> Scalar {
        **self.scalar.expose_secret()
    }

    pub(crate) fn as_nonzero_scalar(&self) -> NonZeroScalar {
        *self.scalar.expose_secret()
    }

    /// `d + t mod n`. Fails if `t >= n` or the sum is zero.
    pub fn tweak_add(&self, tweak: &[u8]) -> Result<PrivateKey> {
        let tweak = parse_tweak(tweak)?;
        PrivateKey::from_scalar(self.as_scalar() + tweak)
    }

    /// `d · t mod n`. Fails if `t >= n` or `t` is zero.
    pub fn tweak_multiply(&self, tweak: &[u8]) -> Result<PrivateKey> {
        let tweak = parse_tweak(tweak)?;
        PrivateKey::from_scalar(self.as_scalar() * tweak)
    }
}

fn parse_tweak(tweak: &[u8]) -> Result<Scalar> {
    let repr = <[u8; 32]>::try_from(tweak)
        .map_err(|_| Error::InvalidParameter("tweak must be 32 bytes"))?;
    Option::from(Scalar::from_repr(FieldBytes::from(repr))).ok_or(Error::InvalidScalar)
}
