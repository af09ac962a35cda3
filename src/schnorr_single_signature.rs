use crate::error::{Error, InternalFailure, Result};
use crate::format::Format;
use crate::keys_management::PrivateKey;
use crate::public_key::PublicKey;
use crate::rand_nonce::AuxiliaryRandomness;
use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, Scalar, U256};
use rand::{CryptoRng, RngCore};
use secrecy::zeroize::Zeroize;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const AUX_TAG: &[u8] = b"BIP0340/aux";
const NONCE_TAG: &[u8] = b"BIP0340/nonce";
const CHALLENGE_TAG: &[u8] = b"BIP0340/challenge";

/// BIP-340 Schnorr signature structure: (R.x, s).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct SchnorrSignature {
    pub cap_r_x: [u8; 32],
    pub s: [u8; 32],
}

impl SchnorrSignature {
    pub const LENGTH: usize = 64;

    /// Signs a message over the x-only public key of `private_key`:
    /// (R.x, s) = (R.x, k + H(R.x || P.x || m) d)
    ///
    /// # Arguments
    ///
    /// * `message` - The message to be signed, of any length.
    /// * `private_key` - The signing key. It is negated internally when its
    ///   public point has an odd Y coordinate.
    /// * `aux` - Fresh auxiliary randomness mixed into the nonce.
    ///
    /// # Returns
    ///
    /// A SchnorrSignature struct containing `cap_r_x` and `s`.
    ///
    #[tracing::instrument(name = "Signing the message with Schnorr signature", skip_all)]
    pub fn sign(
        message: &[u8],
        private_key: &PrivateKey,
        aux: &AuxiliaryRandomness,
    ) -> Result<SchnorrSignature> {
        let public_key = private_key.public_key();
        let mut d = if public_key.has_even_y() {
            private_key.as_scalar()
        } else {
            -private_key.as_scalar()
        };
        let p_x = public_key.x_only();

        let mut d_bytes: [u8; 32] = d.to_bytes().into();
        let mut t: [u8; 32] = tagged_hash(AUX_TAG)
            .chain_update(aux.bytes.expose_secret())
            .finalize()
            .into();
        for (t_byte, d_byte) in t.iter_mut().zip(d_bytes.iter()) {
            *t_byte ^= d_byte;
        }
        d_bytes.zeroize();
        let mut rand: [u8; 32] = tagged_hash(NONCE_TAG)
            .chain_update(t)
            .chain_update(p_x)
            .chain_update(message)
            .finalize()
            .into();
        t.zeroize();

        let mut nonce = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(rand));
        rand.zeroize();
        let non_zero = Option::<NonZeroScalar>::from(NonZeroScalar::new(nonce));
        nonce.zeroize();
        let Some(non_zero) = non_zero else {
            d.zeroize();
            return Err(InternalFailure::ZeroNonce.into());
        };
        let cap_r = (ProjectivePoint::GENERATOR * *non_zero).to_affine();
        let mut k = if bool::from(cap_r.y_is_odd()) { -*non_zero } else { *non_zero };
        let cap_r_x: [u8; 32] = cap_r.x().into();

        let e = calc_challenge(&cap_r_x, &p_x, message);
        let mut s = k + e * d;
        k.zeroize();
        d.zeroize();
        let s_bytes: [u8; 32] = s.to_bytes().into();
        s.zeroize();

        Ok(SchnorrSignature {
            cap_r_x,
            s: s_bytes,
        })
    }

    /// Signs with auxiliary randomness drawn from `rng`.
    pub fn sign_with_rng<R>(message: &[u8], private_key: &PrivateKey, rng: R) -> Result<SchnorrSignature>
    where
        R: CryptoRng + RngCore,
    {
        let aux = AuxiliaryRandomness::new_rand(rng);
        SchnorrSignature::sign(message, private_key, &aux)
    }

    /// Verifies a Schnorr signature against the x-only form of `public_key`:
    /// sG = R + H(R.x || P.x || m)P, with R required to have an even Y.
    ///
    /// # Returns
    ///
    /// `true` if the signature is valid, `false` otherwise.
    ///
    #[tracing::instrument(name = "Verifying the Schnorr signature", skip(self, message))]
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        let even_key = if public_key.has_even_y() {
            *public_key
        } else {
            public_key.negate()
        };
        let Some(s) = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(self.s))) else {
            tracing::debug!("Signature s is not below the curve order");
            return false;
        };

        let e = calc_challenge(&self.cap_r_x, &even_key.x_only(), message);
        let cap_r = ProjectivePoint::GENERATOR * s - even_key.to_projective() * e;
        if bool::from(cap_r.is_identity()) {
            return false;
        }
        let cap_r = cap_r.to_affine();
        !bool::from(cap_r.y_is_odd()) && <[u8; 32]>::from(cap_r.x()) == self.cap_r_x
    }

    /// Verifies encoded inputs. Only wrong lengths and keys that are not
    /// x-coordinates of curve points are errors.
    pub fn verify_raw(signature: &[u8], message: &[u8], x_only_public_key: &[u8]) -> Result<bool> {
        let signature = SchnorrSignature::from_bytes(signature)?;
        let public_key = PublicKey::import(x_only_public_key, Some(Format::XOnly))?;
        Ok(signature.verify(message, &public_key))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<SchnorrSignature> {
        if bytes.len() != Self::LENGTH {
            return Err(Error::MalformedSignature("Schnorr signature must be 64 bytes"));
        }
        let mut cap_r_x = [0u8; 32];
        let mut s = [0u8; 32];
        cap_r_x.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(SchnorrSignature { cap_r_x, s })
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[..32].copy_from_slice(&self.cap_r_x);
        bytes[32..].copy_from_slice(&self.s);
        bytes
    }
}

/// SHA-256 pre-seeded with `SHA256(tag) || SHA256(tag)`.
fn tagged_hash(tag: &[u8]) -> Sha256 {
    let tag_hash = Sha256::digest(tag);
    Sha256::new().chain_update(tag_hash).chain_update(tag_hash)
}

/// Calculates the challenge H(R.x || P.x || m) reduced modulo the curve order.
#[tracing::instrument(name = "Calculating the BIP-340 challenge", skip_all)]
fn calc_challenge(cap_r_x: &[u8; 32], p_x: &[u8; 32], message: &[u8]) -> Scalar {
    let hash = tagged_hash(CHALLENGE_TAG)
        .chain_update(cap_r_x)
        .chain_update(p_x)
        .chain_update(message)
        .finalize();
    <Scalar as Reduce<U256>>::reduce_bytes(&hash)
}

impl TryFrom<Vec<u8>> for SchnorrSignature {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<SchnorrSignature> {
        SchnorrSignature::from_bytes(&bytes)
    }
}

impl From<SchnorrSignature> for Vec<u8> {
    fn from(signature: SchnorrSignature) -> Vec<u8> {
        signature.to_bytes().to_vec()
    }
}
