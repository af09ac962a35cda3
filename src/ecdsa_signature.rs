use crate::error::{Error, InternalFailure, Result};
use crate::keys_management::PrivateKey;
use crate::public_key::PublicKey;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// How verification treats the high-s twin `(r, n - s)` of a signature.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Only the low-s form verifies (BIP-62 / BIP-146 behaviour).
    #[default]
    RejectMalleability,
    /// Both `s` and `n - s` verify.
    AcceptSignatureMalleability,
}

/// ECDSA signature `(r, s)` as two 32-byte big-endian integers.
///
/// Decoding keeps `s` as given so that [`ValidationMode`] can decide
/// whether a high-s signature is acceptable; [`EcdsaSignature::sign`]
/// always produces the low-s form.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct EcdsaSignature {
    r: [u8; 32],
    s: [u8; 32],
}

impl EcdsaSignature {
    pub const COMPACT_LENGTH: usize = 64;

    fn from_k256(signature: &Signature) -> EcdsaSignature {
        let (r, s) = signature.split_bytes();
        EcdsaSignature {
            r: r.into(),
            s: s.into(),
        }
    }

    /// `None` when `r` or `s` is zero or not below the curve order.
    fn to_k256(self) -> Option<Signature> {
        Signature::from_scalars(self.r, self.s).ok()
    }

    /// Signs a 32-byte digest with an RFC 6979 nonce and normalizes `s` to the low half.
    #[tracing::instrument(name = "Signing the digest with ECDSA", skip(digest, private_key))]
    pub fn sign(digest: &[u8; 32], private_key: &PrivateKey) -> Result<EcdsaSignature> {
        let signing_key = SigningKey::from(private_key.as_nonzero_scalar());
        let signature: Signature = signing_key
            .sign_prehash(digest)
            .map_err(|_| InternalFailure::SigningFailed)?;
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(EcdsaSignature::from_k256(&signature))
    }

    /// Hashes `message` with SHA-256 and signs the digest.
    pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Result<EcdsaSignature> {
        EcdsaSignature::sign(&Sha256::digest(message).into(), private_key)
    }

    /// Verifies the signature over a 32-byte digest.
    ///
    /// Returns `false` rather than an error for out-of-range `r` or `s`,
    /// for a high `s` under [`ValidationMode::RejectMalleability`], and for
    /// any cryptographic mismatch.
    #[tracing::instrument(name = "Verifying the ECDSA signature", skip(self, digest))]
    pub fn verify(&self, digest: &[u8; 32], public_key: &PublicKey, mode: ValidationMode) -> bool {
        let Some(signature) = self.to_k256() else {
            tracing::debug!("Signature scalars are out of range");
            return false;
        };
        let signature = match (signature.normalize_s(), mode) {
            (None, _) => signature,
            (Some(normalized), ValidationMode::AcceptSignatureMalleability) => normalized,
            (Some(_), ValidationMode::RejectMalleability) => {
                tracing::debug!("Rejected malleable high-s signature");
                return false;
            }
        };
        let Ok(verifying_key) = VerifyingKey::from_affine(public_key.to_projective().to_affine())
        else {
            return false;
        };
        verifying_key.verify_prehash(digest, &signature).is_ok()
    }

    /// Hashes `message` with SHA-256 and verifies the digest.
    pub fn verify_message(&self, message: &[u8], public_key: &PublicKey, mode: ValidationMode) -> bool {
        self.verify(&Sha256::digest(message).into(), public_key, mode)
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// `true` iff `s` is in `[1, n/2]` and `r` is in range.
    pub fn is_low_s(&self) -> bool {
        self.to_k256()
            .is_some_and(|signature| signature.normalize_s().is_none())
    }

    /// The low-s twin of this signature (itself if already low).
    pub fn normalize_s(&self) -> Result<EcdsaSignature> {
        let signature = self
            .to_k256()
            .ok_or(Error::MalformedSignature("r or s is out of range"))?;
        let normalized = signature.normalize_s().unwrap_or(signature);
        Ok(EcdsaSignature::from_k256(&normalized))
    }

    /// Decodes `r || s`. Only the length is checked here; range checks
    /// happen during verification.
    pub fn from_compact(bytes: &[u8]) -> Result<EcdsaSignature> {
        if bytes.len() != Self::COMPACT_LENGTH {
            return Err(Error::MalformedSignature(
                "compact ECDSA signature must be 64 bytes",
            ));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Ok(EcdsaSignature { r, s })
    }

    pub fn to_compact(&self) -> [u8; 64] {
        let mut compact = [0u8; Self::COMPACT_LENGTH];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        compact
    }

    /// Strict ASN.1 DER decoding: wrong tags, non-minimal lengths or
    /// integers, trailing bytes and zero or oversized scalars are rejected.
    pub fn from_der(bytes: &[u8]) -> Result<EcdsaSignature> {
        let signature = Signature::from_der(bytes).map_err(|_| {
            tracing::debug!(len = bytes.len(), "Rejected non-canonical DER signature");
            Error::MalformedSignature("not a canonical DER ECDSA signature")
        })?;
        Ok(EcdsaSignature::from_k256(&signature))
    }

    pub fn to_der(&self) -> Result<Vec<u8>> {
        let signature = self
            .to_k256()
            .ok_or(Error::MalformedSignature("r or s is out of range"))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}

use std::fmt;
impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EcdsaSignature({})", hex::encode(self.to_compact()))
    }
}

impl TryFrom<Vec<u8>> for EcdsaSignature {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<EcdsaSignature> {
        EcdsaSignature::from_compact(&bytes)
    }
}

impl From<EcdsaSignature> for Vec<u8> {
    fn from(signature: EcdsaSignature) -> Vec<u8> {
        signature.to_compact().to_vec()
    }
}
