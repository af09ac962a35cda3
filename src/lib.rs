//! # k1
//!
//! A secp256k1 toolkit built on the RustCrypto `k256` curve arithmetic:
//! key management, public key encodings and group operations, ECDSA with
//! configurable malleability handling, BIP-340 Schnorr signatures and ECDH
//! key agreement with pluggable key derivation.
//!
//! ## Keys
//!
//! - Private keys are scalars `d` with `1 <= d < n`, held in a zeroizing
//!   [`secrecy::Secret`] and never printed.
//! - Public keys are points `P = d·G` other than the point at infinity. They
//!   import from and export to three encodings:
//!   - X-only: 32 bytes, `x`. The Y coordinate is lifted to the even root.
//!   - Compressed: 33 bytes, `02|03 || x`.
//!   - Uncompressed: 65 bytes, `04 || x || y`.
//!
//! Point addition, negation, subtraction and summation are exposed directly.
//! Any operation whose result would be the point at infinity fails with
//! [`Error::GroupOperationFailed`].
//!
//! ## ECDSA
//!
//! Signatures are `(r, s)` pairs over a 32-byte digest. Signing always
//! produces the low-S form. Verification runs under a [`ValidationMode`]:
//!
//! - `RejectMalleability` refuses `s > n/2`, matching Bitcoin consensus.
//! - `AcceptSignatureMalleability` normalizes `s` before verifying, matching
//!   generic ECDSA as exercised by Wycheproof.
//!
//! ## Schnorr
//!
//! BIP-340 signatures are 64 bytes, `R.x || s`, over arbitrary messages:
//!
//! - Signing: `k = H_nonce(d ⊕ H_aux(a) || P.x || m)`, `R = kG` with even Y,
//!   `s = k + H_challenge(R.x || P.x || m)·d`
//! - Verification: `sG - eP` has even Y and X coordinate `R.x`
//!
//! ## Key agreement
//!
//! [`key_agreement::agree`] computes `d·Q` and passes the compressed point
//! through a [`key_agreement::KeyDerivation`] hook.
//!
//! ## Logging
//!
//! Operations emit `tracing` spans. Secrets are never recorded. The
//! `telemetry` feature provides a bunyan JSON subscriber.

pub mod context;
pub mod ecdsa_signature;
pub mod error;
pub mod format;
pub mod key_agreement;
pub mod keys_management;
pub mod public_key;
pub mod rand_nonce;
pub mod schnorr_single_signature;

#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::ecdsa_signature::{EcdsaSignature, ValidationMode};
pub use crate::error::{Error, InternalFailure, Result};
pub use crate::format::Format;
pub use crate::keys_management::PrivateKey;
pub use crate::public_key::PublicKey;
pub use crate::rand_nonce::AuxiliaryRandomness;
pub use crate::schnorr_single_signature::SchnorrSignature;
