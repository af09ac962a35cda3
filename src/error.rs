use thiserror::Error;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by key import, group operations and signature codecs.
///
/// A well-formed signature that simply does not verify is *not* an error:
/// verification returns `false` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("incorrect byte count of public key, got {got}, acceptable lengths: {acceptable:?}")]
    IncorrectByteCountOfPublicKey {
        got: usize,
        acceptable: Vec<usize>,
    },

    #[error("incorrect byte count of private key, got {got}, acceptable lengths: {acceptable:?}")]
    IncorrectByteCountOfPrivateKey {
        got: usize,
        acceptable: Vec<usize>,
    },

    #[error("bytes do not encode a point on secp256k1")]
    InvalidPoint,

    #[error("scalar is zero or not below the curve order")]
    InvalidScalar,

    /// The result would be the point at infinity, which has no encoding.
    #[error("group operation resulted in the point at infinity")]
    GroupOperationFailed,

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("malformed signature: {0}")]
    MalformedSignature(&'static str),

    #[error("internal failure: {0}")]
    InternalFailure(InternalFailure),
}

/// Invariants the curve arithmetic layer is trusted to uphold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InternalFailure {
    #[error("shared secret has {got} bytes, expected {expected}")]
    SharedSecretIncorrectSize { expected: usize, got: usize },

    #[error("derived nonce is zero")]
    ZeroNonce,

    #[error("ECDSA signing primitive failed")]
    SigningFailed,
}

impl From<InternalFailure> for Error {
    fn from(failure: InternalFailure) -> Self {
        Error::InternalFailure(failure)
    }
}
