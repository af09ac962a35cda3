//! Process-wide, read-only curve context.
//!
//! The table is built once on first use (or on an explicit [`initialize`])
//! and never mutated afterwards, so it can be shared freely across threads.

use crate::public_key::PublicKey;
use k256::{AffinePoint, ProjectivePoint};
use once_cell::sync::Lazy;

/// Number of precomputed multiples of the generator: `G, 2G, …, 6G`.
pub const SMALL_MULTIPLES: usize = 6;

struct CurveContext {
    multiples: [PublicKey; SMALL_MULTIPLES],
}

static CONTEXT: Lazy<CurveContext> = Lazy::new(CurveContext::build);

impl CurveContext {
    #[tracing::instrument(name = "Initializing the secp256k1 curve context")]
    fn build() -> CurveContext {
        let generator = ProjectivePoint::GENERATOR;
        let mut multiples = [PublicKey::from_affine(AffinePoint::GENERATOR); SMALL_MULTIPLES];
        let mut accumulator = generator;
        for multiple in multiples.iter_mut().skip(1) {
            accumulator += generator;
            *multiple = PublicKey::from_affine(accumulator.to_affine());
        }
        CurveContext { multiples }
    }
}

/// Forces initialization. Calling it more than once is a no-op.
pub fn initialize() {
    Lazy::force(&CONTEXT);
}

pub fn generator() -> PublicKey {
    CONTEXT.multiples[0]
}

/// `k·G` for `1 <= k <= SMALL_MULTIPLES`, built by repeated addition.
pub fn multiple_of_generator(k: u8) -> Option<PublicKey> {
    let index = usize::from(k).checked_sub(1)?;
    CONTEXT.multiples.get(index).copied()
}
