//! Error taxonomy of the recovery core

use thiserror::Error;

/// Failure of a key or nonce recovery step.
///
/// Every variant is deterministic: retrying with the same inputs yields the
/// same error. Callers choose a different pair, key or probe budget instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("identical message hash: z values of the pair are equal, key is not recoverable")]
    IdenticalMessageHash,

    #[error("degenerate delta: s values of the pair are equal after low-s normalization")]
    DegenerateDelta,

    #[error("no modular inverse exists modulo the group order")]
    NoModularInverse,

    #[error("recovered nonce does not reproduce r: wrong key or malformed signature")]
    InvalidKeyOrSignature,

    #[error("nonce not found within {probes} probes")]
    NonceNotFound { probes: usize },

    #[error("need two signatures at indices {first} and {second}, corpus has {len}")]
    InsufficientSignatures {
        first: usize,
        second: usize,
        len: usize,
    },
}
