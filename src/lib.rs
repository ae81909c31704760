//! ECDSA nonce reuse recovery library
//!
//! Recovers a private key from two signatures that share a nonce, then the
//! nonce behind every signature of a corpus, for any curve exposing its
//! group order and base point multiplication.

pub mod curve;
pub mod error;
pub mod hint;
pub mod logging;
pub mod math;
pub mod provider;
pub mod recover;
pub mod report;
pub mod signature;

pub use curve::{Curve, Secp256k1};
pub use error::RecoveryError;
pub use hint::{LinearRecurrenceHint, NonceHint};
pub use recover::{
    recover_batch, recover_nonce, recover_private_key, RecoveryConfig, RecoveryResult,
};
pub use signature::{Signature, SignatureInput};
