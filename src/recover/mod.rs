//! Key and nonce recovery

pub mod batch;
pub mod key;
pub mod nonce;

pub use batch::{recover_batch, recover_nonces, RecoveryConfig, RecoveryResult};
pub use key::recover_private_key;
pub use nonce::{recover_nonce, recover_nonce_bounded, search_nonce, MAX_PROBES};
