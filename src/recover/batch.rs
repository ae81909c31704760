//! Corpus-level recovery with partial-failure semantics

use super::key::recover_private_key;
use super::nonce::{recover_nonce_bounded, search_nonce, MAX_PROBES};
use crate::curve::Curve;
use crate::error::RecoveryError;
use crate::hint::NonceHint;
use crate::signature::{reference_pair, Signature};
use num_bigint::BigUint;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Pair fed to key recovery. Picked from the corpus when `None`.
    pub pair: Option<(usize, usize)>,
    pub max_probes: usize,
    /// Skip the closed form and only run the bounded search.
    pub force_search: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            pair: None,
            max_probes: MAX_PROBES,
            force_search: false,
        }
    }
}

/// Outcome of a corpus run. `nonces[i]` belongs to the `i`-th input
/// signature and is `None` when its recovery failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    pub private_key: Option<BigUint>,
    pub nonces: Vec<Option<BigUint>>,
    pub pair: Option<(usize, usize)>,
    pub key_error: Option<RecoveryError>,
    pub nonce_errors: Vec<(usize, RecoveryError)>,
}

impl RecoveryResult {
    fn empty(len: usize) -> Self {
        Self {
            private_key: None,
            nonces: vec![None; len],
            pair: None,
            key_error: None,
            nonce_errors: Vec::new(),
        }
    }

    pub fn recovered_nonces(&self) -> usize {
        self.nonces.iter().filter(|k| k.is_some()).count()
    }
}

/// Recovers the private key from the reference pair, then the nonce of every
/// signature in `sigs`.
///
/// A failing signature leaves its slot empty and the run continues. A failing
/// key recovery leaves every slot empty and is reported in `key_error`.
pub fn recover_batch<C: Curve + ?Sized>(
    sigs: &[Signature],
    curve: &C,
    config: &RecoveryConfig,
    hint: Option<&dyn NonceHint>,
) -> RecoveryResult {
    let (first, second) = config
        .pair
        .unwrap_or_else(|| reference_pair(sigs, curve.order()));

    if first >= sigs.len() || second >= sigs.len() {
        let mut result = RecoveryResult::empty(sigs.len());
        result.pair = Some((first, second));
        result.key_error = Some(RecoveryError::InsufficientSignatures {
            first,
            second,
            len: sigs.len(),
        });
        return result;
    }

    let mut result = match recover_private_key(&sigs[first], &sigs[second], curve) {
        Ok(d) => {
            info!(first, second, "private key recovered");
            recover_nonces(&d, sigs, curve, config, hint)
        }
        Err(e) => {
            warn!(first, second, error = %e, "private key recovery failed");
            let mut result = RecoveryResult::empty(sigs.len());
            result.key_error = Some(e);
            result
        }
    };
    result.pair = Some((first, second));
    result
}

/// Recovers the nonce of every signature under a known private key `d`.
pub fn recover_nonces<C: Curve + ?Sized>(
    d: &BigUint,
    sigs: &[Signature],
    curve: &C,
    config: &RecoveryConfig,
    hint: Option<&dyn NonceHint>,
) -> RecoveryResult {
    let mut result = RecoveryResult::empty(sigs.len());
    let mut known: Vec<BigUint> = Vec::new();

    for (index, sig) in sigs.iter().enumerate() {
        let suggestion = hint.and_then(|h| h.suggest(&known));
        if let (Some(h), Some(_)) = (hint, &suggestion) {
            debug!(index, hint = h.name(), "nonce hint available");
        }

        let outcome = if config.force_search {
            search_nonce(sig, curve, suggestion.as_ref(), config.max_probes)
        } else {
            recover_nonce_bounded(d, sig, curve, suggestion.as_ref(), config.max_probes)
        };

        match outcome {
            Ok(k) => {
                known.push(k.clone());
                result.nonces[index] = Some(k);
            }
            Err(e) => {
                warn!(index, error = %e, "nonce recovery failed");
                result.nonce_errors.push((index, e));
            }
        }
    }

    debug!(
        recovered = result.recovered_nonces(),
        total = sigs.len(),
        "nonce recovery finished"
    );
    result.private_key = Some(d.clone());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Secp256k1;
    use crate::math::{mod_inverse, mul_mod};

    fn sign(curve: &Secp256k1, d: &BigUint, k: u64, z: u64) -> Signature {
        let n = curve.order();
        let (k, z) = (BigUint::from(k), BigUint::from(z));
        let r = curve.base_mul_x(&k).unwrap() % n;
        let s = mul_mod(&mod_inverse(&k, n).unwrap(), &((&z + &r * d) % n), n);
        Signature::new(r, s, z)
    }

    #[test]
    fn test_batch_picks_shared_r_pair() {
        let curve = Secp256k1::new();
        let d = BigUint::from(0xc0ffee_u32);
        let sigs = vec![
            sign(&curve, &d, 11, 100),
            sign(&curve, &d, 22, 200),
            sign(&curve, &d, 11, 300),
        ];
        let result = recover_batch(&sigs, &curve, &RecoveryConfig::default(), None);
        assert_eq!(result.pair, Some((0, 2)));
        assert_eq!(result.private_key, Some(d));
        assert_eq!(result.recovered_nonces(), 3);
        assert!(result.nonce_errors.is_empty());
    }

    #[test]
    fn test_batch_key_failure_leaves_all_slots_empty() {
        let curve = Secp256k1::new();
        let d = BigUint::from(5u32);
        let sigs = vec![sign(&curve, &d, 11, 100), sign(&curve, &d, 22, 100)];
        let result = recover_batch(&sigs, &curve, &RecoveryConfig::default(), None);
        assert_eq!(result.pair, Some((0, 1)));
        assert_eq!(result.key_error, Some(RecoveryError::IdenticalMessageHash));
        assert_eq!(result.private_key, None);
        assert_eq!(result.nonces, vec![None, None]);
    }

    #[test]
    fn test_batch_single_signature() {
        let curve = Secp256k1::new();
        let sigs = vec![sign(&curve, &BigUint::from(5u32), 11, 100)];
        let result = recover_batch(&sigs, &curve, &RecoveryConfig::default(), None);
        assert_eq!(
            result.key_error,
            Some(RecoveryError::InsufficientSignatures {
                first: 0,
                second: 1,
                len: 1
            })
        );
        assert_eq!(result.nonces, vec![None]);
    }

    #[test]
    fn test_batch_explicit_pair_out_of_range() {
        let curve = Secp256k1::new();
        let d = BigUint::from(5u32);
        let sigs = vec![sign(&curve, &d, 11, 100), sign(&curve, &d, 11, 200)];
        let config = RecoveryConfig {
            pair: Some((0, 7)),
            ..RecoveryConfig::default()
        };
        let result = recover_batch(&sigs, &curve, &config, None);
        assert!(matches!(
            result.key_error,
            Some(RecoveryError::InsufficientSignatures { second: 7, .. })
        ));
    }

    #[test]
    fn test_forced_search_follows_counter_hint() {
        struct Counter;
        impl NonceHint for Counter {
            fn name(&self) -> &'static str {
                "counter"
            }
            fn suggest(&self, previous: &[BigUint]) -> Option<BigUint> {
                previous.last().map(|k| k + 1u32).or(Some(BigUint::from(1000u32)))
            }
        }

        let curve = Secp256k1::new();
        let d = BigUint::from(77u32);
        let sigs = vec![
            sign(&curve, &d, 1000, 1),
            sign(&curve, &d, 1001, 2),
            sign(&curve, &d, 1002, 3),
        ];
        let config = RecoveryConfig {
            max_probes: 1,
            force_search: true,
            ..RecoveryConfig::default()
        };
        let result = recover_nonces(&d, &sigs, &curve, &config, Some(&Counter));
        assert_eq!(
            result.nonces,
            vec![
                Some(BigUint::from(1000u32)),
                Some(BigUint::from(1001u32)),
                Some(BigUint::from(1002u32)),
            ]
        );
    }
}
