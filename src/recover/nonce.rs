//! Nonce recovery for a signature under a known private key

use crate::curve::{nonce_matches, Curve};
use crate::error::RecoveryError;
use crate::math::{mod_inverse, mul_mod, normalize_low_s};
use crate::signature::Signature;
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use tracing::{debug, warn};

/// Probe budget of the search fallback.
pub const MAX_PROBES: usize = 1000;

/// Recovers the nonce of `sig` given the private key `d`.
///
/// Uses the closed form `k = s⁻¹·(z + r·d) mod n` on the low-s `s`, accepted
/// only if `(k·G).x mod n == r`. The returned nonce is the one the low-s
/// encoding commits to; its negation yields the same `r`.
///
/// If `s` has no inverse modulo `n` the closed form cannot run and the
/// bounded search takes over, seeded by `hint`.
pub fn recover_nonce<C: Curve + ?Sized>(
    d: &BigUint,
    sig: &Signature,
    curve: &C,
    hint: Option<&BigUint>,
) -> Result<BigUint, RecoveryError> {
    recover_nonce_bounded(d, sig, curve, hint, MAX_PROBES)
}

/// [`recover_nonce`] with an explicit probe budget for the search fallback.
pub fn recover_nonce_bounded<C: Curve + ?Sized>(
    d: &BigUint,
    sig: &Signature,
    curve: &C,
    hint: Option<&BigUint>,
    max_probes: usize,
) -> Result<BigUint, RecoveryError> {
    let n = curve.order();
    let s = normalize_low_s(&sig.s, n);

    let Some(s_inv) = mod_inverse(&s, n) else {
        warn!("s is not invertible, falling back to bounded nonce search");
        return search_nonce(sig, curve, hint, max_probes);
    };

    let r = &sig.r % n;
    let k = mul_mod(&s_inv, &((&sig.z + &r * d) % n), n);
    if k.is_zero() || !nonce_matches(curve, &k, &r) {
        return Err(RecoveryError::InvalidKeyOrSignature);
    }
    Ok(k)
}

/// Linearly probes `start, start + 1, …` modulo `n` for a nonce whose point
/// reproduces `r`, for at most `max_probes` candidates.
///
/// Starts at `hint` when given, otherwise at a uniformly random value in
/// `[1, n-1]`. Over a cryptographic group this only succeeds when the start
/// is already next to the nonce.
pub fn search_nonce<C: Curve + ?Sized>(
    sig: &Signature,
    curve: &C,
    hint: Option<&BigUint>,
    max_probes: usize,
) -> Result<BigUint, RecoveryError> {
    let n = curve.order();
    let r = &sig.r % n;
    let mut candidate = match hint {
        Some(h) => h % n,
        None if n > &BigUint::one() => {
            rand::thread_rng().gen_biguint_range(&BigUint::one(), n)
        }
        None => BigUint::zero(),
    };

    for probe in 0..max_probes {
        if !candidate.is_zero() && nonce_matches(curve, &candidate, &r) {
            debug!(probe, "nonce found by search");
            return Ok(candidate);
        }
        candidate = (candidate + 1u32) % n;
    }

    Err(RecoveryError::NonceNotFound { probes: max_probes })
}
