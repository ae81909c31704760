//! Private key recovery from a pair of signatures sharing a nonce

use crate::curve::{nonce_matches, Curve};
use crate::error::RecoveryError;
use crate::math::{mod_inverse, mul_mod, normalize_low_s, sub_mod};
use crate::signature::Signature;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

/// Recovers the private key `d` shared by two signatures made with the same
/// nonce.
///
/// With `s' = s` or `n - s` after low-s normalization the shared nonce is
/// `k = (z_a - z_b) / (s'_a - s'_b)` and the key follows from
/// `d = (s'_a·k - z_a) / r`.
///
/// Normalization may have negated only one of the two `s` values, in which
/// case the nonce is `(z_a - z_b) / (s'_a + s'_b)` instead. The curve tells
/// the two apart: only the right nonce reproduces `r`. When neither does, the
/// pair did not share a nonce and the difference candidate is returned as is.
pub fn recover_private_key<C: Curve + ?Sized>(
    sig_a: &Signature,
    sig_b: &Signature,
    curve: &C,
) -> Result<BigUint, RecoveryError> {
    let n = curve.order();
    let s_a = normalize_low_s(&sig_a.s, n);
    let s_b = normalize_low_s(&sig_b.s, n);
    let z_a = &sig_a.z % n;
    let z_b = &sig_b.z % n;

    if z_a == z_b {
        return Err(RecoveryError::IdenticalMessageHash);
    }

    let delta_s = sub_mod(&s_a, &s_b, n);
    if delta_s.is_zero() {
        return Err(RecoveryError::DegenerateDelta);
    }

    let delta_z = sub_mod(&z_a, &z_b, n);
    let r = &sig_a.r % n;
    if r != &sig_b.r % n {
        debug!("pair has different r values, nonce reuse is unlikely");
    }

    let mut k = shared_nonce(&delta_z, &delta_s, n)?;
    if !nonce_matches(curve, &k, &r) {
        let sum_s = (&s_a + &s_b) % n;
        match shared_nonce(&delta_z, &sum_s, n) {
            Ok(flipped) if nonce_matches(curve, &flipped, &r) => {
                debug!("low-s normalization flipped one signature of the pair");
                k = flipped;
            }
            _ => debug!("no candidate nonce reproduces r, returning unverified key"),
        }
    }

    let r_inv = mod_inverse(&r, n).ok_or(RecoveryError::NoModularInverse)?;
    let d = mul_mod(&sub_mod(&mul_mod(&s_a, &k, n), &z_a, n), &r_inv, n);
    debug!(curve = curve.name(), "recovered private key candidate");
    Ok(d)
}

/// `k = Δz / Δs (mod n)`
fn shared_nonce(
    delta_z: &BigUint,
    delta_s: &BigUint,
    n: &BigUint,
) -> Result<BigUint, RecoveryError> {
    let inv = mod_inverse(delta_s, n).ok_or(RecoveryError::NoModularInverse)?;
    Ok(mul_mod(delta_z, &inv, n))
}
