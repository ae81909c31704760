//! Optional nonce hint providers
//!
//! A hint only seeds the bounded search fallback. It is never trusted: every
//! candidate it leads to must still reproduce `r` through point
//! multiplication.

use crate::math::{mod_inverse, mul_mod, sub_mod};
use num_bigint::BigUint;
use num_traits::Zero;

pub trait NonceHint: Send + Sync {
    fn name(&self) -> &'static str;

    /// Suggests the next nonce given the nonces recovered so far, oldest
    /// first. `None` means no opinion.
    fn suggest(&self, previous: &[BigUint]) -> Option<BigUint>;
}

/// Extrapolates nonces generated by a linear recurrence
/// `k[i+1] = a + b·k[i] (mod n)`.
///
/// With three or more known nonces `a` and `b` are solved from the last three:
/// `b = (k2 - k1) / (k1 - k0)`, `a = k1 - b·k0`. With exactly two, `b = 1` is
/// assumed (a counter with a fixed step).
pub struct LinearRecurrenceHint {
    order: BigUint,
}

impl LinearRecurrenceHint {
    pub fn new(order: BigUint) -> Self {
        Self { order }
    }
}

impl NonceHint for LinearRecurrenceHint {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn suggest(&self, previous: &[BigUint]) -> Option<BigUint> {
        let n = &self.order;
        let next = match previous {
            [] | [_] => return None,
            [k0, k1] => {
                let step = sub_mod(k1, k0, n);
                (k1 + step) % n
            }
            [.., k0, k1, k2] => {
                let d0 = sub_mod(k1, k0, n);
                let d1 = sub_mod(k2, k1, n);
                let b = mul_mod(&d1, &mod_inverse(&d0, n)?, n);
                let a = sub_mod(k1, &mul_mod(&b, k0, n), n);
                (a + mul_mod(&b, k2, n)) % n
            }
        };
        if next.is_zero() {
            None
        } else {
            Some(next)
        }
    }
}
