//! Modular arithmetic over an explicit group order

use anyhow::{anyhow, bail, Result};
use num_bigint::{BigInt, BigUint};
use num_traits::{Num, One, Zero};

/// Largest accepted input width, in bits.
pub const MAX_VALUE_BITS: u64 = 256;

pub enum ValueKind {
    RorS,
    Z,
}

/// Parses a strict decimal string (digits only, no leading zeros) or a
/// `0x`-prefixed hexadecimal string.
pub fn parse_integer_strict(s: &str, kind: ValueKind) -> Result<BigUint> {
    let value = if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if digits.is_empty() {
            bail!("Empty hexadecimal string");
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Invalid hexadecimal string: only 0-9, a-f allowed after 0x");
        }
        BigUint::from_str_radix(digits, 16)
            .map_err(|e| anyhow!("Failed to parse hexadecimal: {}", e))?
    } else {
        if s.is_empty() {
            bail!("Empty decimal string");
        }
        if !s.chars().all(|c| c.is_ascii_digit()) {
            bail!("Invalid decimal string: only digits 0-9 allowed");
        }
        if s.len() > 1 && s.starts_with('0') {
            bail!("Invalid decimal string: no leading zeros allowed");
        }
        BigUint::from_str_radix(s, 10).map_err(|e| anyhow!("Failed to parse decimal: {}", e))?
    };

    if value.bits() > MAX_VALUE_BITS {
        bail!("Value wider than {} bits", MAX_VALUE_BITS);
    }

    match kind {
        ValueKind::RorS => {
            if value.is_zero() {
                bail!("r and s values cannot be zero");
            }
        }
        ValueKind::Z => {}
    }

    Ok(value)
}

pub fn to_decimal_string(value: &BigUint) -> String {
    value.to_str_radix(10)
}

/// Lowercase hex, left-padded to 32 bytes.
pub fn to_hex_string(value: &BigUint) -> String {
    let bytes = value.to_bytes_be();
    let mut padded = vec![0u8; 32usize.saturating_sub(bytes.len())];
    padded.extend_from_slice(&bytes);
    hex::encode(padded)
}

/// Rewrites `s` to the low-s twin: `n - s` whenever `s > n / 2`.
pub fn normalize_low_s(s: &BigUint, n: &BigUint) -> BigUint {
    let s = s % n;
    if s > (n >> 1u32) {
        n - s
    } else {
        s
    }
}

/// `(a - b) mod n`
pub fn sub_mod(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    ((a % n) + n - (b % n)) % n
}

/// `(a * b) mod n`
pub fn mul_mod(a: &BigUint, b: &BigUint, n: &BigUint) -> BigUint {
    (a * b) % n
}

/// Inverse of `a` modulo `n` via the extended Euclidean algorithm.
///
/// Returns `None` when `gcd(a, n) != 1`, which covers `a ≡ 0`.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    if n.is_zero() {
        return None;
    }
    let modulus = BigInt::from(n.clone());
    let (mut old_r, mut r) = (BigInt::from(a % n), modulus.clone());
    let (mut old_t, mut t) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;
        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_t = &old_t - &q * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    if !old_r.is_one() {
        return None;
    }
    (((old_t % &modulus) + &modulus) % &modulus).to_biguint()
}
