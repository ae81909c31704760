//! Curve providers: group order and base point multiplication

use k256::elliptic_curve::ff::PrimeField;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{AffinePoint, ProjectivePoint, Scalar};
use num_bigint::BigUint;
use num_traits::{Num, Zero};

/// secp256k1 group order n in hexadecimal.
pub const SECP256K1_ORDER_HEX: &str =
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141";

/// Curve parameters as seen by the recovery core.
///
/// The core never touches points directly. It only needs the group order and
/// the x-coordinate of `k·G`, which is all an ECDSA `r` value depends on.
pub trait Curve: Send + Sync {
    fn name(&self) -> &'static str;

    /// Group order `n` of the base point.
    fn order(&self) -> &BigUint;

    /// Affine x-coordinate of `k·G` as an integer, or `None` when `k·G` is
    /// the point at infinity.
    fn base_mul_x(&self, k: &BigUint) -> Option<BigUint>;
}

/// Returns `true` when `(k·G).x mod n == r`.
pub fn nonce_matches<C: Curve + ?Sized>(curve: &C, k: &BigUint, r: &BigUint) -> bool {
    let n = curve.order();
    match curve.base_mul_x(k) {
        Some(x) => x % n == r % n,
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct Secp256k1 {
    order: BigUint,
}

impl Secp256k1 {
    pub fn new() -> Self {
        let order = BigUint::from_str_radix(SECP256K1_ORDER_HEX, 16)
            .expect("SECP256K1_ORDER_HEX should parse as base-16 BigUint");
        Self { order }
    }

    /// Reduces `k` into a nonzero scalar; zero has no point to map to.
    fn to_scalar(&self, k: &BigUint) -> Option<Scalar> {
        let reduced = k % &self.order;
        if reduced.is_zero() {
            return None;
        }
        let bytes = reduced.to_bytes_be();
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(&bytes);
        Option::<Scalar>::from(Scalar::from_repr(padded.into()))
    }
}

impl Default for Secp256k1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Curve for Secp256k1 {
    fn name(&self) -> &'static str {
        "secp256k1"
    }

    fn order(&self) -> &BigUint {
        &self.order
    }

    fn base_mul_x(&self, k: &BigUint) -> Option<BigUint> {
        let scalar = self.to_scalar(k)?;
        let point = ProjectivePoint::GENERATOR * scalar;
        let affine: AffinePoint = point.into();
        let encoded = affine.to_encoded_point(false);
        let x = encoded.x()?;
        Some(BigUint::from_bytes_be(x))
    }
}
