//! Signature data types and grouping logic

use crate::math::{parse_integer_strict, ValueKind};
use anyhow::Result;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureInput {
    pub r: String,
    pub s: String,
    pub z: String,
}

/// An ECDSA signature `(r, s)` together with the message hash `z`.
///
/// Values are kept as given; reduction modulo the group order and low-s
/// normalization happen at the point of use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub r: BigUint,
    pub s: BigUint,
    pub z: BigUint,
}

impl Signature {
    pub fn new(r: BigUint, s: BigUint, z: BigUint) -> Self {
        Self { r, s, z }
    }
}

impl TryFrom<SignatureInput> for Signature {
    type Error = anyhow::Error;

    fn try_from(input: SignatureInput) -> Result<Self> {
        let r = parse_integer_strict(input.r.trim(), ValueKind::RorS)?;
        let s = parse_integer_strict(input.s.trim(), ValueKind::RorS)?;
        let z = parse_integer_strict(input.z.trim(), ValueKind::Z)?;

        Ok(Signature { r, s, z })
    }
}

/// Signatures sharing the same `r`, i.e. candidates for a reused nonce.
#[derive(Debug, Clone)]
pub struct SignatureGroup {
    pub r: BigUint,
    /// Positions in the original corpus, ascending.
    pub indices: Vec<usize>,
}

/// Groups signatures by `r` (reduced modulo `n`), in order of first
/// appearance.
pub fn group_by_r(sigs: &[Signature], n: &BigUint) -> Vec<SignatureGroup> {
    let mut groups: Vec<SignatureGroup> = Vec::new();

    for (index, sig) in sigs.iter().enumerate() {
        let r = &sig.r % n;
        match groups.iter_mut().find(|g| g.r == r) {
            Some(group) => group.indices.push(index),
            None => groups.push(SignatureGroup {
                r,
                indices: vec![index],
            }),
        }
    }

    groups
}

/// Picks the pair to feed the key recovery: the first two signatures that
/// share `r` but sign different hashes, falling back to the first two of the
/// corpus.
pub fn reference_pair(sigs: &[Signature], n: &BigUint) -> (usize, usize) {
    for group in group_by_r(sigs, n) {
        for (pos, &i) in group.indices.iter().enumerate() {
            for &j in &group.indices[pos + 1..] {
                if &sigs[i].z % n != &sigs[j].z % n {
                    return (i, j);
                }
            }
        }
    }
    (0, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(r: &str, s: &str, z: &str) -> SignatureInput {
        SignatureInput {
            r: r.to_string(),
            s: s.to_string(),
            z: z.to_string(),
        }
    }

    fn sig(r: u32, s: u32, z: u32) -> Signature {
        Signature::new(r.into(), s.into(), z.into())
    }

    #[test]
    fn test_signature_input_parse_decimal() {
        let input = input(
            "6819641642398093696120236467967538361543858578256722584730163952555838220871",
            "5111069398017465712735164463809304352000044522184731945150717785434666956473",
            "4834837306435966184874350434501389872155834069808640791394730023708942795899",
        );
        let sig = Signature::try_from(input).unwrap();
        assert_eq!(
            sig.r.to_string(),
            "6819641642398093696120236467967538361543858578256722584730163952555838220871"
        );
    }

    #[test]
    fn test_signature_input_parse_hex_with_whitespace() {
        let sig = Signature::try_from(input(" 0x1f ", "0x2", "0")).unwrap();
        assert_eq!(sig, self::sig(31, 2, 0));
    }

    #[test]
    fn test_signature_input_rejects_zero_s() {
        assert!(Signature::try_from(input("1", "0", "5")).is_err());
    }

    #[test]
    fn test_group_by_r_keeps_first_seen_order() {
        let n = BigUint::from(1_000_003u32);
        let sigs = vec![sig(7, 1, 1), sig(3, 2, 2), sig(7, 3, 3), sig(3, 4, 4)];
        let groups = group_by_r(&sigs, &n);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].r, BigUint::from(7u32));
        assert_eq!(groups[0].indices, vec![0, 2]);
        assert_eq!(groups[1].indices, vec![1, 3]);
    }

    #[test]
    fn test_group_by_r_reduces_modulo_n() {
        let n = BigUint::from(19u32);
        let sigs = vec![sig(5, 1, 1), sig(24, 2, 2)];
        assert_eq!(group_by_r(&sigs, &n).len(), 1);
    }

    #[test]
    fn test_reference_pair_prefers_shared_r() {
        let n = BigUint::from(1_000_003u32);
        let sigs = vec![sig(1, 1, 1), sig(2, 2, 2), sig(9, 3, 3), sig(2, 4, 4)];
        assert_eq!(reference_pair(&sigs, &n), (1, 3));
    }

    #[test]
    fn test_reference_pair_skips_identical_hashes() {
        let n = BigUint::from(1_000_003u32);
        let sigs = vec![sig(2, 1, 8), sig(2, 2, 8), sig(2, 3, 9)];
        assert_eq!(reference_pair(&sigs, &n), (0, 2));
    }

    #[test]
    fn test_reference_pair_falls_back_to_first_two() {
        let n = BigUint::from(1_000_003u32);
        let sigs = vec![sig(1, 1, 1), sig(2, 2, 2), sig(3, 3, 3)];
        assert_eq!(reference_pair(&sigs, &n), (0, 1));
    }
}
