//! Structural hashing (component C1).
//!
//! `Hash` is the identifier space for hash-consing: every published
//! [`crate::expr::Expr`] is keyed in the cache by its `Hash`, and two
//! expressions with the same `Hash` are required to be structurally
//! identical (a mismatch is an [`crate::error::CoreError::Unexpected`]).

use std::hash::{Hash as StdHash, Hasher};

use rustc_hash::FxHasher;

use crate::annotation::AnnotationSet;

/// A 64-bit structural hash, doubling as an expression's `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash(pub u64);

impl Hash {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Hash a single primitive value in isolation.
///
/// Specializations mirror `Hash::singular<T>` in the source design: signed
/// and unsigned integers hash their widened value, strings and byte
/// buffers hash their content, and annotation sets hash their
/// concatenated element hashes (see [`AnnotationSet::hash`]).
pub trait Singular {
    fn singular(&self) -> Hash;
}

fn hash_via_std<T: StdHash + ?Sized>(value: &T) -> u64 {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

impl Singular for i64 {
    fn singular(&self) -> Hash {
        Hash(*self as u64)
    }
}

impl Singular for u64 {
    fn singular(&self) -> Hash {
        Hash(*self)
    }
}

impl Singular for u32 {
    fn singular(&self) -> Hash {
        Hash(*self as u64)
    }
}

impl Singular for bool {
    fn singular(&self) -> Hash {
        Hash(if *self { 1 } else { 0 })
    }
}

impl Singular for str {
    fn singular(&self) -> Hash {
        Hash(hash_via_std(self))
    }
}

impl Singular for [u8] {
    fn singular(&self) -> Hash {
        Hash(hash_via_std(self))
    }
}

impl Singular for f64 {
    fn singular(&self) -> Hash {
        // Hash the raw bit pattern, not the float value, so that NaN payloads
        // and signed zero are distinguished the way structural equality
        // requires (two NaNs with different payloads are different literals).
        let bytes: [u8; 8] = bytemuck::cast(self.to_bits());
        Hash(hash_via_std(&bytes))
    }
}

impl Singular for AnnotationSet {
    fn singular(&self) -> Hash {
        self.hash()
    }
}

/// splitmix64, used to avalanche-mix an accumulator with each new part.
/// Deterministic within a process run; stability across builds is not
/// required (`spec.md` §4.1).
const fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Mix an op-kind discriminant and an ordered list of part-hashes into a
/// single structural hash. This is `Hash::combine` from `spec.md` §4.1.
pub fn combine(kind_tag: u64, parts: &[Hash]) -> Hash {
    let mut acc = splitmix64(kind_tag ^ 0xD1B54A32D192ED03);
    for part in parts {
        acc = splitmix64(acc ^ part.0);
    }
    Hash(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_is_order_sensitive() {
        let a = Hash(1);
        let b = Hash(2);
        assert_ne!(combine(7, &[a, b]), combine(7, &[b, a]));
    }

    #[test]
    fn combine_is_kind_sensitive() {
        let parts = [Hash(1), Hash(2)];
        assert_ne!(combine(1, &parts), combine(2, &parts));
    }

    #[test]
    fn combine_is_deterministic() {
        let parts = [Hash(11), Hash(22), Hash(33)];
        assert_eq!(combine(5, &parts), combine(5, &parts));
    }

    #[test]
    fn float_singular_distinguishes_signed_zero() {
        assert_ne!(0.0f64.singular(), (-0.0f64).singular());
    }

    #[test]
    fn str_singular_matches_content() {
        assert_eq!("hello".singular(), "hello".singular());
        assert_ne!("hello".singular(), "world".singular());
    }
}
