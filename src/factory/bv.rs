//! Bit-vector creation factories: `Symbol`, `Literal`, `Add`, `Sub`,
//! `Concat` (`spec.md` §4.3).

use std::sync::Arc;

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;

use crate::annotation::AnnotationSet;
use crate::error::{CoreError, Result};
use crate::expr::{Base, TypeName};
use crate::op::{LiteralValue, Op};

use super::{canonicalize_commutative, publish};

#[track_caller]
pub fn symbol(name: &str, bit_length: u32, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    if bit_length == 0 {
        return Err(CoreError::size("Symbol", "bit_length must be positive"));
    }
    let op = Op::symbol(name, Some(bit_length));
    publish(Arc::new(Base::assemble(TypeName::Bv, Some(bit_length), op, annotations)))
}

/// Create a literal from an explicit bit pattern.
#[track_caller]
pub fn literal(bits: BitVec<u64, Lsb0>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    let bit_length = bits.len() as u32;
    if bit_length == 0 {
        return Err(CoreError::size("Literal", "bit_length must be positive"));
    }
    let op = Op::literal(LiteralValue::Bv(bits));
    publish(Arc::new(Base::assemble(TypeName::Bv, Some(bit_length), op, annotations)))
}

/// Convenience constructor: a literal from a `u64` value, truncated or
/// zero-extended to `bit_length`.
#[track_caller]
pub fn literal_u64(value: u64, bit_length: u32, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    if bit_length == 0 {
        return Err(CoreError::size("Literal", "bit_length must be positive"));
    }
    let mut bits = BitVec::<u64, Lsb0>::repeat(false, bit_length as usize);
    for i in 0..(bit_length as usize).min(64) {
        bits.set(i, (value >> i) & 1 == 1);
    }
    literal(bits, annotations)
}

fn require_bv<'a>(op: &'static str, role: &'static str, x: &'a Base) -> Result<u32> {
    if x.type_name() != TypeName::Bv {
        return Err(CoreError::type_mismatch(op, role, "BV"));
    }
    Ok(x.bit_length().expect("BV expression always carries a bit_length"))
}

#[track_caller]
pub fn add(l: Arc<Base>, r: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    let bl = require_bv("Add", "left", &l)?;
    let br = require_bv("Add", "right", &r)?;
    if bl != br {
        return Err(CoreError::size("Add", format!("operand bit_lengths differ: {bl} vs {br}")));
    }
    let (l, r) = canonicalize_commutative(l, r);
    let op = Op::add(l, r);
    publish(Arc::new(Base::assemble(TypeName::Bv, Some(bl), op, annotations)))
}

#[track_caller]
pub fn sub(l: Arc<Base>, r: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    let bl = require_bv("Sub", "left", &l)?;
    let br = require_bv("Sub", "right", &r)?;
    if bl != br {
        return Err(CoreError::size("Sub", format!("operand bit_lengths differ: {bl} vs {br}")));
    }
    let op = Op::sub(l, r);
    publish(Arc::new(Base::assemble(TypeName::Bv, Some(bl), op, annotations)))
}

#[track_caller]
pub fn concat(l: Arc<Base>, r: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    let bl = require_bv("Concat", "left", &l)?;
    let br = require_bv("Concat", "right", &r)?;
    let bit_length = bl
        .checked_add(br)
        .ok_or_else(|| CoreError::size("Concat", "result bit_length overflows u32"))?;
    let op = Op::concat(l, r);
    publish(Arc::new(Base::assemble(TypeName::Bv, Some(bit_length), op, annotations)))
}
