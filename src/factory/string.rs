//! String creation factories: `FromInt` (`spec.md` §4.5 / `SPEC_FULL.md`
//! §9, resolving the size-of-the-result open question).

use std::sync::Arc;

use crate::annotation::AnnotationSet;
use crate::error::{CoreError, Result};
use crate::expr::{Base, TypeName};
use crate::op::Op;

use super::publish;

/// Bits per character, matching the width used to size-up the BV-to-String
/// over-approximation (`SPEC_FULL.md` §9).
pub const CHAR_BIT: u32 = 8;

#[track_caller]
pub fn from_int(x: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    if x.type_name() != TypeName::Bv {
        return Err(CoreError::type_mismatch("String.FromInt", "operand", "BV"));
    }
    let input_bit_length = x
        .bit_length()
        .ok_or_else(|| CoreError::unexpected("String.FromInt: BV operand carries no bit_length"))?;
    let bit_length = input_bit_length
        .checked_add(2 * CHAR_BIT)
        .ok_or_else(|| CoreError::size("String.FromInt", "result bit_length overflows u32"))?;
    let op = Op::string_from_int(x);
    publish(Arc::new(Base::assemble(TypeName::Str, Some(bit_length), op, annotations)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_int_rejects_non_bv() {
        let b = crate::factory::bool_::symbol("b", None).unwrap();
        assert!(from_int(b, None).is_err());
    }

    #[test]
    fn from_int_size_is_input_plus_two_chars() {
        let x = crate::factory::bv::symbol("x", 32, None).unwrap();
        let s = from_int(x, None).unwrap();
        assert_eq!(s.type_name(), TypeName::Str);
        assert_eq!(s.bit_length(), Some(32 + 2 * CHAR_BIT));
    }
}
