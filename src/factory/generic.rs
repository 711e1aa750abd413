//! Cross-type creation factories: `Eq`, `If` (`spec.md` §4.5). These are
//! the only factories that accept operands of any of the four surface
//! types, so validation here compares `type_name`/`bit_length` against
//! each other rather than against one fixed expected type.

use std::sync::Arc;

use crate::annotation::AnnotationSet;
use crate::error::{CoreError, Result};
use crate::expr::{Base, TypeName};
use crate::op::Op;

use super::{canonicalize_commutative, publish};

#[track_caller]
pub fn eq(l: Arc<Base>, r: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    if l.type_name() != r.type_name() {
        return Err(CoreError::type_mismatch("Eq", "right", "same type as left"));
    }
    if l.bit_length() != r.bit_length() {
        return Err(CoreError::size("Eq", "operand bit_lengths differ"));
    }
    let (l, r) = canonicalize_commutative(l, r);
    let op = Op::eq(l, r);
    publish(Arc::new(Base::assemble(TypeName::Bool, None, op, annotations)))
}

#[track_caller]
pub fn if_(
    cond: Arc<Base>,
    then_: Arc<Base>,
    else_: Arc<Base>,
    annotations: Option<AnnotationSet>,
) -> Result<Arc<Base>> {
    if cond.type_name() != TypeName::Bool {
        return Err(CoreError::type_mismatch("If", "cond", "Bool"));
    }
    if then_.type_name() != else_.type_name() {
        return Err(CoreError::type_mismatch("If", "else", "same type as then"));
    }
    if then_.bit_length() != else_.bit_length() {
        return Err(CoreError::size("If", "then/else bit_lengths differ"));
    }
    let type_name = then_.type_name();
    let bit_length = then_.bit_length();
    let op = Op::if_(cond, then_, else_);
    publish(Arc::new(Base::assemble(type_name, bit_length, op, annotations)))
}
