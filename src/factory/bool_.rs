//! Boolean creation factories: `Symbol`, `Literal`, `And`, `Not`
//! (`spec.md` §4.2 plus the supplemented boolean connectives, `SPEC_FULL.md`
//! §4.2).

use std::sync::Arc;

use crate::annotation::AnnotationSet;
use crate::error::{CoreError, Result};
use crate::expr::{Base, TypeName};
use crate::op::{LiteralValue, Op};

use super::{canonicalize_commutative, publish};

#[track_caller]
pub fn symbol(name: &str, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    let op = Op::symbol(name, None);
    publish(Arc::new(Base::assemble(TypeName::Bool, None, op, annotations)))
}

#[track_caller]
pub fn literal(value: bool, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    let op = Op::literal(LiteralValue::Bool(value));
    publish(Arc::new(Base::assemble(TypeName::Bool, None, op, annotations)))
}

fn require_bool<'a>(op: &'static str, role: &'static str, x: &'a Base) -> Result<()> {
    if x.type_name() != TypeName::Bool {
        return Err(CoreError::type_mismatch(op, role, "Bool"));
    }
    Ok(())
}

#[track_caller]
pub fn and(l: Arc<Base>, r: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    require_bool("And", "left", &l)?;
    require_bool("And", "right", &r)?;
    let (l, r) = canonicalize_commutative(l, r);
    let op = Op::and(l, r);
    publish(Arc::new(Base::assemble(TypeName::Bool, None, op, annotations)))
}

#[track_caller]
pub fn not(x: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    require_bool("Not", "operand", &x)?;
    let op = Op::not(x);
    publish(Arc::new(Base::assemble(TypeName::Bool, None, op, annotations)))
}
