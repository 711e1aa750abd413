//! Floating-point creation factories: `Literal`, the four binary
//! arithmetic ops, `ToBV`, `IsNaN`, `IsInf` (`spec.md` §4.4).

use std::sync::Arc;

use crate::annotation::AnnotationSet;
use crate::error::{CoreError, Result};
use crate::expr::{Base, TypeName};
use crate::op::{FpBinOp, FpWidth, LiteralValue, Op, Rounding};

use super::publish;

#[track_caller]
pub fn literal(value: f64, width: FpWidth, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    let op = Op::literal(LiteralValue::Fp(value, width));
    publish(Arc::new(Base::assemble(TypeName::Fp, Some(width.bit_length()), op, annotations)))
}

fn require_fp<'a>(op: &'static str, role: &'static str, x: &'a Base) -> Result<FpWidth> {
    if x.type_name() != TypeName::Fp {
        return Err(CoreError::type_mismatch(op, role, "FP"));
    }
    x.fp_width()
        .ok_or_else(|| CoreError::unexpected(format!("{op}: FP operand carries no width")))
}

#[track_caller]
pub fn binary(
    kind: FpBinOp,
    mode: Rounding,
    l: Arc<Base>,
    r: Arc<Base>,
    annotations: Option<AnnotationSet>,
) -> Result<Arc<Base>> {
    let name = crate::op::OpKind::FpBinary(kind).name();
    let wl = require_fp(name, "left", &l)?;
    let wr = require_fp(name, "right", &r)?;
    if wl != wr {
        return Err(CoreError::size(name, format!("operand widths differ: {wl:?} vs {wr:?}")));
    }
    let (l, r) = if kind == FpBinOp::Add {
        super::canonicalize_commutative(l, r)
    } else {
        (l, r)
    };
    let op = Op::fp_binary(kind, mode, l, r);
    publish(Arc::new(Base::assemble(TypeName::Fp, Some(wl.bit_length()), op, annotations)))
}

#[track_caller]
pub fn add(l: Arc<Base>, r: Arc<Base>, mode: Rounding, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    binary(FpBinOp::Add, mode, l, r, annotations)
}

#[track_caller]
pub fn sub(l: Arc<Base>, r: Arc<Base>, mode: Rounding, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    binary(FpBinOp::Sub, mode, l, r, annotations)
}

#[track_caller]
pub fn mul(l: Arc<Base>, r: Arc<Base>, mode: Rounding, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    binary(FpBinOp::Mul, mode, l, r, annotations)
}

#[track_caller]
pub fn div(l: Arc<Base>, r: Arc<Base>, mode: Rounding, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    binary(FpBinOp::Div, mode, l, r, annotations)
}

#[track_caller]
pub fn to_bv(
    signed: bool,
    mode: Rounding,
    bit_length: u32,
    x: Arc<Base>,
    annotations: Option<AnnotationSet>,
) -> Result<Arc<Base>> {
    require_fp("FP.ToBV", "operand", &x)?;
    if bit_length == 0 {
        return Err(CoreError::size("FP.ToBV", "bit_length must be positive"));
    }
    let op = Op::fp_to_bv(signed, mode, bit_length, x);
    publish(Arc::new(Base::assemble(TypeName::Bv, Some(bit_length), op, annotations)))
}

#[track_caller]
pub fn is_nan(x: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    require_fp("FP.IsNaN", "operand", &x)?;
    let op = Op::fp_is_nan(x);
    publish(Arc::new(Base::assemble(TypeName::Bool, None, op, annotations)))
}

#[track_caller]
pub fn is_inf(x: Arc<Base>, annotations: Option<AnnotationSet>) -> Result<Arc<Base>> {
    require_fp("FP.IsInf", "operand", &x)?;
    let op = Op::fp_is_inf(x);
    publish(Arc::new(Base::assemble(TypeName::Bool, None, op, annotations)))
}
