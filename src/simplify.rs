//! Local algebraic simplification (component C6).
//!
//! `simplify` receives a freshly assembled candidate [`Base`] and may
//! return a different, equivalent `Base` in its place. It is local — one
//! rewrite, not a fixed point (`spec.md` §4.4) — callers that need a
//! normal form must re-invoke the relevant `factory::*` function, whose
//! own call to `simplify` will then see the rewritten shape.
//!
//! Rules are held in an explicit registry keyed by [`OpKind`]
//! (`indexmap::IndexMap`, pulled from the teacher's own dependency table),
//! populated eagerly by [`Simplifier::with_default_rules`] — the
//! language-neutral replacement for the source's
//! `UTILS_RUN_FUNCTION_AFTER_MAIN` global-constructor registration
//! (`spec.md` §9).

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::expr::Base;
use crate::op::{FpBinOp, LiteralValue, OpData, OpKind};

/// A single rewrite rule: given a candidate, optionally produce its
/// replacement. Must not loop — each rule fires at most once per call to
/// [`Simplifier::simplify`].
pub type RewriteRule = fn(&Arc<Base>) -> Option<Arc<Base>>;

pub struct Simplifier {
    rules: IndexMap<OpKind, Vec<RewriteRule>>,
}

impl Simplifier {
    pub fn empty() -> Self {
        Simplifier { rules: IndexMap::new() }
    }

    pub fn register(&mut self, kind: OpKind, rule: RewriteRule) {
        self.rules.entry(kind).or_default().push(rule);
    }

    pub fn with_default_rules() -> Self {
        let mut s = Self::empty();
        s.register(OpKind::Add, add_identity);
        s.register(OpKind::Add, fold_bv_arith);
        s.register(OpKind::Sub, sub_identity);
        s.register(OpKind::Sub, fold_bv_arith);
        s.register(OpKind::Concat, concat_identity);
        s.register(OpKind::Eq, eq_equal_operands);
        s.register(OpKind::Eq, fold_eq_literals);
        s.register(OpKind::If, if_literal_cond);
        s.register(OpKind::If, if_equal_branches);
        s.register(OpKind::And, and_identity);
        s.register(OpKind::Not, not_double_negation);
        s.register(OpKind::Not, not_literal);
        s.register(OpKind::FpIsNaN, fp_is_nan_literal);
        s.register(OpKind::FpIsInf, fp_is_inf_literal);
        s
    }

    /// The process-wide default rule set.
    pub fn global() -> &'static Simplifier {
        static SIMPLIFIER: Lazy<Simplifier> = Lazy::new(Simplifier::with_default_rules);
        &SIMPLIFIER
    }

    /// Apply the first matching rule registered for `candidate`'s op kind,
    /// if any. Returns `None` when `candidate` should be published as-is.
    pub fn simplify(&self, candidate: &Arc<Base>) -> Option<Arc<Base>> {
        let rules = self.rules.get(&candidate.op().kind())?;
        let result = rules.iter().find_map(|rule| rule(candidate));
        if result.is_some() {
            tracing::trace!(op = candidate.op().kind().name(), "simplifier: rule fired");
        }
        result
    }
}

fn literal_bool(base: &Base) -> Option<bool> {
    match base.op().data() {
        OpData::Literal(LiteralValue::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Interpret a bounded-width BV literal as a signed `i128`, for constant
/// folding of "trivially decidable" arithmetic (`spec.md` §4.4). Widths
/// beyond 128 bits are never folded.
fn literal_bv_i128(base: &Base) -> Option<(i128, u32)> {
    match base.op().data() {
        OpData::Literal(LiteralValue::Bv(bits)) if bits.len() <= 128 => {
            let mut value: u128 = 0;
            for (i, bit) in bits.iter().enumerate() {
                if *bit {
                    value |= 1u128 << i;
                }
            }
            Some((value as i128, bits.len() as u32))
        }
        _ => None,
    }
}

fn bv_literal_from_i128(value: i128, bit_length: u32) -> Arc<Base> {
    let mut bits = bitvec::vec::BitVec::<u64, bitvec::order::Lsb0>::repeat(false, bit_length as usize);
    let unsigned = value as u128;
    for i in 0..bit_length as usize {
        bits.set(i, (unsigned >> i) & 1 == 1);
    }
    let op = crate::op::Op::literal(LiteralValue::Bv(bits));
    Arc::new(Base::assemble(crate::expr::TypeName::Bv, Some(bit_length), op, None))
}

fn bool_literal(value: bool) -> Arc<Base> {
    let op = crate::op::Op::literal(LiteralValue::Bool(value));
    Arc::new(Base::assemble(crate::expr::TypeName::Bool, None, op, None))
}

fn add_identity(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::Add(l, r) = candidate.op().data() else { return None };
    if matches!(literal_bv_i128(r), Some((0, _))) {
        return Some(l.clone());
    }
    if matches!(literal_bv_i128(l), Some((0, _))) {
        return Some(r.clone());
    }
    None
}

fn sub_identity(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::Sub(l, r) = candidate.op().data() else { return None };
    if matches!(literal_bv_i128(r), Some((0, _))) {
        return Some(l.clone());
    }
    None
}

fn fold_bv_arith(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let (l, r, is_add) = match candidate.op().data() {
        OpData::Add(l, r) => (l, r, true),
        OpData::Sub(l, r) => (l, r, false),
        _ => return None,
    };
    let (lv, bl) = literal_bv_i128(l)?;
    let (rv, _) = literal_bv_i128(r)?;
    let mask: i128 = if bl >= 127 { -1 } else { (1i128 << bl) - 1 };
    let folded = if is_add { lv.wrapping_add(rv) } else { lv.wrapping_sub(rv) } & mask;
    Some(bv_literal_from_i128(folded, bl))
}

fn concat_identity(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::Concat(l, r) = candidate.op().data() else { return None };
    if r.bit_length() == Some(0) {
        return Some(l.clone());
    }
    if l.bit_length() == Some(0) {
        return Some(r.clone());
    }
    None
}

fn eq_equal_operands(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::Eq(l, r) = candidate.op().data() else { return None };
    if l.id() == r.id() {
        return Some(bool_literal(true));
    }
    None
}

fn fold_eq_literals(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::Eq(l, r) = candidate.op().data() else { return None };
    if let (Some(lb), Some(rb)) = (literal_bool(l), literal_bool(r)) {
        return Some(bool_literal(lb == rb));
    }
    if let (Some((lv, _)), Some((rv, _))) = (literal_bv_i128(l), literal_bv_i128(r)) {
        return Some(bool_literal(lv == rv));
    }
    None
}

fn if_literal_cond(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::If { cond, then_, else_ } = candidate.op().data() else { return None };
    match literal_bool(cond) {
        Some(true) => Some(then_.clone()),
        Some(false) => Some(else_.clone()),
        None => None,
    }
}

fn if_equal_branches(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::If { then_, else_, .. } = candidate.op().data() else { return None };
    if then_.id() == else_.id() {
        return Some(then_.clone());
    }
    None
}

fn and_identity(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::And(l, r) = candidate.op().data() else { return None };
    if let (Some(lb), Some(rb)) = (literal_bool(l), literal_bool(r)) {
        return Some(bool_literal(lb && rb));
    }
    if literal_bool(l) == Some(true) {
        return Some(r.clone());
    }
    if literal_bool(r) == Some(true) {
        return Some(l.clone());
    }
    if literal_bool(l) == Some(false) || literal_bool(r) == Some(false) {
        return Some(bool_literal(false));
    }
    None
}

fn not_double_negation(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::Not(x) = candidate.op().data() else { return None };
    if let OpData::Not(inner) = x.op().data() {
        return Some(inner.clone());
    }
    None
}

fn not_literal(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::Not(x) = candidate.op().data() else { return None };
    literal_bool(x).map(|b| bool_literal(!b))
}

fn fp_is_nan_literal(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::FpIsNaN(x) = candidate.op().data() else { return None };
    match x.op().data() {
        OpData::Literal(LiteralValue::Fp(v, _)) => Some(bool_literal(v.is_nan())),
        _ => None,
    }
}

fn fp_is_inf_literal(candidate: &Arc<Base>) -> Option<Arc<Base>> {
    let OpData::FpIsInf(x) = candidate.op().data() else { return None };
    match x.op().data() {
        OpData::Literal(LiteralValue::Fp(v, _)) => Some(bool_literal(v.is_infinite())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::TypeName;
    use crate::op::{FpWidth, Op};

    fn bv_literal(value: i128, bit_length: u32) -> Arc<Base> {
        bv_literal_from_i128(value, bit_length)
    }

    fn symbol(name: &str, bit_length: u32) -> Arc<Base> {
        let op = Op::symbol(name, Some(bit_length));
        Arc::new(Base::assemble(TypeName::Bv, Some(bit_length), op, None))
    }

    #[test]
    fn add_zero_identity() {
        let x = symbol("x", 32);
        let zero = bv_literal(0, 32);
        let candidate = Arc::new(Base::assemble(
            TypeName::Bv,
            Some(32),
            Op::add(x.clone(), zero),
            None,
        ));
        let simplified = Simplifier::global().simplify(&candidate).unwrap();
        assert_eq!(simplified.id(), x.id());
    }

    #[test]
    fn fold_literal_addition() {
        let a = bv_literal(2, 8);
        let b = bv_literal(3, 8);
        let candidate = Arc::new(Base::assemble(TypeName::Bv, Some(8), Op::add(a, b), None));
        let simplified = Simplifier::global().simplify(&candidate).unwrap();
        assert_eq!(literal_bv_i128(&simplified), Some((5, 8)));
    }

    #[test]
    fn if_true_folds_to_then_branch() {
        let cond = bool_literal(true);
        let a = symbol("a", 8);
        let b = symbol("b", 8);
        let candidate = Arc::new(Base::assemble(
            TypeName::Bv,
            Some(8),
            Op::if_(cond, a.clone(), b),
            None,
        ));
        let simplified = Simplifier::global().simplify(&candidate).unwrap();
        assert_eq!(simplified.id(), a.id());
    }

    #[test]
    fn if_equal_branches_folds() {
        let cond = Arc::new(Base::assemble(TypeName::Bool, None, Op::symbol("c", None), None));
        let x = symbol("x", 8);
        let candidate = Arc::new(Base::assemble(
            TypeName::Bv,
            Some(8),
            Op::if_(cond, x.clone(), x.clone()),
            None,
        ));
        let simplified = Simplifier::global().simplify(&candidate).unwrap();
        assert_eq!(simplified.id(), x.id());
    }

    #[test]
    fn eq_same_operand_is_true() {
        let x = symbol("x", 8);
        let candidate = Arc::new(Base::assemble(TypeName::Bool, None, Op::eq(x.clone(), x), None));
        let simplified = Simplifier::global().simplify(&candidate).unwrap();
        assert!(simplified.is_true());
    }

    #[test]
    fn fp_is_nan_literal_nan() {
        let nan = Arc::new(Base::assemble(
            TypeName::Fp,
            Some(32),
            Op::literal(LiteralValue::Fp(f64::NAN, FpWidth::F32)),
            None,
        ));
        let candidate = Arc::new(Base::assemble(
            TypeName::Bool,
            None,
            Op::fp_is_nan(nan),
            None,
        ));
        let simplified = Simplifier::global().simplify(&candidate).unwrap();
        assert!(simplified.is_true());
    }

    #[test]
    fn fp_is_inf_literal_plus_infinity() {
        let inf = Arc::new(Base::assemble(
            TypeName::Fp,
            Some(32),
            Op::literal(LiteralValue::Fp(f64::INFINITY, FpWidth::F32)),
            None,
        ));
        let is_nan = Arc::new(Base::assemble(TypeName::Bool, None, Op::fp_is_nan(inf.clone()), None));
        let is_inf = Arc::new(Base::assemble(TypeName::Bool, None, Op::fp_is_inf(inf), None));
        assert!(!Simplifier::global().simplify(&is_nan).unwrap().is_true());
        assert!(Simplifier::global().simplify(&is_inf).unwrap().is_true());
    }

    #[test]
    fn simplify_is_idempotent_by_id() {
        let a = bv_literal(2, 8);
        let b = bv_literal(3, 8);
        let candidate = Arc::new(Base::assemble(TypeName::Bv, Some(8), Op::add(a, b), None));
        let once = Simplifier::global().simplify(&candidate).unwrap();
        let twice = match Simplifier::global().simplify(&once) {
            Some(x) => x,
            None => once.clone(),
        };
        assert_eq!(once.id(), twice.id());
    }
}
