//! Creation factories (component C7): the only public path by which
//! `Expr`essions come into being (`spec.md` §4.6). Each function here
//! follows the eight-step template in `spec.md` §4.6: validate operand
//! types, compute the derived bit-length and symbolic flag, assemble an
//! `Op`, run the simplifier, and publish through the cache.
//!
//! Null-operand checks from the source design (`Util::affirm(x !=
//! nullptr, ...)`) have no Rust analogue: `Arc<Base>` is never null, so
//! that failure mode simply cannot occur here.

pub mod bool_;
pub mod bv;
pub mod fp;
pub mod generic;
pub mod string;

use std::sync::Arc;

use crate::cache::Cache;
use crate::error::Result;
use crate::expr::Base;
use crate::op::OpKind;
use crate::simplify::Simplifier;

/// Canonicalize the operand order of a commutative op before hashing, so
/// that `op(a, b).id() == op(b, a).id()` (`spec.md` §4.3/§8). Literals are
/// moved to the right; otherwise operands are ordered by ascending id.
pub(crate) fn canonicalize_commutative(l: Arc<Base>, r: Arc<Base>) -> (Arc<Base>, Arc<Base>) {
    let l_lit = l.op().kind() == OpKind::Literal;
    let r_lit = r.op().kind() == OpKind::Literal;
    match (l_lit, r_lit) {
        (true, false) => (r, l),
        (false, true) => (l, r),
        _ => {
            if l.id().as_u64() <= r.id().as_u64() {
                (l, r)
            } else {
                (r, l)
            }
        }
    }
}

/// Run the simplifier on `candidate`, then publish whichever of
/// `candidate`/its replacement is canonical through the global cache
/// (`spec.md` §4.6 steps 7-8).
pub(crate) fn publish(candidate: Arc<Base>) -> Result<Arc<Base>> {
    let kind = candidate.op().kind();
    tracing::trace!(op = kind.name(), "factory: assembled candidate");
    if let Some(replacement) = Simplifier::global().simplify(&candidate) {
        tracing::debug!(
            op = kind.name(),
            replacement_op = replacement.op().kind().name(),
            "factory: simplifier rewrote candidate"
        );
        let hash = replacement.id();
        return Cache::global().find_or_insert(hash, || replacement);
    }
    let hash = candidate.id();
    Cache::global().find_or_insert(hash, || candidate)
}
