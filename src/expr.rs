//! The expression hierarchy (component C4).
//!
//! `Base` is the single concrete node type; `TypeName` tags which of the
//! source design's Bool/BV/FP/String subvariants a given `Base` represents.
//! Deep inheritance (`Base -> Bits -> BV/FP/String`) is re-architected here
//! as a tagged variant with a shared header, per `spec.md` §9.

use std::sync::Arc;

use crate::annotation::AnnotationSet;
use crate::hash::{self, Hash};
use crate::op::{Op, OpData, OpKind};

/// Which of the four surface types a `Base` is. `Bits` in the source
/// design is abstract (never constructed directly); here it is simply the
/// set `{Bv, Fp, Str}` as tested by [`Base::bit_length`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum TypeName {
    Bool,
    Bv,
    Fp,
    Str,
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TypeName::Bool => "Bool",
            TypeName::Bv => "BV",
            TypeName::Fp => "FP",
            TypeName::Str => "String",
        };
        write!(f, "{s}")
    }
}

/// An immutable, hash-consed node in the symbolic DAG.
///
/// Construction is factory-only: `Base::publish` is `pub(crate)` and is
/// reached exclusively through [`crate::factory`] functions by way of the
/// [`crate::cache::Cache`].
#[derive(Debug)]
pub struct Base {
    id: Hash,
    type_name: TypeName,
    /// `Some` for Bv/Fp/Str; `None` for Bool.
    bit_length: Option<u32>,
    symbolic: bool,
    op: Op,
    annotations: Option<AnnotationSet>,
}

impl Base {
    /// Assembles a candidate node. Does not touch the cache; callers
    /// (`crate::factory::*` via `crate::cache::Cache::find_or_insert`) are
    /// responsible for publishing it as the canonical instance for its id.
    pub(crate) fn assemble(
        type_name: TypeName,
        bit_length: Option<u32>,
        op: Op,
        annotations: Option<AnnotationSet>,
    ) -> Self {
        let symbolic = Self::compute_symbolic(&op);
        let id = Self::compute_id(type_name, bit_length, &op, annotations.as_ref());
        Base {
            id,
            type_name,
            bit_length,
            symbolic,
            op,
            annotations,
        }
    }

    fn compute_symbolic(op: &Op) -> bool {
        if op.kind() == OpKind::Symbol {
            return true;
        }
        if op.kind() == OpKind::Literal {
            return false;
        }
        op.children().iter().any(|child| child.symbolic())
    }

    /// `id` is the structural hash of `(type, op, annotations)`, per
    /// `spec.md` §3's "Invariants" clause on id equality.
    fn compute_id(
        type_name: TypeName,
        bit_length: Option<u32>,
        op: &Op,
        annotations: Option<&AnnotationSet>,
    ) -> Hash {
        let type_tag = match type_name {
            TypeName::Bool => 0,
            TypeName::Bv => 1,
            TypeName::Fp => 2,
            TypeName::Str => 3,
        };
        let bl_hash = Hash(bit_length.unwrap_or(0) as u64);
        let anno_hash = annotations.map(AnnotationSet::hash).unwrap_or(Hash(0));
        hash::combine(
            0x1D_0000_0000 | type_tag,
            &[op.hash(), bl_hash, anno_hash],
        )
    }

    pub fn id(&self) -> Hash {
        self.id
    }

    pub fn type_name(&self) -> TypeName {
        self.type_name
    }

    /// Bit-length, for `Bv`/`Fp`/`Str` nodes only.
    pub fn bit_length(&self) -> Option<u32> {
        self.bit_length
    }

    pub fn symbolic(&self) -> bool {
        self.symbolic
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn annotations(&self) -> Option<&AnnotationSet> {
        self.annotations.as_ref()
    }

    /// Syntactic `is_true`: true iff the op is the literal `Bool(true)`.
    /// Per `spec.md` §9 open question, this is syntactic, not semantic —
    /// it never invokes the simplifier.
    pub fn is_true(&self) -> bool {
        matches!(self.op.data(), OpData::Literal(crate::op::LiteralValue::Bool(true)))
    }

    /// Syntactic `is_false`: true iff the op is the literal `Bool(false)`.
    pub fn is_false(&self) -> bool {
        matches!(self.op.data(), OpData::Literal(crate::op::LiteralValue::Bool(false)))
    }

    /// For `Fp` nodes: the exponent/significand width pair. Width-defining
    /// ops (`Literal`) carry it directly; all other FP ops inherit it from
    /// their first FP child (`spec.md` §3, "FP additionally carries
    /// implicit width information... otherwise the width is inherited from
    /// children").
    pub fn fp_width(&self) -> Option<crate::op::FpWidth> {
        match self.op.data() {
            OpData::Literal(crate::op::LiteralValue::Fp(_, w)) => Some(*w),
            OpData::FpBinary { l, .. } => l.fp_width(),
            _ => None,
        }
    }

    /// Push this node's children (reverse order) onto `stack`. The only
    /// traversal primitive a backend may assume (`spec.md` §6).
    pub fn reversed_children(&self, stack: &mut Vec<Arc<Base>>) {
        self.op.reversed_children(stack)
    }

    /// Render the byte-exact JSON contract from `spec.md` §6.
    pub fn repr(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("type".to_string(), serde_json::json!(self.type_name.to_string()));
        obj.insert("symbolic".to_string(), serde_json::json!(self.symbolic));
        if let Some(bl) = self.bit_length {
            obj.insert("bit_length".to_string(), serde_json::json!(bl));
        }
        obj.insert("op".to_string(), self.op_repr());
        if let Some(annotations) = &self.annotations {
            if !annotations.is_empty() {
                obj.insert(
                    "annotations".to_string(),
                    serde_json::Value::Array(annotations.repr_values()),
                );
            }
        }
        serde_json::Value::Object(obj)
    }

    fn op_repr(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": self.op.kind().name(),
            "hash": self.op.hash().to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(op: Op, annotations: Option<AnnotationSet>) -> Arc<Base> {
        let bit_length = match op.kind() {
            OpKind::Symbol => match op.data() {
                OpData::Symbol { bit_length, .. } => *bit_length,
                _ => unreachable!(),
            },
            _ => None,
        };
        let type_name = if bit_length.is_some() { TypeName::Bv } else { TypeName::Bool };
        Arc::new(Base::assemble(type_name, bit_length, op, annotations))
    }
}

impl PartialEq for Base {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Base {}

impl std::hash::Hash for Base {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.as_u64().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Op;

    #[test]
    fn symbol_is_symbolic() {
        let base = Base::new_for_test(Op::symbol("x", Some(32)), None);
        assert!(base.symbolic());
    }

    #[test]
    fn literal_is_not_symbolic() {
        let base = Base::new_for_test(
            Op::literal(crate::op::LiteralValue::Bool(true)),
            None,
        );
        assert!(!base.symbolic());
    }

    #[test]
    fn id_depends_on_annotations() {
        let op = Op::symbol("x", Some(32));
        let a = Base::assemble(TypeName::Bv, Some(32), op.clone(), None);
        let anno = AnnotationSet::from_vec(vec![crate::annotation::Annotation::new("k", "v")]);
        let b = Base::assemble(TypeName::Bv, Some(32), op, Some(anno));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn repr_omits_bit_length_for_bool() {
        let base = Base::new_for_test(crate::op::Op::literal(crate::op::LiteralValue::Bool(true)), None);
        let repr = base.repr();
        assert!(repr.get("bit_length").is_none());
        assert_eq!(repr["type"], "Bool");
    }

    #[test]
    fn is_true_is_syntactic() {
        let t = Base::new_for_test(Op::literal(crate::op::LiteralValue::Bool(true)), None);
        let f = Base::new_for_test(Op::literal(crate::op::LiteralValue::Bool(false)), None);
        let sym = Base::new_for_test(Op::symbol("b", None), None);
        assert!(t.is_true());
        assert!(!t.is_false());
        assert!(f.is_false());
        assert!(!sym.is_true() && !sym.is_false());
    }
}
