//! Annotation sets (component C2).
//!
//! An `AnnotationSet` is an ordered, immutable, hashable sequence of
//! opaque annotations attached to an [`crate::expr::Expr`]. Two sets with
//! identical elements in identical order hash identically; creating the
//! same op with different annotation sets must yield different ids
//! (`spec.md` §8, "annotation discrimination").

use std::sync::Arc;

use crate::hash::{self, Hash};

/// A single opaque, hashable annotation record.
///
/// The core treats annotations as caller-defined metadata: it never
/// inspects their meaning, only their hash and their rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    name: String,
    value: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    fn hash(&self) -> Hash {
        hash::combine(
            0xA17A,
            &[
                crate::hash::Singular::singular(self.name.as_str()),
                crate::hash::Singular::singular(self.value.as_str()),
            ],
        )
    }
}

/// An immutable, ordered, shareable sequence of [`Annotation`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationSet {
    elements: Arc<[Annotation]>,
}

impl AnnotationSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self {
            elements: Arc::from(Vec::new().into_boxed_slice()),
        }
    }

    /// A set containing `elements` in the given order.
    pub fn from_vec(elements: Vec<Annotation>) -> Self {
        Self {
            elements: Arc::from(elements.into_boxed_slice()),
        }
    }

    /// Returns a new set with `annotation` appended; does not mutate `self`.
    pub fn extend(&self, annotation: Annotation) -> Self {
        let mut elements: Vec<Annotation> = self.elements.iter().cloned().collect();
        elements.push(annotation);
        Self::from_vec(elements)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.elements.iter()
    }

    /// The set hash: the concatenation, in order, of element hashes.
    pub fn hash(&self) -> Hash {
        let parts: Vec<Hash> = self.elements.iter().map(Annotation::hash).collect();
        hash::combine(0x5E7A, &parts)
    }

    /// Append each element's JSON representation to `out`, used by
    /// [`crate::expr::Expr::repr`].
    pub fn repr_values(&self) -> Vec<serde_json::Value> {
        self.elements
            .iter()
            .map(|a| serde_json::json!({ "name": a.name, "value": a.value }))
            .collect()
    }
}

impl Default for AnnotationSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sets_hash_equal() {
        assert_eq!(AnnotationSet::empty().hash(), AnnotationSet::empty().hash());
    }

    #[test]
    fn order_matters() {
        let a = Annotation::new("k", "1");
        let b = Annotation::new("k", "2");
        let ab = AnnotationSet::from_vec(vec![a.clone(), b.clone()]);
        let ba = AnnotationSet::from_vec(vec![b, a]);
        assert_ne!(ab.hash(), ba.hash());
    }

    #[test]
    fn extend_does_not_mutate_original() {
        let base = AnnotationSet::empty();
        let extended = base.extend(Annotation::new("k", "v"));
        assert!(base.is_empty());
        assert!(!extended.is_empty());
    }

    #[test]
    fn identical_elements_hash_equal() {
        let a = AnnotationSet::from_vec(vec![Annotation::new("k", "v")]);
        let b = AnnotationSet::from_vec(vec![Annotation::new("k", "v")]);
        assert_eq!(a.hash(), b.hash());
    }
}
