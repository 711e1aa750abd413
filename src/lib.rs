//! `symcore`: an immutable, hash-consed symbolic expression core.
//!
//! Expressions (`Bool`, `BV`, `FP`, `String`) are built exclusively through
//! [`factory`] functions, which canonicalize, run one pass of local
//! simplification, and publish the result through a process-wide weak-ref
//! cache ([`cache::Cache`]) keyed by structural [`hash::Hash`]. Two calls
//! that would build the same structural content always return the same
//! [`std::sync::Arc<expr::Base>`].

pub mod annotation;
pub mod cache;
pub mod error;
pub mod expr;
pub mod factory;
pub mod hash;
pub mod op;
pub mod simplify;

pub use annotation::{Annotation, AnnotationSet};
pub use cache::Cache;
pub use error::{CoreError, Result};
pub use expr::{Base, TypeName};
pub use hash::Hash;
pub use op::{FpBinOp, FpWidth, OpKind, Rounding};

/// The expression handle every factory function returns.
pub type Expr = std::sync::Arc<Base>;
