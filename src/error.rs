//! Error taxonomy (component C8).
//!
//! Five kinds, matching `spec.md` §7: `Usage`, `Type`, `Size`, `Backend`,
//! `Unexpected`. Every variant carries the factory call site (captured via
//! `#[track_caller]`) and a human-readable message naming the op and the
//! failing operand role. No cache mutation ever occurs once a `CoreError`
//! has been raised.

use std::panic::Location;

use miette::Diagnostic;
use thiserror::Error;

use crate::hash::Hash;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error, Diagnostic)]
pub enum CoreError {
    /// Misuse of the API: nil operand, wrong arity, inconsistent annotations.
    #[error("{op} usage error at {location}: {message}")]
    #[diagnostic(code(symcore::usage))]
    Usage {
        op: &'static str,
        message: String,
        location: &'static Location<'static>,
    },

    /// An operand's dynamic type does not match the op's contract.
    #[error("{op} {role} operand must be {expected} at {location}")]
    #[diagnostic(code(symcore::type_mismatch))]
    Type {
        op: &'static str,
        role: &'static str,
        expected: &'static str,
        location: &'static Location<'static>,
    },

    /// Operand bit-lengths disagree, or a derived bit-length is non-positive.
    #[error("{op} size error at {location}: {message}")]
    #[diagnostic(code(symcore::size_mismatch))]
    Size {
        op: &'static str,
        message: String,
        location: &'static Location<'static>,
    },

    /// Raised by a collaborator backend; the core wraps but does not
    /// interpret it.
    #[error("backend error: {message}")]
    #[diagnostic(code(symcore::backend))]
    Backend { message: String },

    /// An internal invariant was violated. Indicates a bug in the core
    /// itself; fatal-by-convention (`spec.md` §7).
    #[error("internal invariant violated at {location}: {message}")]
    #[diagnostic(code(symcore::unexpected))]
    Unexpected {
        message: String,
        location: &'static Location<'static>,
    },
}

impl CoreError {
    #[track_caller]
    pub fn usage(op: &'static str, message: impl Into<String>) -> Self {
        CoreError::Usage {
            op,
            message: message.into(),
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn type_mismatch(op: &'static str, role: &'static str, expected: &'static str) -> Self {
        CoreError::Type {
            op,
            role,
            expected,
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn size(op: &'static str, message: impl Into<String>) -> Self {
        CoreError::Size {
            op,
            message: message.into(),
            location: Location::caller(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        CoreError::Backend {
            message: message.into(),
        }
    }

    #[track_caller]
    pub fn unexpected(message: impl Into<String>) -> Self {
        CoreError::Unexpected {
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// Build the `Unexpected` error for a hash collision between distinct
    /// structural content (`spec.md` §4.5 collision policy).
    #[track_caller]
    pub fn hash_collision(hash: Hash) -> Self {
        CoreError::unexpected(format!(
            "hash collision on {hash}: distinct structural content mapped to the same id"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_error_names_op_and_role() {
        let err = CoreError::type_mismatch("Add", "left", "BV");
        assert_eq!(err.to_string(), format!(
            "Add left operand must be BV at {}",
            match &err {
                CoreError::Type { location, .. } => location,
                _ => unreachable!(),
            }
        ));
        assert!(err.to_string().contains("Add"));
        assert!(err.to_string().contains("left"));
    }

    #[test]
    fn usage_error_carries_location() {
        let err = CoreError::usage("Concat", "operand pointers cannot be nil");
        match err {
            CoreError::Usage { location, .. } => assert!(location.file().ends_with(".rs")),
            _ => panic!("wrong variant"),
        }
    }
}
