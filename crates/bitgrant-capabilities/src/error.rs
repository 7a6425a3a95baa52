//! Capability error types.

use thiserror::Error;

/// Errors raised by capability families and owner schemas.
///
/// Only the type and declaration boundaries are strict. Unknown capability
/// names and unrecognized flag values never produce an error; they degrade
/// to `false` or to a no-op.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// A family setter was handed a set belonging to a different family.
    #[error("{expected} expected, got {actual}")]
    TypeMismatch {
        /// Type name of the family the setter belongs to.
        expected: String,
        /// Type name of the family the supplied set belongs to.
        actual: String,
    },

    /// An aggregate default reset named a resource with no declared family.
    #[error("undefined reset operation `{operation}`")]
    ResetNotFound {
        /// Name of the reset operation that does not exist.
        operation: String,
    },

    /// Dynamic member access used a name outside the vocabulary.
    #[error("undefined member `{name}` for {family}")]
    UnknownMember {
        /// Type name of the family that was queried.
        family: String,
        /// The name that is not part of the vocabulary.
        name: String,
    },

    /// A vocabulary could not be built from the supplied names.
    #[error("invalid vocabulary: {reason}")]
    InvalidVocabulary {
        /// Why the vocabulary was rejected.
        reason: String,
    },

    /// A family declaration was rejected.
    #[error("invalid declaration of {family}: {reason}")]
    InvalidDeclaration {
        /// Type name of the family being declared.
        family: String,
        /// Why the declaration was rejected.
        reason: String,
    },

    /// A family is already declared for the same storage field.
    #[error("{family} is already declared on field `{field}`")]
    DuplicateFamily {
        /// Type name of the family being declared.
        family: String,
        /// The storage field both declarations would write.
        field: String,
    },
}

/// Result type for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;
