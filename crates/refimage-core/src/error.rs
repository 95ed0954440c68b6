//! Validation error for caller-supplied reference strings.

use thiserror::Error;

/// Errors raised when a caller-supplied value cannot be turned into a
/// canonical [`Reference`](crate::Reference).
///
/// Validation is purely local: a value that fails here must never reach the
/// cache or the remote content store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The input did not reduce to exactly 7 decimal digits.
    #[error(
        "invalid reference format: {input:?} — expected NNNNNNN (7 digits), NNN.NNNN, or NNN-NNNN"
    )]
    InvalidReference {
        /// The offending input, whitespace-trimmed.
        input: String,
    },
}
