//! Configuration errors raised by the form engine.

use thiserror::Error;

/// Errors returned when a form is configured inconsistently.
///
/// Validation failures are not errors: they are reported through each
/// field's error sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Following `compare_for` targets from `field` leads back to it.
    #[error("compare-for cycle through field '{field}': {}", .path.join(" -> "))]
    CompareForCycle {
        /// Field being registered or updated.
        field: String,
        /// Names visited, starting and ending with `field`.
        path: Vec<String>,
    },
}
