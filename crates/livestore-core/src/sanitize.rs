//! Result sanitizing step.
//!
//! A uniform transform applied to every result between the executor and
//! channel delivery. The stock use is masking internal error detail before it
//! reaches clients, but any post-processing fits the same seam.

use livestore_commons::models::ExecutionResult;

/// Post-execution transform applied to every delivered result.
pub trait ResultSanitizer: Send + Sync + 'static {
    fn sanitize(&self, result: ExecutionResult) -> ExecutionResult;
}

/// Delivers results untouched. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl ResultSanitizer for Passthrough {
    fn sanitize(&self, result: ExecutionResult) -> ExecutionResult {
        result
    }
}

/// Replaces every query-level error message with a generic one, hiding
/// internal detail from clients. Data and error paths are left intact.
#[derive(Debug, Clone)]
pub struct MaskErrors {
    message: String,
}

impl MaskErrors {
    /// Message used when none is supplied.
    pub const DEFAULT_MESSAGE: &'static str = "Unexpected error.";

    pub fn new() -> Self {
        Self {
            message: Self::DEFAULT_MESSAGE.to_string(),
        }
    }

    /// Use a custom replacement message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for MaskErrors {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSanitizer for MaskErrors {
    fn sanitize(&self, mut result: ExecutionResult) -> ExecutionResult {
        for error in &mut result.errors {
            error.message = self.message.clone();
        }
        result
    }
}
