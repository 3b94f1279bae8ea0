//! Turns execution outcomes into the text returned to the caller.

use log::warn;

use crate::executor::ExecutionResult;

/// The two messages a tool can answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub success: String,
    pub failure: String,
}

impl Messages {
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            failure: failure.into(),
        }
    }

    /// Picks the message matching the outcome.
    ///
    /// Error details are logged, never returned.
    pub fn render(self, result: &ExecutionResult) -> String {
        if result.succeeded {
            self.success
        } else {
            if let Some(detail) = &result.error_detail {
                warn!("{} ({})", self.failure, detail);
            }
            self.failure
        }
    }
}

/// Failure text with the standard remediation hint.
pub fn failed_to(action: &str) -> String {
    format!(
        "Failed to {}. Please check the parameters and try again.",
        action
    )
}
