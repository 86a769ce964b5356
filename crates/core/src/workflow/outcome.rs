use std::fmt::Display;

use truesign_domain::Result;
use tracing::error;

use super::session::{keys, SessionStore, SessionValue};

/// Result of a workflow step as seen by the host
///
/// Failures are also written to the session under `error` so host routing
/// can send the item to a failure queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOutcome {
    pub success: bool,
    pub message: String,
}

impl WorkflowOutcome {
    pub fn capture<T: Display>(session: &dyn SessionStore, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self { success: true, message: value.to_string() },
            Err(err) => {
                let message = err.to_string();
                error!(error = %err, "Workflow step failed");
                session.set(keys::ERROR, SessionValue::Text(message.clone()));
                Self { success: false, message }
            }
        }
    }
}
