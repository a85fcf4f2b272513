//! Application error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The display window could not be created or updated.
    #[error("failed to open window: {0}")]
    Window(String),

    /// The hand-landmark source shut down while the app was running.
    #[error("hand source terminated unexpectedly")]
    HandSourceClosed,

    /// The landmark helper process could not be started (camera mode).
    #[error("failed to start landmark helper: {0}")]
    HelperStart(String),
}
