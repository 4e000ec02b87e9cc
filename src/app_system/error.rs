use thiserror::Error;

/// Errors raised while configuring, starting or stopping the system.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SystemError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Session task failed: {0}")]
    SessionTaskFailed(String),
}
