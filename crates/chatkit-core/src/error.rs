//! Error types for Chatkit core.

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("Invalid or disconnected connection ID")]
    InvalidConnection,
    /// The signal has been dropped and is no longer available.
    #[error("Signal has been dropped")]
    SignalDropped,
}
