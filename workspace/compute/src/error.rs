use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// Multiplying odds left the representable decimal range
    #[error("Odd overflow after {legs} pronostics")]
    OddOverflow { legs: usize },
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
