use thiserror::Error;

/// Failure kinds of the label engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Shader, texture or atlas setup failed. Text rendering cannot continue.
    #[error("label renderer initialization failed: {0}")]
    Initialization(String),

    /// A formatter/atlas mismatch or similar programming error.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A projection rectangle or device surface with no area.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

pub type Result<T> = std::result::Result<T, Error>;
