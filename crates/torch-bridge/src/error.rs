//! Error types for puzzle input and solving.

use thiserror::Error;

/// Errors raised while reading, validating or solving a puzzle
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The puzzle has no entities to move
    #[error("puzzle has no entities")]
    NoEntities,

    /// Two entities share an identifier
    #[error("duplicate entity id: {0}")]
    DuplicateEntity(String),

    /// An entity crosses in zero time
    #[error("entity {0} must have a positive duration")]
    NonPositiveDuration(String),

    /// An entity id is empty or whitespace
    #[error("entity id must not be blank")]
    BlankEntityId,

    /// No crossing sequence reaches the far bank
    #[error("goal configuration is unreachable")]
    GoalUnreachable,

    /// An inline `ID=DURATION` argument could not be parsed
    #[error("invalid entity argument {0:?}, expected ID=DURATION")]
    InvalidEntityArg(String),

    #[error("failed to parse puzzle JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PuzzleError {
    /// Short machine-readable tag used in CLI output
    pub fn reason(&self) -> &'static str {
        match self {
            PuzzleError::NoEntities
            | PuzzleError::DuplicateEntity(_)
            | PuzzleError::NonPositiveDuration(_)
            | PuzzleError::BlankEntityId
            | PuzzleError::InvalidEntityArg(_) => "invalid_input",
            PuzzleError::GoalUnreachable => "goal_unreachable",
            PuzzleError::Parse(_) => "parse_error",
            PuzzleError::Io(_) => "io_error",
        }
    }
}

/// Result type alias for puzzle operations
pub type Result<T> = std::result::Result<T, PuzzleError>;
