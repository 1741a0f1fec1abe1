//! Error types for the tictactoe-td crate

use thiserror::Error;

use crate::tictactoe::{Coord, Mark};

/// Main error type for the tictactoe-td crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: cell {coord} is already occupied")]
    InvalidMove { coord: Coord },

    #[error("coordinate ({row}, {col}) is out of bounds (board is {size}x{size})")]
    InvalidCoordinate { row: usize, col: usize, size: usize },

    #[error("cannot parse coordinate '{input}' (expected 'row,col')")]
    ParseCoordinate { input: String },

    #[error("game already over")]
    GameOver,

    #[error("it is {expected}'s turn, not {got}'s")]
    OutOfTurn { expected: Mark, got: Mark },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("episode has not reached a terminal outcome yet")]
    EpisodeInProgress,

    #[error("board '{key}' has winning lines for both marks")]
    AmbiguousOutcome { key: String },

    #[error("invalid state key '{key}': {reason}")]
    InvalidStateKey { key: String, reason: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported value table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// True when the error means the persisted store simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
