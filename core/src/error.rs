use thiserror::Error;

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid stat set: {reason}")]
    InvalidStatSet { reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Category '{id}' not found")]
    UnknownCategory { id: String },

    #[error("Need at least {needed} golfers with {cards}+ events. Found {found}.")]
    InsufficientGolfers { needed: usize, cards: usize, found: usize },

    #[error("Invalid sport '{sport}'")]
    InvalidSport { sport: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PuzzleResult<T> = Result<T, PuzzleError>;
