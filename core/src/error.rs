use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Roster is empty: no member available for assignment")]
    EmptyRoster,

    #[error("Invalid task: {reason}")]
    InvalidTask { reason: String },

    #[error("Roster member '{name}' is declared more than once")]
    DuplicateMember { name: String },

    #[error("Unknown assignment strategy '{name}'")]
    UnknownStrategy { name: String },

    #[error("Config error in {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
