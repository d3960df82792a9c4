use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A chart request named a group-by option the target event type does
    /// not declare. This is a caller bug, not bad data.
    #[error("unknown group-by option `{option}` for {domain} events")]
    UnknownOption { option: String, domain: String },
    /// A chart request is missing a role the requested chart shape needs
    /// (e.g. a box plot without an X axis).
    #[error("chart settings missing required {role} assignment")]
    MissingRole { role: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
