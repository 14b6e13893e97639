use thiserror::Error;

/// Errors surfaced by tree construction, encoding and decoding.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Malformed JSON text or a serializer failure, passed through from
    /// `serde_json` unchanged.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A name mapping was built from something that is neither a callable
    /// nor a key/value table.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A key or attribute was looked up in a value that is not a tree.
    #[error("cannot look up {key:?} in a value that is not a tree")]
    NotATree { key: String },
}

impl From<std::convert::Infallible> for TreeError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}
