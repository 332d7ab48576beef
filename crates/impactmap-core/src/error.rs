pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not have the Impact/Outcomes shape. Raised before any layout work.
    #[error("Malformed snapshot: {message}")]
    MalformedSnapshot { message: String },

    #[error("Unknown {kind}: {id}")]
    UnknownItem { kind: &'static str, id: String },

    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSnapshot {
            message: message.into(),
        }
    }

    pub(crate) fn unknown(kind: &'static str, id: &str) -> Self {
        Self::UnknownItem {
            kind,
            id: id.to_string(),
        }
    }
}
