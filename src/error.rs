/// Error returned when an entry cannot be rendered.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    /// The assembled document was rejected by the JSON encoder.
    #[error("failed to marshal fields to JSON: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Error returned when installing the global subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("a global tracing subscriber is already installed")]
    SetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}
