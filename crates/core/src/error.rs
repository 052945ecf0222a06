#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required credential is absent from the server configuration.
    /// Carries the environment variable name so the caller can be told
    /// exactly what is missing.
    #[error("{0} is not configured on the server.")]
    MissingCredential(&'static str),

    /// The completion backend answered, but no text could be recovered
    /// from any of the known response shapes.
    #[error("No usable text in completion response")]
    NoUsableText,
}
