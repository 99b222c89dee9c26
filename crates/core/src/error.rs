use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

/// Failures that terminate the current audit.
///
/// None of these are retried automatically; retry policy belongs to the
/// caller issuing a fresh audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The page failed to load.
    #[error("URL could not be loaded: {url}")]
    Navigation { url: String },

    /// HTML_CodeSniffer never became available in the page before the
    /// deadline elapsed.
    #[error("HTML CodeSniffer failed to load before the deadline")]
    ScriptLoadTimeout,

    /// HTML_CodeSniffer never signaled completion before the deadline
    /// elapsed.
    #[error("HTML CodeSniffer did not finish before the deadline")]
    ExecutionTimeout,

    /// The deadline elapsed outside the sniffer wait stages.
    #[error("audit timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// The automation backend failed to start or crashed.
    #[error("browser error: {0}")]
    Browser(String),

    /// An in-page evaluation failed or returned something unusable.
    #[error("evaluation failed: {0}")]
    Eval(String),
}
