use thiserror::Error;

/// Unified error type for the entire finance-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Local storage ───────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Business logic / Config ─────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// HTTP status of a server-side failure, if the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of a server-side failure, if the error carries one.
    pub fn body(&self) -> Option<&str> {
        match self {
            CoreError::Api { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; keep query strings out of logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
