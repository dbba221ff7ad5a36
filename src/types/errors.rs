use thiserror::Error;

// === ContractError ===

/// Errors surfaced by contract procedures.
///
/// Every variant maps to a stable wire code (see [`ContractError::code`]) so
/// clients can tell the kinds apart without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// The referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The referenced entity belongs to another user.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// The input is malformed or references inconsistent parents.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The input collides with current state (duplicate id, stale reorder list).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The caller is missing or has no server-side user record.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// No procedure is registered under the given path.
    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),
    /// Storage operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl ContractError {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const FORBIDDEN: &'static str = "FORBIDDEN";
    pub const BAD_REQUEST: &'static str = "BAD_REQUEST";
    pub const CONFLICT: &'static str = "CONFLICT";
    pub const UNAUTHORIZED: &'static str = "UNAUTHORIZED";
    pub const INTERNAL: &'static str = "INTERNAL_SERVER_ERROR";

    /// Wire code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            ContractError::NotFound(_) | ContractError::UnknownProcedure(_) => Self::NOT_FOUND,
            ContractError::Forbidden(_) => Self::FORBIDDEN,
            ContractError::Validation(_) => Self::BAD_REQUEST,
            ContractError::Conflict(_) => Self::CONFLICT,
            ContractError::Unauthorized(_) => Self::UNAUTHORIZED,
            ContractError::Database(_) => Self::INTERNAL,
        }
    }

    /// The message without the kind prefix added by `Display`.
    pub fn message(&self) -> &str {
        match self {
            ContractError::NotFound(m)
            | ContractError::Forbidden(m)
            | ContractError::Validation(m)
            | ContractError::Conflict(m)
            | ContractError::Unauthorized(m)
            | ContractError::UnknownProcedure(m)
            | ContractError::Database(m) => m,
        }
    }

    /// Rebuilds an error from its wire code. Unknown codes become `Database`.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Self::NOT_FOUND => ContractError::NotFound(message),
            Self::FORBIDDEN => ContractError::Forbidden(message),
            Self::BAD_REQUEST => ContractError::Validation(message),
            Self::CONFLICT => ContractError::Conflict(message),
            Self::UNAUTHORIZED => ContractError::Unauthorized(message),
            _ => ContractError::Database(message),
        }
    }
}

impl From<rusqlite::Error> for ContractError {
    fn from(e: rusqlite::Error) -> Self {
        ContractError::Database(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to server settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    Io(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
    /// The key passed to `set_value` is not a settings field.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The value passed to `set_value` does not fit the field's type.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === ClientError ===

/// Errors returned by the typed RPC client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error object.
    #[error(transparent)]
    Rpc(#[from] ContractError),
    /// The transport failed to deliver the request or read the reply.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),
    /// The reply could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
    /// The server refused the line before dispatch (parse error, rate limit).
    #[error("Rejected ({code}): {message}")]
    Rejected { code: String, message: String },
    /// The reply was well-formed JSON but not a valid response.
    #[error("Malformed response: {0}")]
    Malformed(String),
}
