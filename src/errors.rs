use reqwest::StatusCode;
use serde::Serialize;

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(
        #[from]
        #[serde(skip)]
        reqwest::Error,
    ),

    #[error("Unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        #[serde(serialize_with = "serialize_status")]
        status: StatusCode,
        endpoint: String,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

fn serialize_status<S: serde::Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> Self {
        ServiceError::ConfigurationError(format!("invalid URL: {}", err))
    }
}

impl ServiceError {
    /// Whether the failure came from talking to the inventory service rather
    /// than from local input.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::UnexpectedStatus { .. } | Self::SerializationError(_)
        )
    }

    /// Text suitable for a user-facing notification.
    /// Transport and decoding failures return generic messages to avoid leaking details.
    pub fn notification_message(&self) -> String {
        match self {
            Self::Http(err) if err.is_timeout() => {
                "Inventory service did not respond in time".to_string()
            }
            Self::Http(_) => "Unable to reach inventory service".to_string(),
            Self::UnexpectedStatus { status, .. } if status.is_server_error() => {
                "Inventory service error".to_string()
            }
            Self::UnexpectedStatus { status, .. } => {
                format!(
                    "Request rejected by inventory service ({})",
                    status.as_u16()
                )
            }
            Self::SerializationError(_) => "Unexpected response from inventory service".to_string(),
            // For user-facing errors, return the actual message
            _ => self.to_string(),
        }
    }
}
