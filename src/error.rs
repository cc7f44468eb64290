use thiserror::Error;

/// Shown when the backend gave no usable error envelope.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Errors surfaced by the API client and the state containers.
///
/// None of these are fatal: slices store them as a message and the CLI
/// prints them next to the affected view.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend answered with a non-2xx status. `message` comes from the JSON
    /// error envelope when one was present.
    #[error("request failed with status {status}: {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Http { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    /// Body parsed as JSON but not into the expected resource shape.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Rejected locally; no request was sent.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("upload failed: {0}")]
    Upload(String),
}

impl ClientError {
    /// Human-readable message for display next to a panel.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ClientError::Http { .. } => GENERIC_FAILURE.to_string(),
            ClientError::Network(_) => {
                "Could not reach the server. Check your connection and retry.".to_string()
            }
            ClientError::MalformedResponse { .. } => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_message_wins() {
        let err = ClientError::Http {
            status: 402,
            message: Some("Card declined".to_string()),
        };
        assert_eq!(err.user_message(), "Card declined");
    }

    #[test]
    fn missing_or_blank_envelope_falls_back() {
        let none = ClientError::Http {
            status: 500,
            message: None,
        };
        let blank = ClientError::Http {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(none.user_message(), GENERIC_FAILURE);
        assert_eq!(blank.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn validation_message_names_field() {
        let err = ClientError::validation("amount", "must be positive");
        assert_eq!(err.user_message(), "amount: must be positive");
    }
}
