use thiserror::Error;

/// Application error types
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Transport-level failures (DNS, connect, TLS, mid-body disconnect)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx API responses, carrying the server-provided message when
    /// the error body was parseable JSON
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 401 responses, split out so callers can branch into a login flow
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Request or response body (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Message suitable for a user-facing toast
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { message, .. } => message.clone(),
            AppError::Authentication(message) => message.clone(),
            AppError::Network(_) | AppError::Serialization(_) => {
                "An unknown error occurred while searching".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Serialization(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let api = AppError::Api {
            status: 400,
            message: "query must not be empty".to_string(),
        };
        assert_eq!(api.user_message(), "query must not be empty");

        let net = AppError::Network("connection refused".to_string());
        assert_eq!(net.user_message(), "An unknown error occurred while searching");
    }
}
