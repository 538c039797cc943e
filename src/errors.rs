use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn bad_gateway(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failure of a single call against the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("remote API rejected the token")]
    Unauthorized,

    #[error("token cannot be sent in an Authorization header")]
    InvalidToken,

    #[error("remote API returned {0}")]
    Status(StatusCode),

    #[error("request to remote API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote API returned an unreadable payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status(_) => true,
            // A request that could not be built fails the same way every time.
            Self::Transport(err) => !err.is_builder(),
            Self::Unauthorized | Self::InvalidToken | Self::Malformed(_) => false,
        }
    }
}

/// Terminal outcome of a retried call.
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("invalid token")]
    Unauthorized,

    #[error("unexpected response from the remote API: {0}")]
    Malformed(String),

    #[error("server error after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("SESSION_SECRET must be at least {min} bytes, got {len}")]
    SecretTooShort { min: usize, len: usize },
}
