/// Shared error type used across all avatar-recruiter crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// Non-success response from the Bey API.
    #[error("upstream {endpoint} returned {status}: {message}")]
    Upstream {
        endpoint: String,
        status: u16,
        message: String,
        body: String,
    },

    #[error("config: {0}")]
    Config(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
