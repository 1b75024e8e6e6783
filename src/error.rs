use thiserror::Error;

#[allow(dead_code)]
#[derive(Error, Debug)]
pub enum SlopscanError {
    #[error("RATE_LIMIT: {0}")]
    RateLimited(String),

    #[error("AUTH_REQUIRED: {0}")]
    AuthRequiredOrNotFound(String),

    #[error("REMOTE_API: status {status}: {message}")]
    RemoteApi { status: u16, message: String },

    #[error("TRANSPORT: {0}")]
    Transport(String),

    #[error("invalid repository reference: {0} (expected owner/repo)")]
    InvalidRepo(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SlopscanError {
    fn from(err: reqwest::Error) -> Self {
        SlopscanError::Transport(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlopscanError>;
