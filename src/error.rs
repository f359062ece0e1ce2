use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server rejected request ({status}): {detail}")]
    Service { status: u16, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("controller error: {0}")]
    Controller(String),

    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

impl AppError {
    /// Message suitable for showing to the user after a failed action.
    /// Server-reported failures surface their `detail` payload verbatim.
    pub fn user_detail(&self) -> String {
        match self {
            AppError::Service { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
