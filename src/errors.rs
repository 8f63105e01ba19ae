use thiserror::Error;

/// Errors produced while serving a chat request.
#[derive(Debug, Error)]
pub enum BotError {
    /// yt-dlp ran but reported a failure
    #[error("yt-dlp failed: {0}")]
    ExtractorError(String),
    /// The extractor returned no format usable for an upload
    #[error("no downloadable formats found")]
    NoFormats,
    #[error("file system error: {0}")]
    FileSystemError(#[from] std::io::Error),
    #[error("Telegram API error: {0}")]
    TelegramError(#[from] teloxide::RequestError),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("invalid callback data: {0}")]
    InvalidCallback(String),
    /// The callback refers to a URL slot that has already been evicted
    #[error("download session expired")]
    SessionExpired,
    #[error("failed to run {command}: {stderr}")]
    ExternalCommandError { command: String, stderr: String },
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("{0}")]
    General(String),
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::ParseError(format!("JSON parsing error: {}", err))
    }
}

impl BotError {
    pub fn extractor_error(msg: impl Into<String>) -> Self {
        Self::ExtractorError(msg.into())
    }

    pub fn invalid_callback(data: impl Into<String>) -> Self {
        Self::InvalidCallback(data.into())
    }

    pub fn external_command_error(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::ExternalCommandError {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}

pub type BotResult<T> = Result<T, BotError>;

pub type HandlerResult = BotResult<()>;
