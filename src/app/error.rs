use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Fetch failed for {url} after {attempts} attempt(s): {cause}")]
    Fetch {
        url: String,
        attempts: u32,
        status: Option<u16>,
        cause: String,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Parse error for {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL is not absolute: {0}")]
    RelativeUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform registered twice: {0}")]
    DuplicatePlatform(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

impl ScoutError {
    pub fn parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Whether the retry loop should try this failure again.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Status { status, .. } => is_retryable_status(*status),
            Self::Render(_) => true,
            _ => false,
        }
    }

    /// HTTP status carried by this failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..600).contains(&status)
}

pub type Result<T> = std::result::Result<T, ScoutError>;
