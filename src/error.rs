use reqwest::StatusCode;

/// Failure of a single JSON fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl FetchError {
    /// Short error kind, the same for every instance of a variant.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "NetworkError",
            Self::Status { .. } => "HttpError",
            Self::Decode { .. } => "SyntaxError",
            Self::Feed(_) => "InputError",
        }
    }
}

/// Caller input that cannot be turned into a request or a view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("no username in profile URL {0:?}")]
    InvalidProfileUrl(String),

    #[error("{0:?} is not a post resource id (expected an http(s) URL containing /posts/)")]
    InvalidPostId(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
