use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Upstream summary source or side-query failure. Propagated unchanged;
    /// the engine never retries and never assembles a partial overview.
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("snapshot decode error: {0}")]
    Decode(String),

    #[error("invalid scope: {0}")]
    InvalidScope(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
