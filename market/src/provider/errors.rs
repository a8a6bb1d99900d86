use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("market {0} not found")]
    MarketNotFound(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("invalid provider url: {0}")]
    InvalidUrl(String),

    #[error("numeric parse error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}
