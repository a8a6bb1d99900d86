use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, instrument};

use crate::provider::types::MarketEnvelope;
use crate::provider::{MarketProvider, ProviderError};
use crate::types::MarketRecord;

/// [`MarketProvider`] backed by a REST endpoint exposing `GET {url}/markets/{id}`.
#[derive(Clone)]
pub struct HttpMarketProvider {
    http: Client,
    base: Url,
}

impl HttpMarketProvider {
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let url = url.into();
        let base = Url::parse(&url).map_err(|e| ProviderError::InvalidUrl(format!("{url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ProviderError::InvalidUrl(url));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, base })
    }

    /// `{base}/markets/{market_id}`, with the id percent-encoded as one path segment.
    pub fn market_url(&self, market_id: &str) -> Result<Url, ProviderError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push("markets")
            .push(market_id);
        Ok(url)
    }
}

#[async_trait]
impl MarketProvider for HttpMarketProvider {
    #[instrument(skip(self), fields(market_id = %market_id), level = "debug")]
    async fn get_market(&self, market_id: &str) -> Result<MarketRecord, ProviderError> {
        let url = self.market_url(market_id)?;

        let resp = self.http.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::MarketNotFound(market_id.to_string()));
        }

        let body = resp.error_for_status()?.bytes().await?;
        let record = MarketEnvelope::parse_record(&body)?;

        debug!(
            yes_price = record.yes_price,
            no_price = record.no_price,
            total_volume = %record.total_volume,
            "market fetched"
        );

        Ok(record)
    }
}
