use serde::Deserialize;

use crate::provider::ProviderError;
use crate::types::MarketRecord;

#[derive(Debug, Deserialize)]
pub struct MarketEnvelope {
    pub market: MarketDto,
}

/// Wire shape of `GET /markets/{id}`.
///
/// Amounts are decimal strings so 18-decimal volumes survive JSON.
#[derive(Debug, Deserialize)]
pub struct MarketDto {
    pub market_id: String,

    pub yes_price: String,
    pub no_price: String,

    pub total_volume: String,

    #[serde(default)]
    pub last_trader: Option<String>,
    pub last_trade_size: String,
}

impl MarketEnvelope {
    /// Decode a `GET /markets/{id}` body straight into a [`MarketRecord`].
    pub fn parse_record(body: &[u8]) -> Result<MarketRecord, ProviderError> {
        let envelope: MarketEnvelope = serde_json::from_slice(body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        MarketRecord::try_from(envelope.market)
    }
}

impl TryFrom<MarketDto> for MarketRecord {
    type Error = ProviderError;

    fn try_from(dto: MarketDto) -> Result<Self, Self::Error> {
        Ok(Self {
            yes_price: dto.yes_price.trim().parse()?,
            no_price: dto.no_price.trim().parse()?,
            total_volume: dto.total_volume.trim().parse()?,
            last_trade_size: dto.last_trade_size.trim().parse()?,
            // Providers report "no trade yet" as null or as an empty string.
            last_trader: dto.last_trader.filter(|t| !t.is_empty()),
            market_id: dto.market_id,
        })
    }
}
