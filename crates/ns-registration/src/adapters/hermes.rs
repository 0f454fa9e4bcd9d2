//! Hermes Price Service Adapter
//!
//! Implements `PriceService` against the Pyth Hermes REST API
//! (`/v2/updates/price/latest`).

use crate::domain::{RegistrationError, Result};
use crate::ports::outbound::{PriceService, PriceUpdate};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const LATEST_PATH: &str = "/v2/updates/price/latest";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    binary: BinaryUpdate,
    #[serde(default)]
    parsed: Vec<ParsedUpdate>,
}

#[derive(Debug, Deserialize)]
struct BinaryUpdate {
    data: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ParsedUpdate {
    id: String,
    price: ParsedPrice,
}

#[derive(Debug, Deserialize)]
struct ParsedPrice {
    price: String,
    conf: String,
    expo: i32,
    publish_time: u64,
}

/// HTTP price service backed by Hermes.
pub struct HermesPriceService {
    client: Client,
    endpoint: String,
}

impl HermesPriceService {
    /// Create a client for `endpoint` (e.g. `https://hermes.pyth.network`).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| RegistrationError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint in use.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn unavailable(reason: impl std::fmt::Display) -> RegistrationError {
    RegistrationError::OracleUnavailable(reason.to_string())
}

/// Turn a `latest` response body into a [`PriceUpdate`] for `price_id`.
fn parse_latest(price_id: &str, body: LatestResponse) -> Result<PriceUpdate> {
    let wanted = price_id.trim_start_matches("0x").to_ascii_lowercase();
    let parsed = body
        .parsed
        .into_iter()
        .find(|p| p.id.trim_start_matches("0x").eq_ignore_ascii_case(&wanted))
        .ok_or_else(|| RegistrationError::UnknownFeed(price_id.to_string()))?;

    let blob = body
        .binary
        .data
        .into_iter()
        .next()
        .ok_or_else(|| unavailable("response carries no update data"))?;
    let update_data = hex::decode(blob.trim_start_matches("0x"))
        .map_err(|e| unavailable(format!("update data is not hex: {e}")))?;

    let price = parsed
        .price
        .price
        .parse::<i64>()
        .map_err(|e| unavailable(format!("bad price field: {e}")))?;
    let conf = parsed
        .price
        .conf
        .parse::<u64>()
        .map_err(|e| unavailable(format!("bad conf field: {e}")))?;

    Ok(PriceUpdate {
        price_id: format!("0x{}", parsed.id.trim_start_matches("0x")),
        price,
        conf,
        expo: parsed.price.expo,
        publish_time: parsed.price.publish_time,
        update_data,
    })
}

#[async_trait]
impl PriceService for HermesPriceService {
    async fn fetch_update(&self, price_id: &str) -> Result<PriceUpdate> {
        let url = format!("{}{}", self.endpoint, LATEST_PATH);
        debug!("[ns-reg] GET {} ids[]={}", url, price_id);

        let response = self
            .client
            .get(&url)
            .query(&[("ids[]", price_id), ("encoding", "hex"), ("parsed", "true")])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    unavailable(format!("cannot connect to {}", self.endpoint))
                } else if e.is_timeout() {
                    unavailable(format!("{} timed out", self.endpoint))
                } else {
                    unavailable(e)
                }
            })?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => {
                warn!("[ns-reg] Price service does not know {}", price_id);
                return Err(RegistrationError::UnknownFeed(price_id.to_string()));
            }
            status if !status.is_success() => {
                return Err(unavailable(format!("price service returned {status}")));
            }
            _ => {}
        }

        let body: LatestResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("failed to parse response: {e}")))?;
        parse_latest(price_id, body)
    }
}
