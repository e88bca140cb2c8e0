use isahc::{config::Configurable, prelude::*, HttpClient};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use async_trait::async_trait;

use crate::models::QuoteField;
use crate::services::provider::{ProviderError, QuoteProvider};

const DEFAULT_BASE_URL: &str = "https://api.iextrading.com/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

impl From<isahc::Error> for ProviderError {
    fn from(error: isahc::Error) -> Self {
        ProviderError::Network(error.to_string())
    }
}

/// Batched quote transport against an IEX-style REST surface.
///
/// Last trades come from the token-less `tops` endpoint; previous closes
/// need the batch quote endpoint. Both answer with one JSON record per
/// requested symbol, which the overlay scans without deserializing.
pub struct IexQuoteClient {
    client: HttpClient,
    base_url: String,
}

impl IexQuoteClient {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn quotes_url(&self, tickers: &[&str], field: QuoteField) -> String {
        let symbols = tickers.join(",");
        match field {
            QuoteField::LastTrade => format!("{}/tops?symbols={}", self.base_url, symbols),
            QuoteField::PreviousClose => format!(
                "{}/stock/market/batch?symbols={}&types=quote",
                self.base_url, symbols
            ),
        }
    }
}

#[async_trait]
impl QuoteProvider for IexQuoteClient {
    async fn fetch_batch_quotes(
        &self,
        tickers: &[&str],
        field: QuoteField,
    ) -> Result<String, ProviderError> {
        let url = self.quotes_url(tickers, field);
        let mut last_error = ProviderError::Network("no attempts made".to_string());

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay =
                    Duration::from_secs_f64(2.0_f64.powi(attempt as i32 - 1) + rand::random::<f64>());
                let delay = delay.min(Duration::from_secs(60));
                info!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    reason = %last_error,
                    wait_secs = delay.as_secs_f64(),
                    "retrying quote request"
                );
                sleep(delay).await;
            }

            debug!(attempt = attempt + 1, url = %url, symbols = tickers.len(), "requesting quotes");

            let request = isahc::Request::builder()
                .uri(&url)
                .method("GET")
                .header("Accept", "application/json, text/plain, */*")
                .header("Accept-Encoding", "gzip, deflate")
                .header("User-Agent", USER_AGENT)
                .body(())
                .map_err(|e| ProviderError::InvalidResponse(format!("request build error: {}", e)))?;

            match self.client.send_async(request).await {
                Ok(mut response) => {
                    let status = response.status();
                    if status.is_success() {
                        match response.text().await {
                            Ok(text) => return Ok(text),
                            Err(e) => {
                                last_error =
                                    ProviderError::Network(format!("response body error: {}", e));
                                continue;
                            }
                        }
                    } else if status == 429 {
                        last_error = ProviderError::RateLimited;
                        continue;
                    } else if status.is_server_error() {
                        last_error = ProviderError::Http {
                            status: status.as_u16(),
                        };
                        continue;
                    } else {
                        // Remaining 4xx are request problems, not worth retrying.
                        return Err(ProviderError::Http {
                            status: status.as_u16(),
                        });
                    }
                }
                Err(e) => {
                    last_error = ProviderError::Network(e.to_string());
                    continue;
                }
            }
        }

        Err(last_error)
    }
}
