//! HTTP client for the store-locator `searchStores` endpoint.

mod harvest;
mod origin;

use std::time::Duration;

use insomnia_core::AppConfig;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::rate_limit::{retry_with_backoff, RequestThrottle};
use crate::types::{RegionResponse, SearchStoresResponse};

pub use harvest::{RegionHarvest, RegionRecords};
#[cfg(test)]
use origin::{endpoint_origin, extract_domain, locations_referer};

const SEARCH_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const SEARCH_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const SEARCH_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// HTTP client that issues one form-encoded `POST` per region code.
///
/// Every request carries the same fixed header set the locator page sends
/// (content negotiation, origin/referer, keep-alive). Request starts are
/// spaced by a shared [`RequestThrottle`], and transient failures (network
/// errors, 429, 5xx) are retried with exponential backoff up to
/// `max_retries` additional attempts.
pub struct LocatorClient {
    client: Client,
    endpoint: Url,
    domain: String,
    search_headers: HeaderMap,
    throttle: RequestThrottle,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl LocatorClient {
    /// Creates a client for `endpoint_url`.
    ///
    /// `inter_request_delay_ms` is the minimum gap between request starts,
    /// shared across concurrent region tasks. `max_retries` is the number of
    /// additional attempts after a transient failure; `0` disables retries.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidEndpoint`] if `endpoint_url` is not an
    ///   absolute http(s) URL.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        endpoint_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        inter_request_delay_ms: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let endpoint = Self::parse_endpoint(endpoint_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let origin = origin::endpoint_origin(&endpoint);
        let referer = origin::locations_referer(&origin);
        let domain = origin::extract_domain(&endpoint);
        let search_headers = search_headers(endpoint_url, &origin, &referer)?;

        Ok(Self {
            client,
            endpoint,
            domain,
            search_headers,
            throttle: RequestThrottle::new(Duration::from_millis(inter_request_delay_ms)),
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from the scraper settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`LocatorClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.endpoint_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.inter_request_delay_ms,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    /// The endpoint every search is posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Posts `state=<region>` to the search endpoint and decodes the
    /// response body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status (5xx retried).
    /// - [`ScraperError::Http`]: network or TLS failure after all retries exhausted.
    /// - [`ScraperError::Deserialize`]: body is not a JSON object (not retried).
    pub async fn search_stores(&self, region: &str) -> Result<RegionResponse, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            self.throttle.wait().await;
            tracing::debug!(region, endpoint = %self.endpoint, "searching stores");

            let response = self
                .client
                .post(self.endpoint.clone())
                .form(&[("state", region)])
                .headers(self.search_headers.clone())
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.trim().parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(ScraperError::RateLimited {
                    domain: self.domain.clone(),
                    retry_after_secs,
                });
            }

            if !status.is_success() {
                return Err(ScraperError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: self.endpoint.to_string(),
                });
            }

            let website = response.url().to_string();
            let body = response.text().await?;
            let parsed = serde_json::from_str::<SearchStoresResponse>(&body).map_err(|e| {
                ScraperError::Deserialize {
                    context: format!("store search for region {region}"),
                    source: e,
                }
            })?;

            Ok(RegionResponse {
                region: region.to_owned(),
                website,
                body: parsed,
            })
        })
        .await
    }

    /// Parses and checks the endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidEndpoint`] if the URL does not parse,
    /// is not http(s), or has no host.
    fn parse_endpoint(endpoint_url: &str) -> Result<Url, ScraperError> {
        let invalid = |reason: String| ScraperError::InvalidEndpoint {
            url: endpoint_url.to_owned(),
            reason,
        };

        let url = Url::parse(endpoint_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme \"{}\"", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_owned()));
        }
        Ok(url)
    }
}

/// Fixed header set sent with every search. Applied after the form body so
/// the charset-qualified content type replaces the bare one.
fn search_headers(
    endpoint_url: &str,
    origin: &str,
    referer: &str,
) -> Result<HeaderMap, ScraperError> {
    let value = |raw: &str| {
        HeaderValue::from_str(raw).map_err(|e| ScraperError::InvalidEndpoint {
            url: endpoint_url.to_owned(),
            reason: format!("cannot use \"{raw}\" as a header value: {e}"),
        })
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(SEARCH_ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(SEARCH_ACCEPT_LANGUAGE),
    );
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(SEARCH_CONTENT_TYPE));
    headers.insert(header::ORIGIN, value(origin)?);
    headers.insert(header::REFERER, value(referer)?);
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    Ok(headers)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
