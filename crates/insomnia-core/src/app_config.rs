/// Upstream store-search endpoint queried once per region code.
pub const DEFAULT_ENDPOINT_URL: &str = "https://insomniacookies.com/locations/searchStores";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub endpoint_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Minimum gap between the starts of two outbound requests.
    pub inter_request_delay_ms: u64,
    /// Upper bound on region requests in flight at once.
    pub max_concurrent_regions: usize,
    /// Additional attempts after the first failure, for transient errors only.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}
