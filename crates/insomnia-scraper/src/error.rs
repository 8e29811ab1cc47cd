use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("store {store_ref} is missing required field `{field}`")]
    MissingField { store_ref: String, field: &'static str },

    #[error("store {store_ref} has non-numeric `{field}`: {value}")]
    InvalidCoordinate {
        store_ref: String,
        field: &'static str,
        value: String,
    },

    #[error("unparseable time \"{value}\" (expected format {format}): {source}")]
    InvalidTime {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },
}
