use std::env;
use std::time::Duration;

use crate::error::FeedError;
use crate::feed::types::StreamKind;
use crate::stream::RetryPolicy;

/// Stream endpoint table. All URLs are injected by the environment; the
/// pipeline itself carries no hard-coded endpoints.
#[derive(Clone, Debug)]
pub struct StreamEndpoints {
    pub combined: String,
    pub transfers: String,
    pub coordinated: String,
}

impl StreamEndpoints {
    pub fn url_for(&self, kind: StreamKind) -> &str {
        match kind {
            StreamKind::Combined => &self.combined,
            StreamKind::Transfers => &self.transfers,
            StreamKind::Coordinated => &self.coordinated,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub api_base_url: String,
    pub session_token: Option<String>,
    pub endpoints: StreamEndpoints,
    pub retry: RetryPolicy,
}

impl FeedConfig {
    pub fn load_from_env() -> Result<Self, FeedError> {
        let endpoints = StreamEndpoints {
            combined: require_var("WHALE_STREAM_URL")?,
            transfers: require_var("WHALE_TRANSFERS_STREAM_URL")?,
            coordinated: require_var("WHALE_COORDINATED_STREAM_URL")?,
        };

        let mut retry = RetryPolicy::default();
        if let Ok(raw) = env::var("WHALE_STREAM_RETRY_DELAY_MS") {
            let ms: u64 = raw
                .parse()
                .map_err(|_| FeedError::Config(format!("WHALE_STREAM_RETRY_DELAY_MS is not a number: {}", raw)))?;
            retry.retry_delay = Duration::from_millis(ms);
        }
        if let Ok(raw) = env::var("WHALE_STREAM_MAX_ATTEMPTS") {
            retry.max_attempts = raw
                .parse()
                .map_err(|_| FeedError::Config(format!("WHALE_STREAM_MAX_ATTEMPTS is not a number: {}", raw)))?;
        }

        Ok(Self {
            api_base_url: require_var("WHALE_API_BASE_URL")?,
            session_token: env::var("WHALE_SESSION_TOKEN").ok(),
            endpoints,
            retry,
        })
    }
}

fn require_var(name: &str) -> Result<String, FeedError> {
    env::var(name).map_err(|_| FeedError::Config(format!("{} must be set", name)))
}
