use reqwest::StatusCode;

use crate::api::types::{
    validate_wallet_list, DetectionConfig, TrackedWallet, TransferCounts, TransferQuery,
};
use crate::error::FeedError;
use crate::feed::types::{CoordinatedTradeEvent, TransferEvent};

/// Authenticated client for the backend's query and configuration endpoints.
///
/// Errors propagate to the calling action; a 401 comes back as
/// `FeedError::Unauthorized` so the caller can tear the session down instead
/// of retrying into a dead token.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session_token,
        }
    }

    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    pub async fn recent_transfers(
        &self,
        query: &TransferQuery,
    ) -> Result<Vec<TransferEvent>, FeedError> {
        let request = self
            .request(reqwest::Method::GET, "/api/transfers")
            .query(&query.to_params());
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn recent_coordinated(
        &self,
        limit: u32,
    ) -> Result<Vec<CoordinatedTradeEvent>, FeedError> {
        let request = self
            .request(reqwest::Method::GET, "/api/coordinated")
            .query(&[("limit", limit.to_string())]);
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn transfer_counts(&self) -> Result<TransferCounts, FeedError> {
        let request = self.request(reqwest::Method::GET, "/api/stats/counts");
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn detection_config(&self) -> Result<DetectionConfig, FeedError> {
        let request = self.request(reqwest::Method::GET, "/api/config");
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn update_detection_config(
        &self,
        config: &DetectionConfig,
    ) -> Result<DetectionConfig, FeedError> {
        for token in &config.excluded_tokens {
            crate::api::types::validate_address(token)?;
        }
        let request = self.request(reqwest::Method::PUT, "/api/config").json(config);
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn tracked_wallets(&self) -> Result<Vec<TrackedWallet>, FeedError> {
        let request = self.request(reqwest::Method::GET, "/api/wallets");
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn update_tracked_wallets(
        &self,
        wallets: &[TrackedWallet],
    ) -> Result<Vec<TrackedWallet>, FeedError> {
        validate_wallet_list(wallets)?;
        let request = self.request(reqwest::Method::PUT, "/api/wallets").json(&wallets);
        let response = checked(request.send().await?).await?;
        Ok(response.json().await?)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = &self.session_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }
}

async fn checked(response: reqwest::Response) -> Result<reqwest::Response, FeedError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(FeedError::Unauthorized);
    }
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(FeedError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn oversized_wallet_update_fails_before_any_network_call() {
        // Base URL points nowhere; the validation error must fire first.
        let client = ApiClient::new("http://127.0.0.1:9", None);
        let wallets: Vec<TrackedWallet> = (0..101)
            .map(|_| TrackedWallet {
                address: "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".into(),
                label: None,
            })
            .collect();
        let err = client.update_tracked_wallets(&wallets).await.unwrap_err();
        assert!(matches!(err, FeedError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_excluded_token_fails_before_any_network_call() {
        let client = ApiClient::new("http://127.0.0.1:9", None);
        let config = DetectionConfig {
            min_transfer_amount: "1000".parse().unwrap(),
            coordination_window_seconds: 300,
            min_coordinated_wallets: 2,
            alerts_enabled: true,
            track_buys: true,
            track_sells: true,
            excluded_tokens: vec!["not-an-address".into()],
        };
        let err = client.update_detection_config(&config).await.unwrap_err();
        assert!(matches!(err, FeedError::Validation(_)));
    }
}
