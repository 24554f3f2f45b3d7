use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::auth::{decode_unverified, TokenIssuer};
use crate::call::services::{ServiceError, TokenProvider};
use crate::models::TokenResponse;

/// Token provider backed by the app's own `POST /api/stream-token`.
#[derive(Clone)]
pub struct HttpTokenProvider {
    client: Client,
    endpoint: String,
}

impl HttpTokenProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/stream-token", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TokenProvider for HttpTokenProvider {
    async fn fetch_token(&self, user_id: &str) -> Result<String, ServiceError> {
        tracing::debug!(user_id = %user_id, "Fetching stream token");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "userId": user_id }))
            .send()
            .await
            .map_err(|e| ServiceError::Connectivity(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::Rejected(format!(
                "failed to fetch stream token: {}",
                response.status()
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Other(e.to_string()))?;

        if let Ok(claims) = decode_unverified(&body.token) {
            tracing::debug!(user_id = %claims.user_id, exp = claims.exp, "Token payload decoded");
        }

        Ok(body.token)
    }
}

/// Token provider that signs in-process. Used by tests and single-binary
/// deployments where the issuer lives next to the controller.
#[derive(Clone)]
pub struct IssuerTokenProvider {
    issuer: TokenIssuer,
}

impl IssuerTokenProvider {
    pub fn new(issuer: TokenIssuer) -> Self {
        Self { issuer }
    }
}

#[async_trait]
impl TokenProvider for IssuerTokenProvider {
    async fn fetch_token(&self, user_id: &str) -> Result<String, ServiceError> {
        self.issuer
            .issue(user_id)
            .map_err(|e| ServiceError::Rejected(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_endpoint_path_tolerates_trailing_slash() {
        let provider = HttpTokenProvider::new("http://localhost:8080/");
        assert_eq!(provider.endpoint, "http://localhost:8080/api/stream-token");
    }

    #[tokio::test]
    async fn test_issuer_provider_returns_decodable_token() {
        let config = Config {
            server_host: "localhost".to_string(),
            server_port: 8080,
            stream_secret: Some("test-secret-key".to_string()),
            token_ttl_seconds: 3600,
        };
        let provider = IssuerTokenProvider::new(TokenIssuer::new(&config));

        let token = provider.fetch_token("u1").await.expect("Should fetch");
        let claims = decode_unverified(&token).expect("Should decode");

        assert_eq!(claims.user_id, "u1");
    }

    #[tokio::test]
    async fn test_issuer_provider_surfaces_missing_secret() {
        let config = Config {
            server_host: "localhost".to_string(),
            server_port: 8080,
            stream_secret: None,
            token_ttl_seconds: 3600,
        };
        let provider = IssuerTokenProvider::new(TokenIssuer::new(&config));

        let result = provider.fetch_token("u1").await;
        assert!(matches!(result, Err(ServiceError::Rejected(_))));
    }
}
