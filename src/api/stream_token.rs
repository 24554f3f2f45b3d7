use axum::{extract::State, routing::post, Json, Router};

use crate::error::{AppError, Result};
use crate::models::{TokenRequest, TokenResponse};
use crate::state::AppState;

/// Token routes
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/stream-token", post(create_stream_token))
}

/// POST /api/stream-token - Issue a video-service credential.
///
/// The caller has already authenticated through the identity provider; the
/// only input check here is that a user id is present.
async fn create_stream_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>> {
    if request.user_id.is_empty() {
        return Err(AppError::BadRequest("User ID is required".to_string()));
    }

    let token = state.issuer.issue(&request.user_id)?;

    tracing::debug!(user_id = %request.user_id, "Stream token issued");

    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::create_router;
    use crate::auth::{decode_unverified, TokenIssuer};
    use crate::config::Config;
    use crate::state::AppState;

    fn test_config(secret: Option<&str>) -> Config {
        Config {
            server_host: "localhost".to_string(),
            server_port: 8080,
            stream_secret: secret.map(str::to_string),
            token_ttl_seconds: 3600,
        }
    }

    fn test_app(secret: Option<&str>) -> axum::Router {
        let config = test_config(secret);
        let issuer = TokenIssuer::new(&config);
        create_router(AppState::new(config, issuer))
    }

    async fn post_token(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/stream-token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();

        (status, json)
    }

    #[tokio::test]
    async fn test_issues_token_for_user() {
        let app = test_app(Some("test-secret-key"));

        let (status, body) = post_token(app, r#"{"userId":"u1"}"#).await;

        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().expect("token field");
        let claims = decode_unverified(token).expect("decodable claims");
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_missing_user_id_is_rejected() {
        let app = test_app(Some("test-secret-key"));

        let (status, body) = post_token(app, "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User ID is required");
    }

    #[tokio::test]
    async fn test_empty_user_id_is_rejected() {
        let app = test_app(Some("test-secret-key"));

        let (status, body) = post_token(app, r#"{"userId":""}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User ID is required");
    }

    #[tokio::test]
    async fn test_unset_secret_is_a_server_error() {
        let app = test_app(None);

        let (status, body) = post_token(app, r#"{"userId":"u1"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_health_reports_issuer_state() {
        let app = test_app(None);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["token_issuer"], "unconfigured");
    }
}
