/// OAuth access tokens for the Cloud KMS API.
///
/// Either a static token from the environment or one fetched from the GCE
/// metadata server (Cloud Run, Cloud Functions, GCE, GKE).
use std::fmt;

use linehook_config::SecretsConfig;
use linehook_core::DecryptionError;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Clone)]
pub enum AccessTokenSource {
    Static(String),
    Metadata { url: String },
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl AccessTokenSource {
    pub fn from_config(config: &SecretsConfig) -> Self {
        match &config.access_token {
            Some(token) => Self::Static(token.clone()),
            None => Self::metadata(),
        }
    }

    pub fn metadata() -> Self {
        Self::Metadata {
            url: METADATA_TOKEN_URL.to_string(),
        }
    }

    pub async fn token(&self, http: &Client) -> Result<String, DecryptionError> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::Metadata { url } => {
                debug!(url = %url, "Fetching access token from metadata server");
                let res = http
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| DecryptionError::Auth(e.to_string()))?;
                if !res.status().is_success() {
                    return Err(DecryptionError::Auth(format!(
                        "metadata server answered HTTP {}",
                        res.status().as_u16()
                    )));
                }
                let token: MetadataToken = res
                    .json()
                    .await
                    .map_err(|e| DecryptionError::Auth(e.to_string()))?;
                Ok(token.access_token)
            }
        }
    }
}

impl fmt::Debug for AccessTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Static(***)"),
            Self::Metadata { url } => f.debug_struct("Metadata").field("url", url).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use tokio::net::TcpListener;

    const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Metadata server that only answers requests carrying `Metadata-Flavor: Google`.
    async fn metadata_token(headers: HeaderMap) -> axum::response::Response {
        if headers.get("metadata-flavor").and_then(|v| v.to_str().ok()) != Some("Google") {
            return (StatusCode::FORBIDDEN, "missing Metadata-Flavor").into_response();
        }
        Json(json!({ "access_token": "ya29.x", "expires_in": 3599, "token_type": "Bearer" }))
            .into_response()
    }

    async fn metadata_source(router: Router) -> AccessTokenSource {
        let base = serve(router).await;
        AccessTokenSource::Metadata {
            url: format!("{base}{TOKEN_PATH}"),
        }
    }

    #[test]
    fn prefers_configured_token() {
        let config = SecretsConfig {
            access_token: Some("ya29.static".into()),
            ..SecretsConfig::default()
        };
        let source = AccessTokenSource::from_config(&config);
        assert!(matches!(source, AccessTokenSource::Static(ref t) if t == "ya29.static"));
        assert_eq!(format!("{source:?}"), "Static(***)");
    }

    #[test]
    fn falls_back_to_metadata_server() {
        let source = AccessTokenSource::from_config(&SecretsConfig::default());
        assert!(matches!(source, AccessTokenSource::Metadata { ref url } if url == METADATA_TOKEN_URL));
    }

    #[tokio::test]
    async fn fetches_token_from_metadata_server() {
        let source = metadata_source(Router::new().route(TOKEN_PATH, get(metadata_token))).await;
        let token = source.token(&Client::new()).await.unwrap();
        assert_eq!(token, "ya29.x");
    }

    #[tokio::test]
    async fn metadata_server_requires_flavor_header() {
        let source = metadata_source(Router::new().route(TOKEN_PATH, get(metadata_token))).await;
        let AccessTokenSource::Metadata { url } = &source else {
            unreachable!()
        };
        let res = Client::new().get(url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_metadata_route_is_auth_error() {
        let source = metadata_source(Router::new()).await;
        let err = source.token(&Client::new()).await.unwrap_err();
        assert!(matches!(err, DecryptionError::Auth(ref m) if m.contains("404")));
    }

    #[tokio::test]
    async fn non_json_metadata_body_is_auth_error() {
        let router = Router::new().route(TOKEN_PATH, get(|| async { "not json" }));
        let source = metadata_source(router).await;
        let err = source.token(&Client::new()).await.unwrap_err();
        assert!(matches!(err, DecryptionError::Auth(_)));
    }

    #[tokio::test]
    async fn metadata_body_without_access_token_is_auth_error() {
        let router = Router::new().route(TOKEN_PATH, get(|| async { Json(json!({ "token": "ya29.x" })) }));
        let source = metadata_source(router).await;
        let err = source.token(&Client::new()).await.unwrap_err();
        assert!(matches!(err, DecryptionError::Auth(_)));
    }
}
