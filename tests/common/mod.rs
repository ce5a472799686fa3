#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use product_service::auth::issue_token;
use product_service::config::AppConfig;
use product_service::{app, AppState};

/// Credentials attached to a test request.
pub enum Auth<'a> {
    None,
    Bearer(&'a str),
    Certificate(&'a str),
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token: String,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        let token = issue_token(&config.security, "test-client", vec!["catalog".to_string()])
            .context("failed to mint test token")?;
        let state = AppState::new(config).context("failed to build app state")?;
        let router = app(state.clone());
        Ok(Self { router, state, token })
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        auth: Auth<'_>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        builder = match auth {
            Auth::None => builder,
            Auth::Bearer(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            Auth::Certificate(dn) => builder.header("x-client-cert-subject", dn),
        };

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok(TestResponse { status, body })
    }

    /// Request authenticated with the default test token.
    pub async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<TestResponse> {
        self.request(method, path, body, Auth::Bearer(&self.token)).await
    }

    pub async fn get(&self, path: &str) -> Result<TestResponse> {
        self.call(Method::GET, path, None).await
    }
}

pub fn product_ids(body: &Value) -> Vec<String> {
    body["products"]
        .as_array()
        .map(|products| {
            products
                .iter()
                .filter_map(|p| p["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
