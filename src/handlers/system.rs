use axum::{
    extract::State,
    http::{Method, Uri},
    response::Json,
};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::api::ApiDoc;
use crate::error::ApiError;
use crate::model::{timestamp_now, SERVICE_SOURCE};
use crate::state::AppState;

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": SERVICE_SOURCE,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "authenticators": state.auth.names(),
        "endpoints": {
            "products": "/api/product/products[/:productId] (authenticated)",
            "docs": "/api/product/api-docs (public)",
            "health": "/health (public)",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": timestamp_now(),
        "products": state.products.store().size(),
    }))
}

pub async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{} is not supported on {}", method, uri.path()))
}
