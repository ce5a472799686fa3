use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Environment, SecurityConfig};
use crate::handlers;
use crate::middleware::{authenticate, handle_panic, render_errors};
use crate::state::AppState;

pub const API_BASE: &str = "/api/product";

/// Full application: route table plus the middleware chain.
///
/// Layer order, outermost first: CORS, request tracing, error rendering,
/// panic capture, body limit, then per-route authentication.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security, state.config.environment);
    let trace = state.config.api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", get(handlers::root).fallback(handlers::method_not_allowed))
        .route("/health", get(handlers::health).fallback(handlers::method_not_allowed))
        .route(
            &format!("{}/api-docs", API_BASE),
            get(handlers::api_docs).fallback(handlers::method_not_allowed),
        )
        // Authenticated
        .nest(API_BASE, product_routes(state.clone()))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(render_errors))
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(DefaultBodyLimit::max(body_limit)),
        );

    let router = if trace {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(handlers::list_products)
                .post(handlers::create_product)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/products/:productId",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product)
                .fallback(handlers::method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn cors_layer(security: &SecurityConfig, environment: Environment) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if environment == Environment::Development {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any),
    )
}
