pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use routes::app;
pub use state::AppState;
