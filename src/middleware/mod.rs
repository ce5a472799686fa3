pub mod auth;
pub mod response;

pub use auth::authenticate;
pub use response::{handle_panic, render_errors, ApiResponse, ApiResult};
