pub mod auth;
pub mod response;

pub use auth::{identity_from_headers, AuthUser};
pub use response::{ApiResponse, ApiResult};
