//! HTTP surface: credential middlewares, the principal extractor, and
//! problem responses.

pub mod error;
pub mod extract;
pub mod gate;
pub mod middleware;

pub use error::ApiError;
pub use extract::RemoteUser;
pub use middleware::{
    AuthState, basic_middleware, bearer_middleware, cookie_middleware, with_api_credentials,
    with_web_credentials,
};
