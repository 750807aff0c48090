use axum::extract::FromRequestParts;
use http::request::Parts;
use registry_auth_sdk::{Principal, RegistryAuthError};

use super::error::ApiError;

/// Extractor for the [`Principal`] attached by the credential middlewares.
#[derive(Debug, Clone)]
pub struct RemoteUser(pub Principal);

impl<S> FromRequestParts<S> for RemoteUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(RemoteUser)
            .ok_or_else(|| {
                ApiError(RegistryAuthError::internal(
                    "principal not found - credential middleware not configured",
                ))
            })
    }
}
