//! Credential-extraction middlewares.
//!
//! Each middleware pauses the request body, resolves a [`Principal`] from the
//! request head, attaches it, and resumes the request. A request that already
//! carries a named principal passes straight through. Otherwise an anonymous
//! principal is attached unless an earlier layer already left one, so a
//! failure recorded further out survives the inner layers.
//!
//! - [`basic_middleware`]: `Authorization: Basic base64(user:pass)` or
//!   `Authorization: Bearer <packed credentials>`. Failures are recorded on
//!   the principal and the request continues anonymously.
//! - [`bearer_middleware`]: `Authorization: Bearer <signed token>`. Failures
//!   end the request with a problem response.
//! - [`cookie_middleware`]: `Cookie: token=<packed credentials>`. Failures are
//!   recorded and the request continues anonymously.
//!
//! Basic and Bearer read the same header with different meanings, so they
//! guard different routes: [`with_api_credentials`] for registry clients and
//! [`with_web_credentials`] for browser sessions.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use http::{HeaderMap, header};
use registry_auth_sdk::{Credentials, Principal, RegistryAuthClient, RegistryAuthError};
use secrecy::ExposeSecret;
use tracing::debug;

use super::error::error_to_response;
use super::gate::PausedRequest;

/// Cookie carrying packed credentials.
pub const TOKEN_COOKIE: &str = "token";

/// Shared state for the credential middlewares.
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<dyn RegistryAuthClient>,
}

/// Guard registry-client routes with [`basic_middleware`].
pub fn with_api_credentials<S>(
    router: Router<S>,
    auth: Arc<dyn RegistryAuthClient>,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(AuthState { auth }, basic_middleware))
}

/// Guard browser routes: [`cookie_middleware`] first, then [`bearer_middleware`].
pub fn with_web_credentials<S>(
    router: Router<S>,
    auth: Arc<dyn RegistryAuthClient>,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let state = AuthState { auth };
    router
        .layer(from_fn_with_state(state.clone(), bearer_middleware))
        .layer(from_fn_with_state(state, cookie_middleware))
}

/// Resolve `Basic` credentials, or packed credentials sent as `Bearer`.
pub async fn basic_middleware(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    let mut req = PausedRequest::pause(req);
    if req.has_named_principal() {
        return next.run(req.resume()).await;
    }
    req.attach_default();

    let resolved = authorization(req.headers()).map(|header| match header {
        Some(("Basic", value)) => decode_basic(value),
        Some(("Bearer", value)) => state.auth.unpack_credentials(value),
        _ => None,
    });

    match resolved {
        Ok(Some(credentials)) => {
            let principal = login(state.auth.as_ref(), &credentials).await;
            req.attach(principal);
        }
        Ok(None) => {}
        Err(err) => {
            debug!(error = %err, "Rejected authorization header");
            req.attach(anonymous_with_error(&err));
        }
    }

    next.run(req.resume()).await
}

/// Resolve a signed bearer token. Invalid tokens end the request.
pub async fn bearer_middleware(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    let mut req = PausedRequest::pause(req);
    if req.has_named_principal() {
        return next.run(req.resume()).await;
    }
    req.attach_default();

    match bearer_principal(state.auth.as_ref(), req.headers()) {
        Ok(Some(principal)) => req.attach(principal),
        Ok(None) => {}
        Err(err) => {
            debug!(error = %err, "Rejected bearer token");
            return error_to_response(&err);
        }
    }

    next.run(req.resume()).await
}

/// Resolve packed credentials from the `token` cookie.
pub async fn cookie_middleware(
    State(state): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    let mut req = PausedRequest::pause(req);
    if req.has_named_principal() {
        return next.run(req.resume()).await;
    }
    req.attach_default();

    let credentials =
        cookie(req.headers(), TOKEN_COOKIE).and_then(|v| state.auth.unpack_credentials(v));
    if let Some(credentials) = credentials {
        let principal = login(state.auth.as_ref(), &credentials).await;
        req.attach(principal);
    }

    next.run(req.resume()).await
}

/// Split `Authorization` into scheme and value.
///
/// `Ok(None)` when the header is absent.
fn authorization(headers: &HeaderMap) -> Result<Option<(&str, &str)>, RegistryAuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| bad_header())?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(credential), None) => Ok(Some((scheme, credential))),
        _ => Err(bad_header()),
    }
}

fn bad_header() -> RegistryAuthError {
    RegistryAuthError::malformed("bad authorization header")
}

fn decode_basic(value: &str) -> Option<Credentials> {
    let raw = STANDARD.decode(value).ok()?;
    let raw = String::from_utf8(raw).ok()?;
    Credentials::parse(&raw)
}

fn bearer_principal(
    auth: &dyn RegistryAuthClient,
    headers: &HeaderMap,
) -> Result<Option<Principal>, RegistryAuthError> {
    let Some(("Bearer", token)) = authorization(headers)? else {
        return Ok(None);
    };
    let payload = auth.decode_token(token)?;
    let mut principal = Principal::authenticated(payload.u, payload.g.unwrap_or_default());
    principal.set_token(token.to_owned());
    Ok(Some(principal))
}

fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| unquote(value))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Authenticate, falling back to an anonymous principal that records why.
async fn login(auth: &dyn RegistryAuthClient, credentials: &Credentials) -> Principal {
    match auth
        .authenticate(&credentials.user, credentials.password.expose_secret())
        .await
    {
        Ok(principal) => principal,
        Err(err) => {
            debug!(user = %credentials.user, error = %err, "Credentials rejected");
            anonymous_with_error(&err)
        }
    }
}

fn anonymous_with_error(err: &RegistryAuthError) -> Principal {
    let mut principal = Principal::anonymous();
    principal.set_error(err.to_string());
    principal
}
