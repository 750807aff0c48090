//! HTTP routes served behind the credential middlewares.
//!
//! Registry-client routes sit under `/-/` behind Basic credentials. The same
//! handlers are mounted again under `/-/web/` behind the cookie and signed
//! token middlewares for browser sessions.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use registry_auth::api::rest::{
    ApiError, RemoteUser, with_api_credentials, with_web_credentials,
};
use registry_auth_sdk::{PackageAction, Principal, RegistryAuthClient};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn RegistryAuthClient>,
}

#[derive(Debug, Serialize)]
pub struct Verdict {
    pub package: String,
    pub action: PackageAction,
    pub allowed: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub password: SecretString,
}

#[derive(Debug, Serialize)]
pub struct Registered {
    pub ok: String,
    /// Signed bearer token.
    pub token: String,
    /// Value for the `token` cookie.
    pub cookie: String,
}

#[must_use]
pub fn router(auth: Arc<dyn RegistryAuthClient>) -> Router {
    let api = Router::new()
        .route("/-/whoami", get(whoami))
        .route("/-/access/{*package}", get(access))
        .route("/-/publish/{*package}", get(publish))
        .route("/-/user/{name}", put(add_user));
    let web = Router::new()
        .route("/-/web/whoami", get(whoami))
        .route("/-/web/access/{*package}", get(access))
        .route("/-/web/publish/{*package}", get(publish));

    with_api_credentials(api, Arc::clone(&auth))
        .merge(with_web_credentials(web, Arc::clone(&auth)))
        .with_state(AppState { auth })
}

async fn whoami(RemoteUser(principal): RemoteUser) -> Json<Principal> {
    Json(principal)
}

async fn access(
    State(state): State<AppState>,
    Path(package): Path<String>,
    RemoteUser(principal): RemoteUser,
) -> Result<Json<Verdict>, ApiError> {
    let allowed = state.auth.allow_access(&package, &principal).await?;
    Ok(Json(Verdict {
        package,
        action: PackageAction::Access,
        allowed,
    }))
}

async fn publish(
    State(state): State<AppState>,
    Path(package): Path<String>,
    RemoteUser(principal): RemoteUser,
) -> Result<Json<Verdict>, ApiError> {
    let allowed = state.auth.allow_publish(&package, &principal).await?;
    Ok(Json(Verdict {
        package,
        action: PackageAction::Publish,
        allowed,
    }))
}

async fn add_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<Registered>), ApiError> {
    let password = body.password.expose_secret();
    let principal = state.auth.add_user(&name, password).await?;
    let token = state.auth.issue_token(&principal)?;
    let cookie = state.auth.pack_credentials(&name, password)?;

    Ok((
        StatusCode::CREATED,
        Json(Registered {
            ok: format!("user '{name}' created"),
            token,
            cookie,
        }),
    ))
}
