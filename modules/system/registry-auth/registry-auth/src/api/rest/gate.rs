//! Holds a request body back while credentials are resolved.
//!
//! [`PausedRequest`] owns the body separately from the head, so nothing can
//! read it until [`PausedRequest::resume`] puts the request back together.
//! Dropping a paused request discards the body with it.

use axum::body::Body;
use axum::extract::Request;
use http::HeaderMap;
use http::request::Parts;
use registry_auth_sdk::Principal;

pub struct PausedRequest {
    parts: Parts,
    body: Body,
}

impl PausedRequest {
    #[must_use]
    pub fn pause(req: Request) -> Self {
        let (parts, body) = req.into_parts();
        Self { parts, body }
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.parts.extensions.get::<Principal>()
    }

    /// Returns `true` if an earlier middleware already resolved a user.
    #[must_use]
    pub fn has_named_principal(&self) -> bool {
        self.principal().is_some_and(|p| !p.is_anonymous())
    }

    /// Attach an anonymous principal unless one is already present.
    ///
    /// An anonymous principal left by an earlier layer keeps its error.
    pub fn attach_default(&mut self) {
        if self.principal().is_none() {
            self.attach(Principal::anonymous());
        }
    }

    /// Attach `principal`, replacing any previous one.
    pub fn attach(&mut self, principal: Principal) {
        self.parts.extensions.insert(principal);
    }

    #[must_use]
    pub fn resume(self) -> Request {
        Request::from_parts(self.parts, self.body)
    }
}
