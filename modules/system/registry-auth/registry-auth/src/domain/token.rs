//! Signed bearer tokens.
//!
//! Wire format: `base64(json-payload ‖ hmac-sha256(secret, json-payload))`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use registry_auth_sdk::{Principal, RegistryAuthError, TokenPayload};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of the MAC tag appended to the payload.
pub const MAC_LEN: usize = 32;

/// Default validity window, one day.
pub const DEFAULT_EXPIRE_SECS: u64 = 86_400;

pub struct TokenCodec {
    secret: SecretString,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Issue a token for `principal`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// `Internal` for anonymous principals.
    pub fn issue(&self, principal: &Principal) -> Result<String, RegistryAuthError> {
        self.issue_at(principal, now())
    }

    /// Issue a token stamped with `issued_at` (unix seconds).
    ///
    /// # Errors
    ///
    /// `Internal` for anonymous principals or if the payload cannot be serialized.
    pub fn issue_at(
        &self,
        principal: &Principal,
        issued_at: i64,
    ) -> Result<String, RegistryAuthError> {
        let name = principal.name().ok_or_else(|| {
            RegistryAuthError::internal("cannot issue a token for an anonymous principal")
        })?;
        let real_groups = principal.real_groups();
        let payload = TokenPayload {
            u: name.to_owned(),
            g: (!real_groups.is_empty()).then(|| real_groups.to_vec()),
            t: issued_at,
        };

        let mut bytes = serde_json::to_vec(&payload)
            .map_err(|e| RegistryAuthError::internal(e.to_string()))?;
        let tag = self.mac(&bytes)?.finalize().into_bytes();
        bytes.extend_from_slice(&tag);

        Ok(STANDARD.encode(bytes))
    }

    /// Validate `token` against the current time.
    ///
    /// # Errors
    ///
    /// `InvalidToken` with `invalid token`, `bad signature`, or `token expired`.
    pub fn decode(
        &self,
        token: &str,
        expire_secs: u64,
    ) -> Result<TokenPayload, RegistryAuthError> {
        self.decode_at(token, expire_secs, now())
    }

    /// Validate `token` as of `now` (unix seconds).
    ///
    /// # Errors
    ///
    /// `InvalidToken` with `invalid token`, `bad signature`, or `token expired`.
    pub fn decode_at(
        &self,
        token: &str,
        expire_secs: u64,
        now: i64,
    ) -> Result<TokenPayload, RegistryAuthError> {
        let raw = STANDARD
            .decode(token)
            .map_err(|_| RegistryAuthError::invalid_token("invalid token"))?;
        if raw.len() <= MAC_LEN {
            return Err(RegistryAuthError::invalid_token("invalid token"));
        }

        let (body, tag) = raw.split_at(raw.len() - MAC_LEN);
        self.mac(body)?
            .verify_slice(tag)
            .map_err(|_| RegistryAuthError::invalid_token("bad signature"))?;

        let payload: TokenPayload = serde_json::from_slice(body)
            .map_err(|_| RegistryAuthError::invalid_token("invalid token"))?;

        if payload.t.abs_diff(now) > expire_secs {
            return Err(RegistryAuthError::invalid_token("token expired"));
        }

        Ok(payload)
    }

    fn mac(&self, bytes: &[u8]) -> Result<HmacSha256, RegistryAuthError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| RegistryAuthError::internal(e.to_string()))?;
        mac.update(bytes);
        Ok(mac)
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
