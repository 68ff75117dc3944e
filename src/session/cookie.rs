//! Signed session cookie codec.
//!
//! Cookie value: `base64url(json) "." hex(hmac_sha256(secret, base64url(json)))`.
//! The payload is readable by the client but cannot be altered without the
//! server key.

use axum::http::{header, HeaderMap, HeaderValue};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;
use thiserror::Error;

use crate::config::SessionConfig;
use crate::session::Session;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session cookie is malformed")]
    Malformed,
    #[error("session cookie signature mismatch")]
    BadSignature,
    #[error("session payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("session payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session cookie is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
    #[error("invalid session signing key")]
    InvalidKey,
    #[error("session cookie is not a valid header value")]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

/// Encodes and verifies session cookies.
#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
    cookie_name: String,
    secure: bool,
    max_cookie_bytes: usize,
}

impl SessionCodec {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            key: config.secret_key.as_bytes().to_vec(),
            cookie_name: config.cookie_name.clone(),
            secure: config.secure,
            max_cookie_bytes: config.max_cookie_bytes,
        }
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(&self.key).map_err(|_| SessionError::InvalidKey)
    }

    /// Encode session contents into a signed cookie value.
    pub fn encode(&self, session: &Session) -> Result<String, SessionError> {
        let json = serde_json::to_vec(session.as_map())?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", payload, signature))
    }

    /// Verify and decode a cookie value.
    pub fn decode(&self, value: &str) -> Result<Session, SessionError> {
        let (payload, signature) = value.rsplit_once('.').ok_or(SessionError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        let json = URL_SAFE_NO_PAD.decode(payload)?;
        let data: Map<String, Value> = serde_json::from_slice(&json)?;
        Ok(Session::from_map(data))
    }

    /// Read the session from request headers.
    ///
    /// Absent, malformed or tampered cookies all yield an empty session.
    pub fn read_request(&self, headers: &HeaderMap) -> Session {
        let Some(value) = self.find_cookie(headers) else {
            return Session::new();
        };
        match self.decode(value) {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!(error = %e, "Discarding unreadable session cookie");
                Session::new()
            }
        }
    }

    fn find_cookie<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .find_map(|cookie| {
                let (name, value) = cookie.trim().split_once('=')?;
                (name == self.cookie_name).then_some(value)
            })
    }

    /// Build the `Set-Cookie` header for the session.
    ///
    /// An empty session expires the cookie.
    pub fn set_cookie(&self, session: &Session) -> Result<HeaderValue, SessionError> {
        let (value, expiry) = if session.is_empty() {
            (String::new(), "; Max-Age=0")
        } else {
            (self.encode(session)?, "")
        };

        let pair_len = self.cookie_name.len() + 1 + value.len();
        if pair_len > self.max_cookie_bytes {
            return Err(SessionError::TooLarge {
                size: pair_len,
                limit: self.max_cookie_bytes,
            });
        }

        let secure = if self.secure { "; Secure" } else { "" };
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax{}{}",
            self.cookie_name, value, secure, expiry
        );
        Ok(HeaderValue::from_str(&cookie)?)
    }
}
