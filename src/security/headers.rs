//! Security response headers.
//!
//! # Responsibilities
//! - Resolve the content security policy once at startup
//! - Append `Content-Security-Policy`, `X-Frame-Options` and
//!   `X-XSS-Protection` to every response
//!
//! Policy precedence: `csp_policy` replaces the default outright; otherwise
//! `extend_csp_policy` appends sources per directive onto the default;
//! otherwise the default is used as is. Empty tables count as unset.

use axum::{
    http::{header, header::InvalidHeaderValue, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CspTable, SecurityConfig};

/// Built-in policy, in header order.
pub const DEFAULT_CSP_POLICY: &[(&str, &[&str])] = &[
    ("default-src", &["'self'"]),
    // unsafe-eval and unsafe-inline are required by the charting library.
    ("script-src", &["'self'", "'unsafe-eval'"]),
    ("frame-ancestors", &["'none'"]),
    ("img-src", &["'self'", "data:"]),
    ("object-src", &["'none'"]),
    ("reflected-xss", &["block"]),
    ("font-src", &["'self'", "fonts.gstatic.com"]),
    ("style-src", &["'self'", "fonts.googleapis.com", "'unsafe-inline'"]),
];

pub const X_FRAME_OPTIONS: &str = "DENY";
pub const X_XSS_PROTECTION: &str = "1; mode=block";

/// Ordered directive → sources mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspPolicy {
    directives: Vec<(String, Vec<String>)>,
}

impl Default for CspPolicy {
    fn default() -> Self {
        Self {
            directives: DEFAULT_CSP_POLICY
                .iter()
                .map(|(name, sources)| {
                    (
                        name.to_string(),
                        sources.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl From<&CspTable> for CspPolicy {
    fn from(table: &CspTable) -> Self {
        Self {
            directives: table
                .iter()
                .map(|(name, sources)| (name.clone(), sources.clone()))
                .collect(),
        }
    }
}

impl CspPolicy {
    /// Resolve the effective policy from configuration.
    pub fn from_config(config: &SecurityConfig) -> Self {
        let non_empty = |t: &Option<CspTable>| t.as_ref().filter(|t| !t.is_empty()).cloned();

        if let Some(policy) = non_empty(&config.csp_policy) {
            return CspPolicy::from(&policy);
        }
        let mut policy = CspPolicy::default();
        if let Some(extra) = non_empty(&config.extend_csp_policy) {
            policy.extend(&extra);
        }
        policy
    }

    /// Append sources per directive, adding directives that are not present.
    pub fn extend(&mut self, extra: &CspTable) {
        for (name, sources) in extra {
            match self.directives.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => existing.extend(sources.iter().cloned()),
                None => self.directives.push((name.clone(), sources.clone())),
            }
        }
    }

    pub fn sources(&self, directive: &str) -> Option<&[String]> {
        self.directives
            .iter()
            .find(|(n, _)| n == directive)
            .map(|(_, s)| s.as_slice())
    }

    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directives.iter().map(|(n, s)| (n.as_str(), s.as_slice()))
    }

    /// Serialize as `directive src src; directive src`.
    pub fn header_value(&self) -> String {
        self.directives
            .iter()
            .map(|(name, sources)| {
                if sources.is_empty() {
                    name.clone()
                } else {
                    format!("{} {}", name, sources.join(" "))
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Parse a header value back into a policy.
    pub fn parse(header: &str) -> Self {
        let directives = header
            .split(';')
            .filter_map(|part| {
                let mut tokens = part.split_whitespace();
                let name = tokens.next()?.to_string();
                Some((name, tokens.map(str::to_string).collect()))
            })
            .collect();
        Self { directives }
    }
}

/// Header values resolved at startup and shared by every response.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    csp: HeaderValue,
}

impl SecurityHeaders {
    pub fn from_config(config: &SecurityConfig) -> Result<Self, InvalidHeaderValue> {
        let policy = CspPolicy::from_config(config);
        Ok(Self {
            csp: HeaderValue::from_str(&policy.header_value())?,
        })
    }

    /// Add the header layers to a router.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .layer(SetResponseHeaderLayer::appending(
                header::CONTENT_SECURITY_POLICY,
                self.csp.clone(),
            ))
            .layer(SetResponseHeaderLayer::appending(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static(X_FRAME_OPTIONS),
            ))
            .layer(SetResponseHeaderLayer::appending(
                header::X_XSS_PROTECTION,
                HeaderValue::from_static(X_XSS_PROTECTION),
            ))
    }
}
