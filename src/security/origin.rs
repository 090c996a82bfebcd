//! Origin policy.
//!
//! Two distinct trust decisions are made from the Origin header:
//! - CORS grant: is the origin in the configured allow-list?
//! - Admission: is the origin exactly the single admission origin?
//!
//! Both comparisons are exact and case-sensitive. No wildcards.

use std::collections::HashSet;

use axum::http::HeaderValue;

use crate::config::OriginConfig;

#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: HashSet<String>,
    admission: String,
}

impl OriginPolicy {
    pub fn new<I, S>(allowed: I, admission: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            admission: admission.into(),
        }
    }

    pub fn from_config(config: &OriginConfig) -> Self {
        Self::new(config.allowed.iter().cloned(), config.admission.clone())
    }

    /// Whether `origin` may read responses cross-origin.
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.contains(origin)
    }

    /// The header value to echo in `Access-Control-Allow-Origin`, if any.
    pub fn cors_grant(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        let value = origin?;
        let text = value.to_str().ok()?;
        self.is_allowed(text).then(|| value.clone())
    }

    /// Whether a game connection from `origin` may be admitted.
    pub fn admits(&self, origin: Option<&str>) -> bool {
        origin == Some(self.admission.as_str())
    }
}

/// Render an optional Origin header for logs.
pub fn origin_for_log(origin: Option<&HeaderValue>) -> &str {
    match origin {
        None => "<none>",
        Some(v) => v.to_str().unwrap_or("<non-ascii>"),
    }
}
