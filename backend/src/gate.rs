//! Per-request access gate.
//!
//! Picks the view for a request from its `admin` and `related` parameters:
//!
//! 1. `admin`, trimmed, equals the configured secret, trimmed: [`AccessMode::Admin`]
//! 2. `related`, trimmed, equals `"true"`: [`AccessMode::RelatedTerms`]
//! 3. anything else: [`AccessMode::Normal`]
//!
//! Nothing is remembered between requests.

use serde::Deserialize;

use kg_explorer_common::AccessMode;

/// Token that switches a request into related-terms mode.
pub const RELATED_TOKEN: &str = "true";

/// Raw gate parameters of one incoming request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    #[serde(default)]
    pub admin: Option<String>,
    #[serde(default)]
    pub related: Option<String>,
    /// Filled in from the connection, never from the query string.
    #[serde(skip)]
    pub client_ip: Option<String>,
}

impl RequestContext {
    pub fn new(admin: Option<&str>, related: Option<&str>) -> Self {
        Self {
            admin: admin.map(String::from),
            related: related.map(String::from),
            client_ip: None,
        }
    }

    pub fn with_client_ip(mut self, client_ip: Option<String>) -> Self {
        self.client_ip = client_ip;
        self
    }
}

/// Shared-secret gate in front of the admin view.
#[derive(Debug, Clone)]
pub struct AccessGate {
    admin_secret: Option<String>,
}

impl AccessGate {
    /// A missing or blank secret disables admin access entirely.
    pub fn new(admin_secret: Option<&str>) -> Self {
        let admin_secret = admin_secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        if admin_secret.is_none() {
            tracing::warn!("No admin secret configured, admin view is disabled");
        }

        Self { admin_secret }
    }

    pub fn resolve(&self, ctx: &RequestContext) -> AccessMode {
        if self.is_admin(ctx) {
            AccessMode::Admin
        } else if ctx.related.as_deref().map(str::trim) == Some(RELATED_TOKEN) {
            AccessMode::RelatedTerms
        } else {
            AccessMode::Normal
        }
    }

    pub fn is_admin(&self, ctx: &RequestContext) -> bool {
        match (&self.admin_secret, ctx.admin.as_deref()) {
            (Some(secret), Some(presented)) => presented.trim() == secret,
            _ => false,
        }
    }
}
