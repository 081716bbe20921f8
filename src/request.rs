//! Minimal request/response views consumed by the structured log helpers
//!
//! The router never depends on an HTTP framework; callers map whatever
//! request type they hold onto these owned views.

use serde::{Deserialize, Serialize};

/// The fields of an HTTP request the logging helpers read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestInfo {
    /// HTTP method (e.g. "GET")
    pub method: String,
    /// Request URI including query string
    pub uri: String,
    /// Client IP, if the host environment resolved one
    #[serde(default)]
    pub client_ip: Option<String>,
    /// User-Agent header, if present
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl RequestInfo {
    /// Create a request view with no client metadata
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            client_ip: None,
            user_agent: None,
        }
    }

    /// Attach the client IP
    pub fn with_client_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = Some(ip.into());
        self
    }

    /// Attach the User-Agent header value
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }
}

/// The fields of an HTTP response the logging helpers read
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseInfo {
    /// HTTP status code
    pub status: u16,
}

impl ResponseInfo {
    /// Create a response view from a status code
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}
