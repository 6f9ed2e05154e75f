//! Ad-hoc API probe request/response models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// One query parameter or header row from the request editor.
/// Inactive rows are kept client-side but silently dropped at send time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProbeParam {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// A single outbound HTTP request description.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApiProbeRequest {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub params: Vec<ProbeParam>,
    #[serde(default)]
    pub headers: Vec<ProbeParam>,
    /// Raw body text; may itself be JSON.
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiProbeRequest {
    /// Active, non-empty-key query parameters.
    pub fn active_params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .filter(|p| p.active && !p.key.is_empty())
            .map(|p| (p.key.as_str(), p.value.as_str()))
    }

    /// Active, non-empty-key headers.
    pub fn active_headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .filter(|h| h.active && !h.key.is_empty())
            .map(|h| (h.key.as_str(), h.value.as_str()))
    }
}

/// The captured HTTP exchange (or transport failure).
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiProbeResponse {
    pub status_code: u16,
    /// Response headers; multi-value headers joined with `;`.
    pub headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Wall-clock elapsed time, success or failure.
    pub time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
