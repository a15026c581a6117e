//! Request and response payloads for the ID pattern endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of `PUT /organizations/{org_id}/id-patterns/{category}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIdPatternRequest {
    /// New pattern, e.g. `{ORG}-EMP-{YEAR}-{SEQUENCE:5}`.
    pub pattern: String,
}

/// Body of `POST /organizations/{org_id}/id-sequences/{category}/next`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateIdRequest {
    /// Date driving the date placeholders and the sequence scope. Defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Query string of the preview endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdPreviewQuery {
    /// Date to preview for. Defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Effective pattern for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdPatternResponse {
    /// Category wire name (`employee`, `department-code`, ...).
    pub category: String,
    /// Pattern in effect.
    pub pattern: String,
    /// True when no custom pattern is stored and the built-in default applies.
    pub is_default: bool,
    /// When the counter starts over: `never`, `yearly` or `monthly`.
    pub reset_policy: String,
}

/// A freshly issued identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedIdResponse {
    /// The formatted identifier.
    pub id: String,
    /// Category wire name.
    pub category: String,
    /// Raw counter value embedded in the identifier.
    pub sequence: u64,
}

/// The identifier the next issuance would produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdPreviewResponse {
    /// The formatted identifier.
    pub id: String,
    /// Category wire name.
    pub category: String,
    /// Counter value the next issuance would receive.
    pub next_sequence: u64,
}
