// src/api/responses.rs
//! Wire shapes of the JIRA search response.
//!
//! Every field goes through [`lenient`], so a missing key, an explicit
//! `null`, or a value of the wrong JSON type all decode to the field's
//! default instead of failing the whole page. Code outside the parser never
//! sees these types.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Deserializes any JSON value into `T`, falling back to `T::default()`
/// when the value does not fit.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Like [`lenient`] for lists, but drops only the elements that do not fit
/// instead of the whole list.
pub fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values: Vec<Value> = lenient(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| T::deserialize(value).ok())
        .collect())
}

/// One page of `/search` results.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Page size the server actually honored.
    #[serde(default, deserialize_with = "lenient")]
    pub max_results: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssue {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub key: String,
    #[serde(default, deserialize_with = "lenient")]
    pub fields: RawFields,
    #[serde(default, deserialize_with = "lenient")]
    pub changelog: RawChangelog,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFields {
    #[serde(default, deserialize_with = "lenient")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub created: String,
    #[serde(default, deserialize_with = "lenient")]
    pub comment: RawCommentPage,
    #[serde(default, deserialize_with = "lenient")]
    pub parent: Option<RawIssueRef>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub issuelinks: Vec<RawIssueLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommentPage {
    #[serde(default, deserialize_with = "lenient_items")]
    pub comments: Vec<RawComment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(default, deserialize_with = "lenient")]
    pub created: String,
    #[serde(default, deserialize_with = "lenient")]
    pub body: String,
    #[serde(default, deserialize_with = "lenient")]
    pub author: RawUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub email_address: String,
}

/// Reference to another issue, e.g. `fields.parent` or `inwardIssue`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssueRef {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssueLink {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub link_type: RawLinkType,
    #[serde(default, deserialize_with = "lenient")]
    pub inward_issue: Option<RawIssueRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLinkType {
    #[serde(default, deserialize_with = "lenient")]
    pub inward: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChangelog {
    #[serde(default, deserialize_with = "lenient_items")]
    pub histories: Vec<RawHistory>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHistory {
    #[serde(default, deserialize_with = "lenient")]
    pub created: String,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<RawHistoryItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHistoryItem {
    #[serde(default, deserialize_with = "lenient")]
    pub field: String,
    /// For link changes, the key of the linked issue. `null` on removal.
    #[serde(default, deserialize_with = "lenient")]
    pub to: Option<String>,
}

/// Error body JIRA sends with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraErrorBody {
    #[serde(default, deserialize_with = "lenient")]
    pub error_messages: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub errors: std::collections::BTreeMap<String, String>,
}

impl JiraErrorBody {
    /// Flattens `errorMessages` and the per-field `errors` map.
    pub fn into_messages(self) -> Vec<String> {
        let mut messages = self.error_messages;
        messages.extend(
            self.errors
                .into_iter()
                .map(|(field, message)| format!("{}: {}", field, message)),
        );
        messages
    }
}
