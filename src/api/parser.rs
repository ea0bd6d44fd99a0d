// src/api/parser.rs
//! Turns raw search responses into domain records.
//!
//! Two layers live here: [`parse_search_response`] decides whether an HTTP
//! response is a usable page at all, and [`parse_issue`] maps one decoded
//! issue into an [`Issue`] plus the parent, link and changelog evidence the
//! tracker needs. The second layer never fails.

use super::client::ApiResponse;
use super::responses::{
    JiraErrorBody, RawChangelog, RawComment, RawIssue, RawIssueLink, SearchResponse,
};
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, JIRA_DATE_FORMAT, LINK_HISTORY_FIELD};
use crate::error::AppError;
use crate::model::{Comment, Issue};
use crate::types::IssueId;
use chrono::{DateTime, Utc};

/// Everything one search hit contributes to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIssue {
    pub issue: Issue,
    pub parent: Option<IssueId>,
    pub links: Vec<IssueLinkRecord>,
    pub link_evidence: Vec<LinkEvidence>,
}

/// One entry of `fields.issuelinks`, reduced to what link ingestion reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueLinkRecord {
    /// Identifier JIRA assigns to the link itself, shared by both endpoints.
    pub link_id: String,
    /// Present when this issue is the target of the other issue's relation.
    pub inward: Option<InwardSide>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InwardSide {
    /// The inward description of the link type, e.g. `"is blocked by"`.
    pub type_name: String,
    pub other: IssueId,
}

/// A changelog entry saying a link to `target_key` was added at `created`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEvidence {
    pub target_key: String,
    pub created: DateTime<Utc>,
}

/// Parses a JIRA timestamp, returning `None` for empty or malformed input.
pub fn parse_jira_date(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_str(raw, JIRA_DATE_FORMAT)
        .map(|date| date.with_timezone(&Utc))
        .ok()
}

/// Decodes a search response, mapping non-2xx statuses to `JiraService`.
pub fn parse_search_response(result: ApiResponse<String>) -> Result<SearchResponse, AppError> {
    if !result.status.is_success() {
        let messages = serde_json::from_str::<JiraErrorBody>(&result.data)
            .map(JiraErrorBody::into_messages)
            .unwrap_or_default();
        log::debug!(
            "Error body from {}: {}",
            result.url,
            preview(&result.data)
        );
        return Err(AppError::JiraService {
            status: result.status,
            messages,
        });
    }

    serde_json::from_str(&result.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", result.url, e);
        AppError::MalformedResponse {
            url: result.url.clone(),
            message: format!("{} (body: {})", e, preview(&result.data)),
        }
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

/// Maps one decoded issue into its domain record.
pub fn parse_issue(raw: RawIssue) -> ParsedIssue {
    let RawIssue {
        id,
        key,
        fields,
        changelog,
    } = raw;
    let id = IssueId::from(id);

    let parent = fields
        .parent
        .map(|parent| IssueId::from(parent.id))
        .filter(|parent| !parent.is_empty());

    let links = fields.issuelinks.into_iter().map(parse_issue_link).collect();
    let link_evidence = parse_changelog(changelog);

    let comments = fields
        .comment
        .comments
        .into_iter()
        .map(parse_comment)
        .collect();

    let issue = Issue {
        id,
        title: fields.summary,
        name: key,
        body: fields.description,
        created: parse_jira_date(&fields.created),
        comments,
    };

    ParsedIssue {
        issue,
        parent,
        links,
        link_evidence,
    }
}

fn parse_comment(raw: RawComment) -> Comment {
    Comment {
        author_name: raw.author.display_name,
        author_email: raw.author.email_address,
        created: parse_jira_date(&raw.created),
        body: raw.body,
    }
}

fn parse_issue_link(raw: RawIssueLink) -> IssueLinkRecord {
    IssueLinkRecord {
        link_id: raw.id,
        inward: raw.inward_issue.map(|other| InwardSide {
            type_name: raw.link_type.inward,
            other: IssueId::from(other.id),
        }),
    }
}

/// Collects link-creation evidence from the change history.
///
/// Only `Link` items with a non-null `to` count; histories without a
/// parseable timestamp are skipped.
fn parse_changelog(changelog: RawChangelog) -> Vec<LinkEvidence> {
    let mut evidence = Vec::new();
    for history in changelog.histories {
        let created = parse_jira_date(&history.created);
        for item in history.items {
            if item.field != LINK_HISTORY_FIELD {
                continue;
            }
            let (Some(target_key), Some(created)) = (item.to, created) else {
                continue;
            };
            evidence.push(LinkEvidence {
                target_key,
                created,
            });
        }
    }
    evidence
}
