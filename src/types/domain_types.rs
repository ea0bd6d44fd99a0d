// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;
use url::Url;

/// Base URL of a JIRA instance, e.g. `https://issues.apache.org/jira`.
///
/// Stored without a trailing slash so endpoint paths can be appended directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse and validate a base URL
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("url"));
        }

        let url = Url::parse(trimmed).map_err(|e| ValidationError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ValidationError::InvalidUrl {
                    url: input.to_string(),
                    reason: format!("unsupported scheme '{}'", other),
                })
            }
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(ValidationError::InvalidUrl {
                url: input.to_string(),
                reason: "base URL must not carry a query or fragment".to_string(),
            });
        }

        Ok(Self(url))
    }

    /// Joins an absolute API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.as_str(), path)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str().trim_end_matches('/')
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JIRA API token used for basic authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::EmptyField("JIRA_API_TOKEN"));
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact token in display
        let visible: String = self.0.chars().take(4).collect();
        write!(f, "{}...", visible)
    }
}

/// User name and token pair for instances that refuse anonymous search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: ApiToken,
}

impl Credentials {
    /// Pairs optional user and token values.
    ///
    /// Both absent means anonymous access; exactly one present is a
    /// configuration mistake rather than something to silently ignore.
    pub fn from_parts(
        user: Option<String>,
        token: Option<String>,
    ) -> Result<Option<Self>, ValidationError> {
        match (user, token) {
            (None, None) => Ok(None),
            (Some(user), Some(token)) => {
                if user.trim().is_empty() {
                    return Err(ValidationError::EmptyField("JIRA_USER"));
                }
                Ok(Some(Self {
                    user,
                    token: ApiToken::new(token)?,
                }))
            }
            (Some(_), None) => Err(ValidationError::IncompleteCredentials {
                reason: "JIRA_USER is set but JIRA_API_TOKEN is not".to_string(),
            }),
            (None, Some(_)) => Err(ValidationError::IncompleteCredentials {
                reason: "JIRA_API_TOKEN is set but JIRA_USER is not".to_string(),
            }),
        }
    }
}
