//! Error types surfaced by the access layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::selection::SelectionError;

/// Location of a GraphQL error inside the document (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    pub line: u32,
    pub column: u32,
}

/// Segment of a GraphQL error path: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    Key(String),
    Index(i64),
}

/// One entry of the `errors` array of a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    #[serde(default)]
    pub path: Vec<GraphqlPathSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlError {
    /// Status code the backend attached to the error, if any.
    ///
    /// API Platform reports it as `extensions.status`.
    pub fn status(&self) -> Option<u16> {
        self.extensions
            .as_ref()?
            .get("status")?
            .as_u64()
            .and_then(|s| u16::try_from(s).ok())
    }
}

/// Error returned by every access function.
///
/// The layer does not classify failures; callers inspect [`ClientError::status`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, TLS...).
    #[error("HTTP error: {message}")]
    Http { message: String, status: Option<u16> },

    /// Non-2xx response.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The backend answered with a GraphQL `errors` payload.
    #[error("GraphQL errors (HTTP {status}): {}", summarize(.errors))]
    Graphql {
        status: u16,
        errors: Vec<GraphqlError>,
    },

    /// Response body or data did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(String),

    /// Response carried neither data nor errors.
    #[error("GraphQL protocol error: {0}")]
    Protocol(String),

    /// A partial query was given an unusable selection set.
    #[error(transparent)]
    InvalidSelection(#[from] SelectionError),
}

impl ClientError {
    /// HTTP-like status of the failure.
    ///
    /// For GraphQL error payloads the status attached to the first error wins
    /// over the transport status (API Platform answers 200 with a 404 inside).
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Graphql { status, errors } => errors
                .iter()
                .find_map(GraphqlError::status)
                .or(Some(*status)),
            Self::Json(_) | Self::Protocol(_) | Self::InvalidSelection(_) => None,
        }
    }

    /// Paths of all GraphQL errors, joined with dots (`heist.crewMembers.0`).
    pub fn error_paths(&self) -> Vec<String> {
        let Self::Graphql { errors, .. } = self else {
            return Vec::new();
        };
        errors
            .iter()
            .map(|e| {
                e.path
                    .iter()
                    .map(|seg| match seg {
                        GraphqlPathSegment::Key(k) => k.clone(),
                        GraphqlPathSegment::Index(i) => i.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect()
    }
}

fn summarize(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
