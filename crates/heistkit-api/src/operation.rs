//! Request/response envelopes and static operation documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphqlError;

/// A named GraphQL operation with fixed text.
///
/// `root_field` is the top-level field of `data` the caller reads
/// (`heist` for `query GetHeist { heist(...) }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    pub operation_name: &'static str,
    pub root_field: &'static str,
    pub text: &'static str,
}

impl Document {
    pub const fn new(
        operation_name: &'static str,
        root_field: &'static str,
        text: &'static str,
    ) -> Self {
        Self {
            operation_name,
            root_field,
            text,
        }
    }

    pub fn request(&self, variables: Value) -> GraphqlRequest {
        GraphqlRequest::new(self.text, variables).with_operation_name(self.operation_name)
    }
}

/// Body POSTed to the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>, variables: Value) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
        }
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

fn ok_status() -> u16 {
    200
}

/// Decoded response. `status` is the HTTP status it arrived with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(skip, default = "ok_status")]
    pub status: u16,
}

impl GraphqlResponse {
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
            extensions: None,
            status: ok_status(),
        }
    }

    pub fn from_errors(status: u16, errors: Vec<GraphqlError>) -> Self {
        Self {
            data: None,
            errors,
            extensions: None,
            status,
        }
    }
}
