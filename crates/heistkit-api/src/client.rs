//! Client handle and the blocking HTTP implementation.

use std::time::Duration;

use heistkit_config::HeistkitConfig;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::operation::{GraphqlRequest, GraphqlResponse};
use crate::types::Payload;

/// Anything able to deliver a GraphQL request and hand back the decoded body.
///
/// The access layer only borrows the handle; constructing, authenticating and
/// closing it is the caller's business.
pub trait GraphqlClient: Send + Sync {
    fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ClientError>;
}

/// Send `request` and deserialize `data.<root_field>` into `T`.
///
/// A `null` root field deserializes into `None` for `T = Option<_>`.
pub fn execute<T: DeserializeOwned>(
    client: &dyn GraphqlClient,
    request: &GraphqlRequest,
    root_field: &str,
) -> Result<T, ClientError> {
    let operation = request.operation_name.as_deref().unwrap_or("anonymous");
    debug!(event = "graphql_request", operation = operation);

    let response = client.send(request).map_err(|e| {
        debug!(event = "graphql_failed", operation = operation, error = %e);
        e
    })?;

    if !response.errors.is_empty() {
        debug!(
            event = "graphql_errors",
            operation = operation,
            count = response.errors.len()
        );
        return Err(ClientError::Graphql {
            status: response.status,
            errors: response.errors,
        });
    }

    let Some(mut data) = response.data else {
        return Err(ClientError::Protocol(format!(
            "{operation}: response carried neither data nor errors"
        )));
    };
    let field = data
        .get_mut(root_field)
        .map(Value::take)
        .unwrap_or(Value::Null);
    Ok(serde_json::from_value(field)?)
}

/// Run a mutation and split its payload (`{ <entity>: {...}, clientMutationId }`).
pub fn execute_mutation<T: DeserializeOwned>(
    client: &dyn GraphqlClient,
    request: &GraphqlRequest,
    root_field: &str,
    entity_field: &str,
) -> Result<Payload<T>, ClientError> {
    let mut payload: Value = execute(client, request, root_field)?;
    let entity = match payload.get_mut(entity_field).map(Value::take) {
        None | Some(Value::Null) => None,
        Some(v) => Some(serde_json::from_value(v)?),
    };
    let client_mutation_id = payload
        .get("clientMutationId")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(Payload {
        entity,
        client_mutation_id,
    })
}

/// Blocking `reqwest` client POSTing JSON to a single endpoint.
#[derive(Debug, Clone)]
pub struct HttpClient {
    endpoint: String,
    http: reqwest::blocking::Client,
}

#[derive(Debug, Clone)]
pub struct HttpClientBuilder {
    endpoint: String,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpClientBuilder {
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpClient, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.bearer_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ClientError::Protocol(format!("invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("heistkit/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpClient {
            endpoint: self.endpoint,
            http: builder.build()?,
        })
    }
}

impl HttpClient {
    pub fn builder(endpoint: impl Into<String>) -> HttpClientBuilder {
        HttpClientBuilder {
            endpoint: endpoint.into(),
            bearer_token: None,
            timeout: None,
        }
    }

    pub fn from_config(cfg: &HeistkitConfig) -> Result<Self, ClientError> {
        let mut builder = Self::builder(cfg.api_endpoint())
            .with_timeout(Duration::from_secs(cfg.api_timeout_secs()));
        if let Some(token) = cfg.api_token() {
            builder = builder.with_bearer_token(token);
        }
        builder.build()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GraphqlClient for HttpClient {
    fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ClientError> {
        let resp = self.http.post(&self.endpoint).json(request).send()?;
        let status = resp.status();
        let bytes = resp.bytes()?;

        if !status.is_success() {
            // Keep the GraphQL error paths when the backend sent a proper payload.
            if let Ok(body) = serde_json::from_slice::<GraphqlResponse>(&bytes) {
                if !body.errors.is_empty() {
                    return Err(ClientError::Graphql {
                        status: status.as_u16(),
                        errors: body.errors,
                    });
                }
            }
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&bytes),
            });
        }

        let mut response: GraphqlResponse = serde_json::from_slice(&bytes)?;
        response.status = status.as_u16();
        Ok(response)
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use crate::types::IriRef;
    use serde_json::json;

    #[test]
    fn execute_reads_root_field() {
        let client = MockClient::new();
        client.push_data(json!({ "user": { "id": "/users/1", "username": "ghost" } }));
        let req = GraphqlRequest::new("query { user(id: \"/users/1\") { id } }", json!({}));
        let v: Option<Value> = execute(&client, &req, "user").unwrap();
        assert_eq!(v.unwrap()["username"], "ghost");
    }

    #[test]
    fn execute_maps_missing_data_to_protocol_error() {
        let client = MockClient::new();
        client.push_response(GraphqlResponse {
            data: None,
            errors: Vec::new(),
            extensions: None,
            status: 200,
        });
        let req = GraphqlRequest::new("query { me { id } }", json!({}));
        let err = execute::<Option<Value>>(&client, &req, "me").unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[test]
    fn mutation_payload_is_split() {
        let client = MockClient::new();
        client.push_data(json!({
            "deleteHeist": { "heist": { "id": "/heists/4" }, "clientMutationId": "abc" }
        }));
        let req = GraphqlRequest::new("mutation", json!({}));
        let payload: Payload<IriRef> =
            execute_mutation(&client, &req, "deleteHeist", "heist").unwrap();
        assert_eq!(payload.entity.unwrap().id, "/heists/4");
        assert_eq!(payload.client_mutation_id.as_deref(), Some("abc"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(3000);
        let out = truncate_body(body.as_bytes());
        assert!(out.ends_with('…'));
        assert!(out.len() <= 4096 + '…'.len_utf8());
    }
}
