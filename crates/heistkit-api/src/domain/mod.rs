//! One module per backend resource. Every function issues exactly one request.

pub mod asset;
pub mod contractor_request;
pub mod crew_member;
pub mod employee;
pub mod establishment;
pub mod heist;
pub mod location;
pub mod review;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::client::{execute, execute_mutation, GraphqlClient};
use crate::error::ClientError;
use crate::operation::{Document, GraphqlRequest};
use crate::selection::{Selection, SelectionError};
use crate::types::{IriRef, Page, Payload};

fn to_object(value: &impl Serialize) -> Result<Map<String, Value>, ClientError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ClientError::Json(format!(
            "expected an object of variables, got {other}"
        ))),
    }
}

/// `{ "input": { ...fields } }`
fn input(fields: &impl Serialize) -> Result<Value, ClientError> {
    Ok(json!({ "input": to_object(fields)? }))
}

/// `{ "input": { "id": <iri>, ...fields } }`
fn input_with_id(iri: String, fields: &impl Serialize) -> Result<Value, ClientError> {
    let mut obj = to_object(fields)?;
    obj.insert("id".to_string(), Value::String(iri));
    Ok(json!({ "input": obj }))
}

/// Flat variables of a collection query: set filters plus cursor arguments.
fn collection_vars(filters: &impl Serialize, page: &Page) -> Result<Value, ClientError> {
    let mut obj = to_object(filters)?;
    obj.extend(to_object(page)?);
    Ok(Value::Object(obj))
}

fn get_one<T: DeserializeOwned>(
    client: &dyn GraphqlClient,
    doc: &Document,
    iri: String,
) -> Result<Option<T>, ClientError> {
    execute(client, &doc.request(json!({ "id": iri })), doc.root_field)
}

fn get_partial<T: DeserializeOwned>(
    client: &dyn GraphqlClient,
    operation_name: &str,
    root_field: &str,
    iri: String,
    selection: &Selection,
) -> Result<Option<T>, ClientError> {
    if selection.is_empty() {
        return Err(SelectionError::Empty.into());
    }
    let text = format!(
        "query {operation_name}($id: ID!) {{ {root_field}(id: $id) {{ {selection} }} }}"
    );
    let request =
        GraphqlRequest::new(text, json!({ "id": iri })).with_operation_name(operation_name);
    execute(client, &request, root_field)
}

fn mutate<T: DeserializeOwned>(
    client: &dyn GraphqlClient,
    doc: &Document,
    entity_field: &str,
    variables: Value,
) -> Result<Payload<T>, ClientError> {
    execute_mutation(client, &doc.request(variables), doc.root_field, entity_field)
}

fn delete(
    client: &dyn GraphqlClient,
    doc: &Document,
    entity_field: &str,
    iri: String,
) -> Result<Payload<IriRef>, ClientError> {
    mutate(client, doc, entity_field, json!({ "input": { "id": iri } }))
}
