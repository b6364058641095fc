use heistkit_core::iri;
use serde::Serialize;
use serde_json::json;

use super::{collection_vars, delete, get_one, input, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::types::{Connection, ContractorRequest, ContractorRequestStatus, IriRef, Page, Payload};

pub const RESOURCE: &str = "contractor_requests";

pub const GET_CONTRACTOR_REQUEST: Document = Document::new(
    "GetContractorRequest",
    "contractorRequest",
    "query GetContractorRequest($id: ID!) { contractorRequest(id: $id) { \
        id status reason createdAt user { id username status } } }",
);

pub const GET_CONTRACTOR_REQUESTS: Document = Document::new(
    "GetContractorRequests",
    "contractorRequests",
    "query GetContractorRequests($first: Int, $after: String, $status: String, $user: String) { \
        contractorRequests(first: $first, after: $after, status: $status, user: $user) { \
        edges { node { id status reason createdAt user { id username } } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_CONTRACTOR_REQUEST: Document = Document::new(
    "CreateContractorRequest",
    "createContractorRequest",
    "mutation CreateContractorRequest($input: createContractorRequestInput!) { \
        createContractorRequest(input: $input) { contractorRequest { id status reason } clientMutationId } }",
);

pub const UPDATE_CONTRACTOR_REQUEST: Document = Document::new(
    "UpdateContractorRequest",
    "updateContractorRequest",
    "mutation UpdateContractorRequest($input: updateContractorRequestInput!) { \
        updateContractorRequest(input: $input) { contractorRequest { id status } clientMutationId } }",
);

pub const VALIDATE_CONTRACTOR_REQUEST: Document = Document::new(
    "ValidateContractorRequest",
    "validateContractorRequest",
    "mutation ValidateContractorRequest($input: validateContractorRequestInput!) { \
        validateContractorRequest(input: $input) { contractorRequest { id status user { id roles } } clientMutationId } }",
);

pub const DELETE_CONTRACTOR_REQUEST: Document = Document::new(
    "DeleteContractorRequest",
    "deleteContractorRequest",
    "mutation DeleteContractorRequest($input: deleteContractorRequestInput!) { \
        deleteContractorRequest(input: $input) { contractorRequest { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContractorRequestFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContractorRequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ContractorRequestFilters {
    pub fn status(mut self, status: ContractorRequestStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user = Some(iri("users", user_id));
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractorRequestInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub fn get_contractor_request(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Option<ContractorRequest>, ClientError> {
    get_one(client, &GET_CONTRACTOR_REQUEST, iri(RESOURCE, id))
}

pub fn get_contractor_requests(
    client: &dyn GraphqlClient,
    filters: &ContractorRequestFilters,
    page: &Page,
) -> Result<Connection<ContractorRequest>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(
        client,
        &GET_CONTRACTOR_REQUESTS.request(vars),
        GET_CONTRACTOR_REQUESTS.root_field,
    )
}

/// Ask to become a contractor. The requesting user comes from the token.
pub fn create_contractor_request(
    client: &dyn GraphqlClient,
    request: &CreateContractorRequestInput,
) -> Result<Payload<ContractorRequest>, ClientError> {
    mutate(
        client,
        &CREATE_CONTRACTOR_REQUEST,
        "contractorRequest",
        input(request)?,
    )
}

/// Accept the request; the backend grants the contractor role.
pub fn validate_contractor_request(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<ContractorRequest>, ClientError> {
    mutate(
        client,
        &VALIDATE_CONTRACTOR_REQUEST,
        "contractorRequest",
        json!({ "input": { "id": iri(RESOURCE, id) } }),
    )
}

pub fn reject_contractor_request(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<ContractorRequest>, ClientError> {
    mutate(
        client,
        &UPDATE_CONTRACTOR_REQUEST,
        "contractorRequest",
        json!({ "input": { "id": iri(RESOURCE, id), "status": ContractorRequestStatus::Rejected } }),
    )
}

pub fn delete_contractor_request(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<IriRef>, ClientError> {
    delete(
        client,
        &DELETE_CONTRACTOR_REQUEST,
        "contractorRequest",
        iri(RESOURCE, id),
    )
}
