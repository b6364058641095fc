use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, get_partial, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::selection::Selection;
use crate::types::{Connection, Heist, HeistDifficulty, HeistPhase, IriRef, Page, Payload};

pub const RESOURCE: &str = "heists";

pub const GET_HEIST: Document = Document::new(
    "GetHeist",
    "heist",
    "query GetHeist($id: ID!) { heist(id: $id) { \
        id name description phase difficulty preferredTactic startAt shouldEndAt minimumPayRequired \
        contractor { id username } \
        employee { id codeName } \
        establishment { id name } \
        location { id name address latitude longitude } \
        crewMembers { edges { node { id user { id username status } } } totalCount } \
    } }",
);

pub const GET_HEISTS: Document = Document::new(
    "GetHeists",
    "heists",
    "query GetHeists($first: Int, $after: String, $phase: String, $contractor: String, $employee: String, \
        $establishment: String, $location: String) { \
        heists(first: $first, after: $after, phase: $phase, contractor: $contractor, employee: $employee, \
        establishment: $establishment, location: $location) { \
        edges { node { id name phase difficulty startAt location { id name } } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_HEIST: Document = Document::new(
    "CreateHeist",
    "createHeist",
    "mutation CreateHeist($input: createHeistInput!) { createHeist(input: $input) { \
        heist { id name phase difficulty startAt shouldEndAt } clientMutationId } }",
);

pub const UPDATE_HEIST: Document = Document::new(
    "UpdateHeist",
    "updateHeist",
    "mutation UpdateHeist($input: updateHeistInput!) { updateHeist(input: $input) { \
        heist { id name description phase difficulty preferredTactic startAt shouldEndAt minimumPayRequired } \
        clientMutationId } }",
);

pub const DELETE_HEIST: Document = Document::new(
    "DeleteHeist",
    "deleteHeist",
    "mutation DeleteHeist($input: deleteHeistInput!) { deleteHeist(input: $input) { heist { id } clientMutationId } }",
);

/// Collection filters. Reference filters are sent as IRIs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeistFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<HeistPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl HeistFilters {
    pub fn phase(mut self, phase: HeistPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn contractor(mut self, user_id: &str) -> Self {
        self.contractor = Some(iri("users", user_id));
        self
    }

    pub fn employee(mut self, employee_id: &str) -> Self {
        self.employee = Some(iri("employees", employee_id));
        self
    }

    pub fn establishment(mut self, establishment_id: &str) -> Self {
        self.establishment = Some(iri("establishments", establishment_id));
        self
    }

    pub fn location(mut self, location_id: &str) -> Self {
        self.location = Some(iri("locations", location_id));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHeistInput {
    pub name: String,
    pub location: String,
    pub establishment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<HeistDifficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_tactic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_pay_required: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_assets: Vec<String>,
}

impl CreateHeistInput {
    pub fn new(name: impl Into<String>, location_id: &str, establishment_id: &str) -> Self {
        Self {
            name: name.into(),
            location: iri("locations", location_id),
            establishment: iri("establishments", establishment_id),
            description: None,
            difficulty: None,
            preferred_tactic: None,
            start_at: None,
            should_end_at: None,
            minimum_pay_required: None,
            allowed_assets: Vec::new(),
        }
    }

    pub fn allow_asset(mut self, asset_id: &str) -> Self {
        self.allowed_assets.push(iri("assets", asset_id));
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHeistInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<HeistPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<HeistDifficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_tactic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_pay_required: Option<f64>,
}

pub fn get_heist(client: &dyn GraphqlClient, id: &str) -> Result<Option<Heist>, ClientError> {
    get_one(client, &GET_HEIST, iri(RESOURCE, id))
}

/// Fetch a heist with a caller-chosen selection set.
pub fn get_heist_partial(
    client: &dyn GraphqlClient,
    id: &str,
    selection: &Selection,
) -> Result<Option<Heist>, ClientError> {
    get_partial(client, "GetHeistPartial", "heist", iri(RESOURCE, id), selection)
}

pub fn get_heists(
    client: &dyn GraphqlClient,
    filters: &HeistFilters,
    page: &Page,
) -> Result<Connection<Heist>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(client, &GET_HEISTS.request(vars), GET_HEISTS.root_field)
}

pub fn create_heist(
    client: &dyn GraphqlClient,
    heist: &CreateHeistInput,
) -> Result<Payload<Heist>, ClientError> {
    mutate(client, &CREATE_HEIST, "heist", input(heist)?)
}

pub fn update_heist(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateHeistInput,
) -> Result<Payload<Heist>, ClientError> {
    mutate(
        client,
        &UPDATE_HEIST,
        "heist",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

pub fn update_heist_phase(
    client: &dyn GraphqlClient,
    id: &str,
    phase: HeistPhase,
) -> Result<Payload<Heist>, ClientError> {
    let changes = UpdateHeistInput {
        phase: Some(phase),
        ..Default::default()
    };
    update_heist(client, id, &changes)
}

pub fn delete_heist(client: &dyn GraphqlClient, id: &str) -> Result<Payload<IriRef>, ClientError> {
    delete(client, &DELETE_HEIST, "heist", iri(RESOURCE, id))
}
