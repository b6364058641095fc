use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, get_partial, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::selection::Selection;
use crate::types::{Connection, Establishment, IriRef, Page, Payload};

pub const RESOURCE: &str = "establishments";

pub const GET_ESTABLISHMENT: Document = Document::new(
    "GetEstablishment",
    "establishment",
    "query GetEstablishment($id: ID!) { establishment(id: $id) { \
        id name description minimumPrice contractorCut employeeCut crewCut \
        contractor { id username } \
        employees { edges { node { id codeName status } } totalCount } } }",
);

pub const GET_ESTABLISHMENTS: Document = Document::new(
    "GetEstablishments",
    "establishments",
    "query GetEstablishments($first: Int, $after: String, $contractor: String, $name: String) { \
        establishments(first: $first, after: $after, contractor: $contractor, name: $name) { \
        edges { node { id name minimumPrice contractor { id username } } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_ESTABLISHMENT: Document = Document::new(
    "CreateEstablishment",
    "createEstablishment",
    "mutation CreateEstablishment($input: createEstablishmentInput!) { createEstablishment(input: $input) { \
        establishment { id name description minimumPrice contractorCut employeeCut crewCut } clientMutationId } }",
);

pub const UPDATE_ESTABLISHMENT: Document = Document::new(
    "UpdateEstablishment",
    "updateEstablishment",
    "mutation UpdateEstablishment($input: updateEstablishmentInput!) { updateEstablishment(input: $input) { \
        establishment { id name description minimumPrice contractorCut employeeCut crewCut } clientMutationId } }",
);

pub const DELETE_ESTABLISHMENT: Document = Document::new(
    "DeleteEstablishment",
    "deleteEstablishment",
    "mutation DeleteEstablishment($input: deleteEstablishmentInput!) { deleteEstablishment(input: $input) { \
        establishment { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct EstablishmentFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EstablishmentFilters {
    pub fn contractor(mut self, user_id: &str) -> Self {
        self.contractor = Some(iri("users", user_id));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Cuts are fractions of the heist payout (`0.0..=1.0`); the backend validates their sum.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEstablishmentInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub minimum_price: f64,
    pub contractor_cut: f64,
    pub employee_cut: f64,
    pub crew_cut: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEstablishmentInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_cut: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_cut: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_cut: Option<f64>,
}

pub fn get_establishment(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Option<Establishment>, ClientError> {
    get_one(client, &GET_ESTABLISHMENT, iri(RESOURCE, id))
}

pub fn get_establishment_partial(
    client: &dyn GraphqlClient,
    id: &str,
    selection: &Selection,
) -> Result<Option<Establishment>, ClientError> {
    get_partial(
        client,
        "GetEstablishmentPartial",
        "establishment",
        iri(RESOURCE, id),
        selection,
    )
}

pub fn get_establishments(
    client: &dyn GraphqlClient,
    filters: &EstablishmentFilters,
    page: &Page,
) -> Result<Connection<Establishment>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(
        client,
        &GET_ESTABLISHMENTS.request(vars),
        GET_ESTABLISHMENTS.root_field,
    )
}

pub fn create_establishment(
    client: &dyn GraphqlClient,
    establishment: &CreateEstablishmentInput,
) -> Result<Payload<Establishment>, ClientError> {
    mutate(
        client,
        &CREATE_ESTABLISHMENT,
        "establishment",
        input(establishment)?,
    )
}

pub fn update_establishment(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateEstablishmentInput,
) -> Result<Payload<Establishment>, ClientError> {
    mutate(
        client,
        &UPDATE_ESTABLISHMENT,
        "establishment",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

pub fn delete_establishment(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<IriRef>, ClientError> {
    delete(
        client,
        &DELETE_ESTABLISHMENT,
        "establishment",
        iri(RESOURCE, id),
    )
}
