use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::types::{Connection, IriRef, Location, Page, Payload};

pub const RESOURCE: &str = "locations";

pub const GET_LOCATION: Document = Document::new(
    "GetLocation",
    "location",
    "query GetLocation($id: ID!) { location(id: $id) { \
        id name address latitude longitude averageRating reviewCount } }",
);

pub const GET_LOCATIONS: Document = Document::new(
    "GetLocations",
    "locations",
    "query GetLocations($first: Int, $after: String, $name: String) { \
        locations(first: $first, after: $after, name: $name) { \
        edges { node { id name address averageRating reviewCount } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_LOCATION: Document = Document::new(
    "CreateLocation",
    "createLocation",
    "mutation CreateLocation($input: createLocationInput!) { createLocation(input: $input) { \
        location { id name address latitude longitude } clientMutationId } }",
);

pub const UPDATE_LOCATION: Document = Document::new(
    "UpdateLocation",
    "updateLocation",
    "mutation UpdateLocation($input: updateLocationInput!) { updateLocation(input: $input) { \
        location { id name address latitude longitude } clientMutationId } }",
);

pub const DELETE_LOCATION: Document = Document::new(
    "DeleteLocation",
    "deleteLocation",
    "mutation DeleteLocation($input: deleteLocationInput!) { deleteLocation(input: $input) { \
        location { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationInput {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

pub fn get_location(client: &dyn GraphqlClient, id: &str) -> Result<Option<Location>, ClientError> {
    get_one(client, &GET_LOCATION, iri(RESOURCE, id))
}

pub fn get_locations(
    client: &dyn GraphqlClient,
    filters: &LocationFilters,
    page: &Page,
) -> Result<Connection<Location>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(client, &GET_LOCATIONS.request(vars), GET_LOCATIONS.root_field)
}

pub fn create_location(
    client: &dyn GraphqlClient,
    location: &CreateLocationInput,
) -> Result<Payload<Location>, ClientError> {
    mutate(client, &CREATE_LOCATION, "location", input(location)?)
}

pub fn update_location(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateLocationInput,
) -> Result<Payload<Location>, ClientError> {
    mutate(
        client,
        &UPDATE_LOCATION,
        "location",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

pub fn delete_location(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<IriRef>, ClientError> {
    delete(client, &DELETE_LOCATION, "location", iri(RESOURCE, id))
}
