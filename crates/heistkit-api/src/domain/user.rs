use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, get_partial, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::selection::Selection;
use crate::types::{Connection, IriRef, Page, Payload, User, UserStatus};

pub const RESOURCE: &str = "users";

pub const GET_USER: Document = Document::new(
    "GetUser",
    "user",
    "query GetUser($id: ID!) { user(id: $id) { id username email roles status balance locale createdAt } }",
);

pub const GET_USERS: Document = Document::new(
    "GetUsers",
    "users",
    "query GetUsers($first: Int, $after: String, $status: String, $username: String) { \
users(first: $first, after: $after, status: $status, username: $username) { \
edges { node { id username status roles } cursor } pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_USER: Document = Document::new(
    "CreateUser",
    "createUser",
    "mutation CreateUser($input: createUserInput!) { createUser(input: $input) { user { id username email status locale } clientMutationId } }",
);

pub const UPDATE_USER: Document = Document::new(
    "UpdateUser",
    "updateUser",
    "mutation UpdateUser($input: updateUserInput!) { updateUser(input: $input) { user { id username email status balance locale } clientMutationId } }",
);

pub const DELETE_USER: Document = Document::new(
    "DeleteUser",
    "deleteUser",
    "mutation DeleteUser($input: deleteUserInput!) { deleteUser(input: $input) { user { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub plain_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

pub fn get_user(client: &dyn GraphqlClient, id: &str) -> Result<Option<User>, ClientError> {
    get_one(client, &GET_USER, iri(RESOURCE, id))
}

pub fn get_user_partial(
    client: &dyn GraphqlClient,
    id: &str,
    selection: &Selection,
) -> Result<Option<User>, ClientError> {
    get_partial(client, "GetUserPartial", "user", iri(RESOURCE, id), selection)
}

pub fn get_users(
    client: &dyn GraphqlClient,
    filters: &UserFilters,
    page: &Page,
) -> Result<Connection<User>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(client, &GET_USERS.request(vars), GET_USERS.root_field)
}

pub fn create_user(
    client: &dyn GraphqlClient,
    user: &CreateUserInput,
) -> Result<Payload<User>, ClientError> {
    mutate(client, &CREATE_USER, "user", input(user)?)
}

pub fn update_user(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateUserInput,
) -> Result<Payload<User>, ClientError> {
    mutate(
        client,
        &UPDATE_USER,
        "user",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

pub fn delete_user(client: &dyn GraphqlClient, id: &str) -> Result<Payload<IriRef>, ClientError> {
    delete(client, &DELETE_USER, "user", iri(RESOURCE, id))
}

/// Mark the user as dead (a failed heist with lethal stakes).
pub fn kill_user(client: &dyn GraphqlClient, id: &str) -> Result<Payload<User>, ClientError> {
    let changes = UpdateUserInput {
        status: Some(UserStatus::Dead),
        ..Default::default()
    };
    update_user(client, id, &changes)
}

/// Confirm a pending account.
pub fn validate_user(client: &dyn GraphqlClient, id: &str) -> Result<Payload<User>, ClientError> {
    let changes = UpdateUserInput {
        status: Some(UserStatus::Alive),
        ..Default::default()
    };
    update_user(client, id, &changes)
}
