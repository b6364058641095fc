use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::types::{Connection, CrewMember, IriRef, Page, Payload};

pub const RESOURCE: &str = "crew_members";

pub const GET_CREW_MEMBER: Document = Document::new(
    "GetCrewMember",
    "crewMember",
    "query GetCrewMember($id: ID!) { crewMember(id: $id) { \
        id payout user { id username status } heist { id name phase } \
        assets { edges { node { id name type } } totalCount } } }",
);

pub const GET_CREW_MEMBERS: Document = Document::new(
    "GetCrewMembers",
    "crewMembers",
    "query GetCrewMembers($first: Int, $after: String, $heist: String, $user: String) { \
        crewMembers(first: $first, after: $after, heist: $heist, user: $user) { \
        edges { node { id payout user { id username status } heist { id name } } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_CREW_MEMBER: Document = Document::new(
    "CreateCrewMember",
    "createCrewMember",
    "mutation CreateCrewMember($input: createCrewMemberInput!) { createCrewMember(input: $input) { \
        crewMember { id user { id } heist { id } } clientMutationId } }",
);

pub const UPDATE_CREW_MEMBER: Document = Document::new(
    "UpdateCrewMember",
    "updateCrewMember",
    "mutation UpdateCrewMember($input: updateCrewMemberInput!) { updateCrewMember(input: $input) { \
        crewMember { id payout assets { edges { node { id } } } } clientMutationId } }",
);

pub const DELETE_CREW_MEMBER: Document = Document::new(
    "DeleteCrewMember",
    "deleteCrewMember",
    "mutation DeleteCrewMember($input: deleteCrewMemberInput!) { deleteCrewMember(input: $input) { \
        crewMember { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct CrewMemberFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl CrewMemberFilters {
    pub fn heist(mut self, heist_id: &str) -> Self {
        self.heist = Some(iri("heists", heist_id));
        self
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user = Some(iri("users", user_id));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCrewMemberInput {
    pub heist: String,
    pub user: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,
}

impl CreateCrewMemberInput {
    pub fn new(heist_id: &str, user_id: &str) -> Self {
        Self {
            heist: iri("heists", heist_id),
            user: iri("users", user_id),
            assets: Vec::new(),
        }
    }

    pub fn with_asset(mut self, asset_id: &str) -> Self {
        self.assets.push(iri("assets", asset_id));
        self
    }
}

/// `assets` replaces the whole list when set.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCrewMemberInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout: Option<f64>,
}

impl UpdateCrewMemberInput {
    pub fn assets<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            assets: Some(ids.into_iter().map(|id| iri("assets", id)).collect()),
            payout: None,
        }
    }
}

pub fn get_crew_member(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Option<CrewMember>, ClientError> {
    get_one(client, &GET_CREW_MEMBER, iri(RESOURCE, id))
}

pub fn get_crew_members(
    client: &dyn GraphqlClient,
    filters: &CrewMemberFilters,
    page: &Page,
) -> Result<Connection<CrewMember>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(
        client,
        &GET_CREW_MEMBERS.request(vars),
        GET_CREW_MEMBERS.root_field,
    )
}

pub fn create_crew_member(
    client: &dyn GraphqlClient,
    member: &CreateCrewMemberInput,
) -> Result<Payload<CrewMember>, ClientError> {
    mutate(client, &CREATE_CREW_MEMBER, "crewMember", input(member)?)
}

pub fn update_crew_member(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateCrewMemberInput,
) -> Result<Payload<CrewMember>, ClientError> {
    mutate(
        client,
        &UPDATE_CREW_MEMBER,
        "crewMember",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

pub fn delete_crew_member(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<IriRef>, ClientError> {
    delete(client, &DELETE_CREW_MEMBER, "crewMember", iri(RESOURCE, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use serde_json::json;

    #[test]
    fn create_crew_member_builds_iris() {
        let client = MockClient::new();
        client.push_data(json!({
            "createCrewMember": {
                "crewMember": { "id": "/crew_members/7", "heist": { "id": "/heists/1" }, "user": { "id": "/users/2" } },
                "clientMutationId": null
            }
        }));
        let member = CreateCrewMemberInput::new("1", "2").with_asset("9");
        let payload = create_crew_member(&client, &member).unwrap();
        let created = payload.entity.unwrap();
        assert_eq!(created.id, "/crew_members/7");
        assert_eq!(created.heist.unwrap().id, "/heists/1");
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "heist": "/heists/1", "user": "/users/2", "assets": ["/assets/9"] } })
        );
    }

    #[test]
    fn update_crew_member_replaces_assets() {
        let client = MockClient::new();
        update_crew_member(&client, "7", &UpdateCrewMemberInput::assets(["1", "/assets/2"])).unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "id": "/crew_members/7", "assets": ["/assets/1", "/assets/2"] } })
        );
    }

    #[test]
    fn get_crew_members_of_heist() {
        let client = MockClient::new();
        client.push_data(json!({
            "crewMembers": {
                "edges": [
                    { "node": { "id": "/crew_members/1", "user": { "id": "/users/2", "status": "Alive" } } },
                    { "node": { "id": "/crew_members/2", "user": { "id": "/users/3", "status": "Dead" } } }
                ],
                "totalCount": 2
            }
        }));
        let crew = get_crew_members(
            &client,
            &CrewMemberFilters::default().heist("1"),
            &Page::default(),
        )
        .unwrap();
        assert_eq!(crew.nodes().count(), 2);
        assert_eq!(client.last_variables(), json!({ "heist": "/heists/1" }));
        assert_eq!(
            client.last_request().unwrap().operation_name.as_deref(),
            Some("GetCrewMembers")
        );
    }

    #[test]
    fn delete_crew_member_sends_iri() {
        let client = MockClient::new();
        delete_crew_member(&client, "4").unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "id": "/crew_members/4" } })
        );
    }
}
