use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::types::{Asset, AssetType, Connection, IriRef, Page, Payload};

pub const RESOURCE: &str = "assets";

pub const GET_ASSET: Document = Document::new(
    "GetAsset",
    "asset",
    "query GetAsset($id: ID!) { asset(id: $id) { id name description type price maxQuantity } }",
);

pub const GET_ASSETS: Document = Document::new(
    "GetAssets",
    "assets",
    "query GetAssets($first: Int, $after: String, $type: String) { \
        assets(first: $first, after: $after, type: $type) { \
        edges { node { id name type price maxQuantity } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_ASSET: Document = Document::new(
    "CreateAsset",
    "createAsset",
    "mutation CreateAsset($input: createAssetInput!) { createAsset(input: $input) { \
        asset { id name description type price maxQuantity } clientMutationId } }",
);

pub const UPDATE_ASSET: Document = Document::new(
    "UpdateAsset",
    "updateAsset",
    "mutation UpdateAsset($input: updateAssetInput!) { updateAsset(input: $input) { \
        asset { id name description type price maxQuantity } clientMutationId } }",
);

pub const DELETE_ASSET: Document = Document::new(
    "DeleteAsset",
    "deleteAsset",
    "mutation DeleteAsset($input: deleteAssetInput!) { deleteAsset(input: $input) { asset { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetFilters {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetInput {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_quantity: Option<u32>,
}

pub fn get_asset(client: &dyn GraphqlClient, id: &str) -> Result<Option<Asset>, ClientError> {
    get_one(client, &GET_ASSET, iri(RESOURCE, id))
}

pub fn get_assets(
    client: &dyn GraphqlClient,
    filters: &AssetFilters,
    page: &Page,
) -> Result<Connection<Asset>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(client, &GET_ASSETS.request(vars), GET_ASSETS.root_field)
}

pub fn create_asset(
    client: &dyn GraphqlClient,
    asset: &CreateAssetInput,
) -> Result<Payload<Asset>, ClientError> {
    mutate(client, &CREATE_ASSET, "asset", input(asset)?)
}

pub fn update_asset(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateAssetInput,
) -> Result<Payload<Asset>, ClientError> {
    mutate(
        client,
        &UPDATE_ASSET,
        "asset",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

pub fn delete_asset(client: &dyn GraphqlClient, id: &str) -> Result<Payload<IriRef>, ClientError> {
    delete(client, &DELETE_ASSET, "asset", iri(RESOURCE, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use serde_json::json;

    #[test]
    fn asset_type_is_sent_as_type() {
        let client = MockClient::new();
        create_asset(
            &client,
            &CreateAssetInput {
                name: "Getaway van".into(),
                asset_type: AssetType::Vehicle,
                price: 1200.0,
                description: None,
                max_quantity: Some(1),
            },
        )
        .unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": {
                "name": "Getaway van",
                "type": "Vehicle",
                "price": 1200.0,
                "maxQuantity": 1
            } })
        );
    }

    #[test]
    fn get_assets_filters_by_type() {
        let client = MockClient::new();
        client.push_data(json!({
            "assets": {
                "edges": [{ "node": { "id": "/assets/2", "type": "Weapon", "price": 300.0 } }],
                "pageInfo": { "endCursor": "MQ==", "hasNextPage": true },
                "totalCount": 14
            }
        }));
        let filters = AssetFilters {
            asset_type: Some(AssetType::Weapon),
        };
        let assets = get_assets(&client, &filters, &Page::first(1)).unwrap();
        assert_eq!(assets.next_cursor(), Some("MQ=="));
        assert_eq!(assets.into_nodes()[0].asset_type, Some(AssetType::Weapon));
        assert_eq!(
            client.last_variables(),
            json!({ "type": "Weapon", "first": 1 })
        );
    }

    #[test]
    fn update_asset_sends_id_and_price() {
        let client = MockClient::new();
        let changes = UpdateAssetInput {
            price: Some(99.5),
            ..Default::default()
        };
        update_asset(&client, "5", &changes).unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "id": "/assets/5", "price": 99.5 } })
        );
    }

    #[test]
    fn get_asset_uses_iri() {
        let client = MockClient::new();
        client.push_data(json!({ "asset": { "id": "/assets/1", "name": "Drill" } }));
        let asset = get_asset(&client, "1").unwrap().unwrap();
        assert_eq!(asset.name.as_deref(), Some("Drill"));
        assert_eq!(client.last_variables(), json!({ "id": "/assets/1" }));
    }

    #[test]
    fn delete_asset_returns_reference() {
        let client = MockClient::new();
        client.push_data(json!({
            "deleteAsset": { "asset": { "id": "/assets/4" }, "clientMutationId": null }
        }));
        let payload = delete_asset(&client, "4").unwrap();
        assert_eq!(payload.entity.unwrap().id, "/assets/4");
    }
}
