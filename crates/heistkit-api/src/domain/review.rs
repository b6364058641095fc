use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::types::{Connection, IriRef, Page, Payload, Review};

pub const RESOURCE: &str = "reviews";

pub const GET_REVIEW: Document = Document::new(
    "GetReview",
    "review",
    "query GetReview($id: ID!) { review(id: $id) { \
        id rating comment createdAt user { id username } location { id name } } }",
);

pub const GET_REVIEWS: Document = Document::new(
    "GetReviews",
    "reviews",
    "query GetReviews($first: Int, $after: String, $location: String, $user: String) { \
        reviews(first: $first, after: $after, location: $location, user: $user) { \
        edges { node { id rating comment createdAt user { id username } } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_REVIEW: Document = Document::new(
    "CreateReview",
    "createReview",
    "mutation CreateReview($input: createReviewInput!) { createReview(input: $input) { \
        review { id rating comment location { id averageRating reviewCount } } clientMutationId } }",
);

pub const UPDATE_REVIEW: Document = Document::new(
    "UpdateReview",
    "updateReview",
    "mutation UpdateReview($input: updateReviewInput!) { updateReview(input: $input) { \
        review { id rating comment } clientMutationId } }",
);

pub const DELETE_REVIEW: Document = Document::new(
    "DeleteReview",
    "deleteReview",
    "mutation DeleteReview($input: deleteReviewInput!) { deleteReview(input: $input) { review { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ReviewFilters {
    pub fn location(mut self, location_id: &str) -> Self {
        self.location = Some(iri("locations", location_id));
        self
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user = Some(iri("users", user_id));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    pub location: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreateReviewInput {
    pub fn new(location_id: &str, rating: u8) -> Self {
        Self {
            location: iri("locations", location_id),
            rating,
            comment: None,
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

pub fn get_review(client: &dyn GraphqlClient, id: &str) -> Result<Option<Review>, ClientError> {
    get_one(client, &GET_REVIEW, iri(RESOURCE, id))
}

pub fn get_reviews(
    client: &dyn GraphqlClient,
    filters: &ReviewFilters,
    page: &Page,
) -> Result<Connection<Review>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(client, &GET_REVIEWS.request(vars), GET_REVIEWS.root_field)
}

pub fn create_review(
    client: &dyn GraphqlClient,
    review: &CreateReviewInput,
) -> Result<Payload<Review>, ClientError> {
    mutate(client, &CREATE_REVIEW, "review", input(review)?)
}

pub fn update_review(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateReviewInput,
) -> Result<Payload<Review>, ClientError> {
    mutate(
        client,
        &UPDATE_REVIEW,
        "review",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

pub fn delete_review(client: &dyn GraphqlClient, id: &str) -> Result<Payload<IriRef>, ClientError> {
    delete(client, &DELETE_REVIEW, "review", iri(RESOURCE, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use serde_json::json;

    #[test]
    fn create_review_targets_location() {
        let client = MockClient::new();
        client.push_data(json!({
            "createReview": {
                "review": {
                    "id": "/reviews/1",
                    "rating": 4,
                    "location": { "id": "/locations/3", "averageRating": 4.0, "reviewCount": 1 }
                },
                "clientMutationId": null
            }
        }));
        let review = CreateReviewInput::new("3", 4).comment("Clean exits");
        let created = create_review(&client, &review).unwrap().entity.unwrap();
        assert_eq!(created.rating, Some(4));
        assert_eq!(created.location.unwrap().review_count, Some(1));
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "location": "/locations/3", "rating": 4, "comment": "Clean exits" } })
        );
    }

    #[test]
    fn get_reviews_by_location_and_user() {
        let client = MockClient::new();
        client.push_data(json!({ "reviews": { "edges": [], "totalCount": 0 } }));
        let filters = ReviewFilters::default().location("3").user("2");
        get_reviews(&client, &filters, &Page::first(50)).unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "location": "/locations/3", "user": "/users/2", "first": 50 })
        );
    }

    #[test]
    fn update_review_changes_rating() {
        let client = MockClient::new();
        let changes = UpdateReviewInput {
            rating: Some(2),
            comment: None,
        };
        update_review(&client, "1", &changes).unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "id": "/reviews/1", "rating": 2 } })
        );
    }

    #[test]
    fn delete_review_sends_iri() {
        let client = MockClient::new();
        delete_review(&client, "1").unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "id": "/reviews/1" } })
        );
    }
}
