//! GraphQL access layer for the heist backend.
//! Thin: every function maps one domain operation onto one request and
//! decodes the answer. Retries, caching and auth flows live with the caller.

pub mod client;
pub mod domain;
pub mod error;
pub mod mock;
pub mod operation;
pub mod selection;
pub mod types;

pub use client::{execute, execute_mutation, GraphqlClient, HttpClient, HttpClientBuilder};
pub use domain::{
    asset, contractor_request, crew_member, employee, establishment, heist, location, review, user,
};
pub use error::{ClientError, GraphqlError, GraphqlErrorLocation, GraphqlPathSegment};
pub use heistkit_core::{get_uri_id, iri, try_iri};
pub use mock::MockClient;
pub use operation::{Document, GraphqlRequest, GraphqlResponse};
pub use selection::{Selection, SelectionError};
pub use types::*;
