//! Subset of the backend schema the access layer reads and writes.
//!
//! Entity fields are optional because every document (and every partial
//! selection) asks for a different subset; only `id` is always selected.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// Cursor-paginated collection (`edges { node }`, `pageInfo`, `totalCount`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            page_info: None,
            total_count: None,
        }
    }
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.page_info
            .as_ref()
            .filter(|p| p.has_next_page)
            .and_then(|p| p.end_cursor.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// Cursor arguments of a collection query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl Page {
    pub fn first(n: u32) -> Self {
        Self {
            first: Some(n),
            after: None,
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }
}

/// Result of a mutation: the touched entity plus the echoed `clientMutationId`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload<T> {
    pub entity: Option<T>,
    pub client_mutation_id: Option<String>,
}

/// Bare reference, as returned by delete mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IriRef {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Pending,
    Alive,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeistPhase {
    Planning,
    InProgress,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeistDifficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    Weapon,
    Equipment,
    Vehicle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Pending,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractorRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub roles: Option<Vec<String>>,
    pub status: Option<UserStatus>,
    pub balance: Option<f64>,
    pub locale: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub average_rating: Option<f64>,
    pub review_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Establishment {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub minimum_price: Option<f64>,
    pub contractor_cut: Option<f64>,
    pub employee_cut: Option<f64>,
    pub crew_cut: Option<f64>,
    pub contractor: Option<User>,
    pub employees: Option<Connection<Employee>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Employee {
    pub id: String,
    pub code_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub user: Option<User>,
    pub establishment: Option<Establishment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub asset_type: Option<AssetType>,
    pub price: Option<f64>,
    pub max_quantity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrewMember {
    pub id: String,
    pub user: Option<User>,
    pub heist: Option<Heist>,
    pub assets: Option<Connection<Asset>>,
    pub payout: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Heist {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub phase: Option<HeistPhase>,
    pub difficulty: Option<HeistDifficulty>,
    pub preferred_tactic: Option<String>,
    pub start_at: Option<String>,
    pub should_end_at: Option<String>,
    pub minimum_pay_required: Option<f64>,
    pub contractor: Option<User>,
    pub employee: Option<Employee>,
    pub establishment: Option<Establishment>,
    pub location: Option<Location>,
    pub crew_members: Option<Connection<CrewMember>>,
    pub allowed_assets: Option<Connection<Asset>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub id: String,
    pub rating: Option<u8>,
    pub comment: Option<String>,
    pub user: Option<User>,
    pub location: Option<Location>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractorRequest {
    pub id: String,
    pub status: Option<ContractorRequestStatus>,
    pub reason: Option<String>,
    pub user: Option<User>,
    pub created_at: Option<String>,
}
