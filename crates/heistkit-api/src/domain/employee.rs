use heistkit_core::iri;
use serde::Serialize;

use super::{collection_vars, delete, get_one, input, input_with_id, mutate};
use crate::client::{execute, GraphqlClient};
use crate::error::ClientError;
use crate::operation::Document;
use crate::types::{Connection, Employee, EmployeeStatus, IriRef, Page, Payload};

pub const RESOURCE: &str = "employees";

pub const GET_EMPLOYEE: Document = Document::new(
    "GetEmployee",
    "employee",
    "query GetEmployee($id: ID!) { employee(id: $id) { \
        id codeName description status user { id username } establishment { id name } } }",
);

pub const GET_EMPLOYEES: Document = Document::new(
    "GetEmployees",
    "employees",
    "query GetEmployees($first: Int, $after: String, $status: String, $establishment: String, $user: String) { \
        employees(first: $first, after: $after, status: $status, establishment: $establishment, user: $user) { \
        edges { node { id codeName status establishment { id name } } cursor } \
        pageInfo { endCursor hasNextPage } totalCount } }",
);

pub const CREATE_EMPLOYEE: Document = Document::new(
    "CreateEmployee",
    "createEmployee",
    "mutation CreateEmployee($input: createEmployeeInput!) { createEmployee(input: $input) { \
        employee { id codeName description status } clientMutationId } }",
);

pub const UPDATE_EMPLOYEE: Document = Document::new(
    "UpdateEmployee",
    "updateEmployee",
    "mutation UpdateEmployee($input: updateEmployeeInput!) { updateEmployee(input: $input) { \
        employee { id codeName description status } clientMutationId } }",
);

pub const VALIDATE_EMPLOYEE: Document = Document::new(
    "ValidateEmployee",
    "validateEmployee",
    "mutation ValidateEmployee($input: validateEmployeeInput!) { validateEmployee(input: $input) { \
        employee { id status } clientMutationId } }",
);

pub const DELETE_EMPLOYEE: Document = Document::new(
    "DeleteEmployee",
    "deleteEmployee",
    "mutation DeleteEmployee($input: deleteEmployeeInput!) { deleteEmployee(input: $input) { \
        employee { id } clientMutationId } }",
);

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmployeeFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl EmployeeFilters {
    pub fn status(mut self, status: EmployeeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn establishment(mut self, establishment_id: &str) -> Self {
        self.establishment = Some(iri("establishments", establishment_id));
        self
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user = Some(iri("users", user_id));
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeInput {
    pub code_name: String,
    pub establishment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateEmployeeInput {
    pub fn new(code_name: impl Into<String>, establishment_id: &str) -> Self {
        Self {
            code_name: code_name.into(),
            establishment: iri("establishments", establishment_id),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub fn get_employee(client: &dyn GraphqlClient, id: &str) -> Result<Option<Employee>, ClientError> {
    get_one(client, &GET_EMPLOYEE, iri(RESOURCE, id))
}

pub fn get_employees(
    client: &dyn GraphqlClient,
    filters: &EmployeeFilters,
    page: &Page,
) -> Result<Connection<Employee>, ClientError> {
    let vars = collection_vars(filters, page)?;
    execute(client, &GET_EMPLOYEES.request(vars), GET_EMPLOYEES.root_field)
}

/// Apply to an establishment. The backend attaches the calling user.
pub fn create_employee(
    client: &dyn GraphqlClient,
    employee: &CreateEmployeeInput,
) -> Result<Payload<Employee>, ClientError> {
    mutate(client, &CREATE_EMPLOYEE, "employee", input(employee)?)
}

pub fn update_employee(
    client: &dyn GraphqlClient,
    id: &str,
    changes: &UpdateEmployeeInput,
) -> Result<Payload<Employee>, ClientError> {
    mutate(
        client,
        &UPDATE_EMPLOYEE,
        "employee",
        input_with_id(iri(RESOURCE, id), changes)?,
    )
}

/// Accept a pending employee on behalf of the establishment's contractor.
pub fn validate_employee(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<Employee>, ClientError> {
    let vars = serde_json::json!({ "input": { "id": iri(RESOURCE, id) } });
    mutate(client, &VALIDATE_EMPLOYEE, "employee", vars)
}

pub fn delete_employee(
    client: &dyn GraphqlClient,
    id: &str,
) -> Result<Payload<IriRef>, ClientError> {
    delete(client, &DELETE_EMPLOYEE, "employee", iri(RESOURCE, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockClient;
    use serde_json::json;

    #[test]
    fn validate_employee_uses_validate_mutation() {
        let client = MockClient::new();
        client.push_data(json!({
            "validateEmployee": { "employee": { "id": "/employees/3", "status": "Active" } }
        }));
        let payload = validate_employee(&client, "3").unwrap();
        assert_eq!(payload.entity.unwrap().status, Some(EmployeeStatus::Active));

        let req = client.last_request().unwrap();
        assert_eq!(req.operation_name.as_deref(), Some("ValidateEmployee"));
        assert_eq!(req.variables, json!({ "input": { "id": "/employees/3" } }));
    }

    #[test]
    fn create_employee_references_establishment() {
        let client = MockClient::new();
        let mut employee = CreateEmployeeInput::new("Ghost", "2");
        employee.description = Some("Locksmith".into());
        create_employee(&client, &employee).unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": {
                "codeName": "Ghost",
                "establishment": "/establishments/2",
                "description": "Locksmith"
            } })
        );
    }

    #[test]
    fn get_employees_combines_filters_and_cursor() {
        let client = MockClient::new();
        client.push_data(json!({ "employees": { "edges": [] } }));
        let filters = EmployeeFilters::default()
            .status(EmployeeStatus::Pending)
            .establishment("2");
        let list = get_employees(&client, &filters, &Page::first(5).after("NA==")).unwrap();
        assert!(list.edges.is_empty());
        assert_eq!(
            client.last_variables(),
            json!({
                "status": "Pending",
                "establishment": "/establishments/2",
                "first": 5,
                "after": "NA=="
            })
        );
    }

    #[test]
    fn update_employee_keeps_full_iri() {
        let client = MockClient::new();
        let changes = UpdateEmployeeInput {
            code_name: Some("Wraith".into()),
            ..Default::default()
        };
        update_employee(&client, "/employees/3", &changes).unwrap();
        assert_eq!(
            client.last_variables(),
            json!({ "input": { "id": "/employees/3", "codeName": "Wraith" } })
        );
    }
}
