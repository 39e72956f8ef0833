//! Employee repository.

use dinetab_core::{Employee, EmployeeUpdate, NewEmployee, RowId};

use super::{delete_row, fetch_all, insert_row, update_row, EMPLOYEES};
use crate::client::BackendClient;
use crate::error::BackendResult;
use crate::query::{Direction, Query};

/// Repository for the `employees` collection.
pub struct EmployeeRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> EmployeeRepository<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// All employees by name.
    pub async fn list(&self) -> BackendResult<Vec<Employee>> {
        let backend = self.client.backend()?;
        let query = Query::select(EMPLOYEES, "*").order("name", Direction::Asc);
        fetch_all(backend.as_ref(), query).await
    }

    pub async fn create(&self, employee: &NewEmployee) -> BackendResult<Employee> {
        let backend = self.client.backend()?;
        insert_row(backend.as_ref(), EMPLOYEES, employee).await
    }

    pub async fn update(&self, id: &RowId, patch: &EmployeeUpdate) -> BackendResult<Employee> {
        let backend = self.client.backend()?;
        update_row(backend.as_ref(), EMPLOYEES, id, patch).await
    }

    pub async fn delete(&self, id: &RowId) -> BackendResult<()> {
        let backend = self.client.backend()?;
        delete_row(backend.as_ref(), EMPLOYEES, id).await
    }
}
