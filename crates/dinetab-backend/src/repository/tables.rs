//! Dining table repository.

use dinetab_core::{DiningTable, NewTable, RowId, TableUpdate};

use super::{delete_row, fetch_all, fetch_one, insert_row, update_row, TABLES};
use crate::client::BackendClient;
use crate::error::BackendResult;
use crate::query::{Direction, Query};

/// Repository for the `tables` collection.
pub struct TableRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> TableRepository<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Active tables by table number.
    pub async fn list_active(&self) -> BackendResult<Vec<DiningTable>> {
        let backend = self.client.backend()?;
        let query = Query::select(TABLES, "*")
            .eq("active", true)
            .order("table_number", Direction::Asc);
        fetch_all(backend.as_ref(), query).await
    }

    pub async fn get(&self, id: &RowId) -> BackendResult<DiningTable> {
        let backend = self.client.backend()?;
        fetch_one(backend.as_ref(), Query::select(TABLES, "*").eq("id", id)).await
    }

    pub async fn create(&self, table: &NewTable) -> BackendResult<DiningTable> {
        let backend = self.client.backend()?;
        insert_row(backend.as_ref(), TABLES, table).await
    }

    pub async fn update(&self, id: &RowId, patch: &TableUpdate) -> BackendResult<DiningTable> {
        let backend = self.client.backend()?;
        update_row(backend.as_ref(), TABLES, id, patch).await
    }

    pub async fn delete(&self, id: &RowId) -> BackendResult<()> {
        let backend = self.client.backend()?;
        delete_row(backend.as_ref(), TABLES, id).await
    }
}
