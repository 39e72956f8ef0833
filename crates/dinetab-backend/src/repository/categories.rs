//! Menu category repository.

use dinetab_core::{Category, CategoryUpdate, NewCategory, RowId};

use super::{delete_row, fetch_all, insert_row, update_row, CATEGORIES};
use crate::client::BackendClient;
use crate::error::BackendResult;
use crate::query::{Direction, Query};

/// Repository for the `categories` collection.
pub struct CategoryRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> CategoryRepository<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Active categories in menu order.
    pub async fn list_active(&self) -> BackendResult<Vec<Category>> {
        let backend = self.client.backend()?;
        let query = Query::select(CATEGORIES, "*")
            .eq("active", true)
            .order("display_order", Direction::Asc);
        fetch_all(backend.as_ref(), query).await
    }

    pub async fn create(&self, category: &NewCategory) -> BackendResult<Category> {
        let backend = self.client.backend()?;
        insert_row(backend.as_ref(), CATEGORIES, category).await
    }

    pub async fn update(&self, id: &RowId, patch: &CategoryUpdate) -> BackendResult<Category> {
        let backend = self.client.backend()?;
        update_row(backend.as_ref(), CATEGORIES, id, patch).await
    }

    pub async fn delete(&self, id: &RowId) -> BackendResult<()> {
        let backend = self.client.backend()?;
        delete_row(backend.as_ref(), CATEGORIES, id).await
    }
}
