//! Menu item repository.
//!
//! Reads embed the item's category (`slug`, `display_order`) so the customer
//! page can group and sort without a second request.

use dinetab_core::{Language, MenuItem, MenuItemUpdate, NewMenuItem, RowId};

use super::{delete_row, fetch_all, insert_row, update_row, MENU_ITEMS};
use crate::client::BackendClient;
use crate::error::BackendResult;
use crate::query::{Direction, Query};

const MENU_SELECT: &str = "*, categories(slug, display_order)";

/// Repository for the `menu_items` collection.
pub struct MenuRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> MenuRepository<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    fn available() -> Query {
        Query::select(MENU_ITEMS, MENU_SELECT)
            .eq("available", true)
            .order("category_id", Direction::Asc)
    }

    /// Available items, grouped by category id.
    pub async fn list_available(&self) -> BackendResult<Vec<MenuItem>> {
        let backend = self.client.backend()?;
        fetch_all(backend.as_ref(), Self::available()).await
    }

    /// Available items written for one menu language.
    pub async fn list_available_in(&self, language: Language) -> BackendResult<Vec<MenuItem>> {
        let backend = self.client.backend()?;
        let query = Self::available().eq("language", language.code());
        fetch_all(backend.as_ref(), query).await
    }

    pub async fn create(&self, item: &NewMenuItem) -> BackendResult<MenuItem> {
        let backend = self.client.backend()?;
        insert_row(backend.as_ref(), MENU_ITEMS, item).await
    }

    pub async fn update(&self, id: &RowId, patch: &MenuItemUpdate) -> BackendResult<MenuItem> {
        let backend = self.client.backend()?;
        update_row(backend.as_ref(), MENU_ITEMS, id, patch).await
    }

    pub async fn delete(&self, id: &RowId) -> BackendResult<()> {
        let backend = self.client.backend()?;
        delete_row(backend.as_ref(), MENU_ITEMS, id).await
    }
}
