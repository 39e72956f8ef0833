//! # Repository Module
//!
//! One repository per backend collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Page                                                                   │
//! │    │  client.orders().list(&OrderFilter::default().status(Pending))    │
//! │    ▼                                                                    │
//! │  OrderRepository                                                       │
//! │    │  1. client handle ── missing? → NotInitialized (nothing sent)     │
//! │    │  2. build Query                                                   │
//! │    │  3. backend.execute(query)          exactly one request           │
//! │    │  4. decode rows into DTOs           Decode names the collection   │
//! │    ▼                                                                    │
//! │  Vec<Order>                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TableRepository`] - dining tables
//! - [`MenuRepository`] - menu items
//! - [`CategoryRepository`] - menu categories
//! - [`OrderRepository`] - orders, status and payment updates
//! - [`EmployeeRepository`] - staff records
//! - [`ShiftRepository`] - shifts, clock-in/out
//! - [`AnalyticsRepository`] - daily aggregates and the day report

pub mod analytics;
pub mod categories;
pub mod employees;
pub mod menu;
pub mod orders;
pub mod shifts;
pub mod tables;

pub use analytics::AnalyticsRepository;
pub use categories::CategoryRepository;
pub use employees::EmployeeRepository;
pub use menu::MenuRepository;
pub use orders::OrderRepository;
pub use shifts::ShiftRepository;
pub use tables::TableRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use dinetab_core::RowId;

use crate::client::Backend;
use crate::error::{BackendError, BackendResult};
use crate::query::Query;

// =============================================================================
// Collections
// =============================================================================

pub const TABLES: &str = "tables";
pub const CATEGORIES: &str = "categories";
pub const MENU_ITEMS: &str = "menu_items";
pub const ORDERS: &str = "orders";
pub const EMPLOYEES: &str = "employees";
pub const EMPLOYEE_SHIFTS: &str = "employee_shifts";
pub const DAILY_ANALYTICS: &str = "daily_analytics";

// =============================================================================
// Shared Helpers
// =============================================================================

/// Normalizes a response into a row list. A bare object counts as one row.
fn rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn decode_rows<T: DeserializeOwned>(collection: &str, value: Value) -> BackendResult<Vec<T>> {
    rows(value)
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| BackendError::decode(collection, e)))
        .collect()
}

/// Runs `query` and decodes every returned row.
pub(crate) async fn fetch_all<T: DeserializeOwned>(
    backend: &dyn Backend,
    query: Query,
) -> BackendResult<Vec<T>> {
    let collection = query.collection.clone();
    let value = backend.execute(query).await?;
    decode_rows(&collection, value)
}

/// Runs `query` expecting exactly one row.
pub(crate) async fn fetch_one<T: DeserializeOwned>(
    backend: &dyn Backend,
    query: Query,
) -> BackendResult<T> {
    let collection = query.collection.clone();
    let value = backend.execute(query.single()).await?;
    let mut rows = rows(value);
    if rows.len() != 1 {
        return Err(BackendError::NotSingleRow {
            collection,
            count: rows.len(),
        });
    }
    serde_json::from_value(rows.remove(0)).map_err(|e| BackendError::decode(&collection, e))
}

fn to_body<P: Serialize>(collection: &str, payload: &P) -> BackendResult<Value> {
    serde_json::to_value(payload).map_err(|e| BackendError::encode(collection, e))
}

/// Inserts one row and returns it as stored.
pub(crate) async fn insert_row<P: Serialize, T: DeserializeOwned>(
    backend: &dyn Backend,
    collection: &str,
    payload: &P,
) -> BackendResult<T> {
    let body = to_body(collection, payload)?;
    fetch_one(backend, Query::insert(collection, body)).await
}

/// Patches the row with `id` and returns it as stored.
pub(crate) async fn update_row<P: Serialize, T: DeserializeOwned>(
    backend: &dyn Backend,
    collection: &str,
    id: &RowId,
    patch: &P,
) -> BackendResult<T> {
    let body = to_body(collection, patch)?;
    fetch_one(backend, Query::update(collection, body).eq("id", id)).await
}

/// Deletes the row with `id`. Deleting a missing row is not an error.
pub(crate) async fn delete_row(
    backend: &dyn Backend,
    collection: &str,
    id: &RowId,
) -> BackendResult<()> {
    backend
        .execute(Query::delete(collection).eq("id", id))
        .await
        .map(|_| ())
}
