//! # Order Repository
//!
//! ```text
//! customer page ── create(NewOrder) ──────────────► orders (pending, unpaid)
//! kitchen/admin ── list(filter) ◄──────────────── orders + tables(table_number)
//!               ── update_status(id, Ready) ────► {status, updated_at}
//!               ── update_payment(id, Paid, Card) ► {payment_status, payment_method, updated_at}
//! ```
//!
//! `updated_at` is stamped from the client's [`Clock`](crate::client::Clock).

use chrono::{DateTime, Utc};
use serde::Serialize;

use dinetab_core::{NewOrder, Order, OrderFilter, OrderStatus, PaymentMethod, PaymentStatus, RowId};

use super::{fetch_all, insert_row, update_row, ORDERS};
use crate::client::BackendClient;
use crate::error::BackendResult;
use crate::query::{Direction, Query};

const ORDER_SELECT: &str = "*, tables(table_number)";

#[derive(Serialize)]
struct StatusPatch {
    status: OrderStatus,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct PaymentPatch {
    payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<PaymentMethod>,
    updated_at: DateTime<Utc>,
}

/// Repository for the `orders` collection.
pub struct OrderRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> OrderRepository<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Places an order and returns the stored row.
    pub async fn create(&self, order: &NewOrder) -> BackendResult<Order> {
        let backend = self.client.backend()?;
        insert_row(backend.as_ref(), ORDERS, order).await
    }

    /// Orders matching `filter`, newest first, with their table number.
    pub async fn list(&self, filter: &OrderFilter) -> BackendResult<Vec<Order>> {
        let backend = self.client.backend()?;
        let query = Query::select(ORDERS, ORDER_SELECT)
            .eq_opt("status", filter.status)
            .eq_opt("payment_status", filter.payment_status)
            .eq_opt("table_id", filter.table_id.as_ref())
            .order("created_at", Direction::Desc);
        fetch_all(backend.as_ref(), query).await
    }

    pub async fn update_status(&self, id: &RowId, status: OrderStatus) -> BackendResult<Order> {
        let backend = self.client.backend()?;
        let patch = StatusPatch {
            status,
            updated_at: self.client.clock().now(),
        };
        update_row(backend.as_ref(), ORDERS, id, &patch).await
    }

    /// Records a payment state change. `method` is only written when given.
    pub async fn update_payment(
        &self,
        id: &RowId,
        status: PaymentStatus,
        method: Option<PaymentMethod>,
    ) -> BackendResult<Order> {
        let backend = self.client.backend()?;
        let patch = PaymentPatch {
            payment_status: status,
            payment_method: method,
            updated_at: self.client.clock().now(),
        };
        update_row(backend.as_ref(), ORDERS, id, &patch).await
    }
}
