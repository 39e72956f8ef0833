//! # Shift Repository
//!
//! ## Clock-in / Clock-out
//! ```text
//!   clock_in(employee)  ── insert {employee_id, shift_date: today, start_time: now}
//!                                       │
//!                                       ▼   shift is open (end_time = null)
//!   clock_out(shift)    ── patch  {end_time: now}
//! ```
//!
//! Both read "now" from the client's [`Clock`](crate::client::Clock); the
//! business date is its UTC date.

use dinetab_core::{EmployeeShift, NewShift, RowId, ShiftFilter, ShiftUpdate};
use tracing::info;

use super::{delete_row, fetch_all, insert_row, update_row, EMPLOYEE_SHIFTS};
use crate::client::BackendClient;
use crate::error::BackendResult;
use crate::query::{Direction, Query};

pub(crate) const SHIFT_SELECT: &str = "*, employees(name, email, role)";

/// Repository for the `employee_shifts` collection.
pub struct ShiftRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> ShiftRepository<'a> {
    pub(crate) fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Shifts matching `filter`, latest date first, with the employee embedded.
    pub async fn list(&self, filter: &ShiftFilter) -> BackendResult<Vec<EmployeeShift>> {
        let backend = self.client.backend()?;
        let query = Query::select(EMPLOYEE_SHIFTS, SHIFT_SELECT)
            .eq_opt("employee_id", filter.employee_id.as_ref())
            .gte_opt("shift_date", filter.start_date)
            .lte_opt("shift_date", filter.end_date)
            .order("shift_date", Direction::Desc);
        fetch_all(backend.as_ref(), query).await
    }

    pub async fn create(&self, shift: &NewShift) -> BackendResult<EmployeeShift> {
        let backend = self.client.backend()?;
        insert_row(backend.as_ref(), EMPLOYEE_SHIFTS, shift).await
    }

    pub async fn update(&self, id: &RowId, patch: &ShiftUpdate) -> BackendResult<EmployeeShift> {
        let backend = self.client.backend()?;
        update_row(backend.as_ref(), EMPLOYEE_SHIFTS, id, patch).await
    }

    pub async fn delete(&self, id: &RowId) -> BackendResult<()> {
        let backend = self.client.backend()?;
        delete_row(backend.as_ref(), EMPLOYEE_SHIFTS, id).await
    }

    /// Opens a shift for `employee_id` starting now.
    pub async fn clock_in(&self, employee_id: &RowId) -> BackendResult<EmployeeShift> {
        let now = self.client.clock().now();
        let shift = NewShift {
            employee_id: employee_id.clone(),
            shift_date: now.date_naive(),
            start_time: now,
            end_time: None,
        };
        let shift = self.create(&shift).await?;
        info!(employee_id = %employee_id, shift_id = %shift.id, "Clocked in");
        Ok(shift)
    }

    /// Closes the shift `shift_id` now.
    pub async fn clock_out(&self, shift_id: &RowId) -> BackendResult<EmployeeShift> {
        let patch = ShiftUpdate {
            end_time: Some(self.client.clock().now()),
            ..Default::default()
        };
        let shift = self.update(shift_id, &patch).await?;
        info!(shift_id = %shift_id, "Clocked out");
        Ok(shift)
    }
}
