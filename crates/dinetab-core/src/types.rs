//! # Domain Types
//!
//! Row shapes of the backend collections, the partial payloads written to
//! them, and the filters used to read them.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiningTable    │◄──│     Order       │   │  EmployeeShift  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  table_number   │   │  items[]        │   │  employee_id ───┼──► Employee
//! │  │  language       │   │  status         │   │  shift_date     │       │
//! │  │  active         │   │  payment_status │   │  start/end_time │       │
//! │  └─────────────────┘   │  total_amount   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │◄──│    MenuItem     │   │ DailyAnalytics  │       │
//! │  │  slug, order    │   │  price, avail.  │   │  read-only      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reads vs Writes
//! Row types carry every column the pages use. Writes go through separate
//! `New*` / `*Update` payloads whose `None` fields are left out of the JSON,
//! so an update only touches the columns it names.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::i18n::Language;
use crate::money::Money;

// =============================================================================
// Row Identifier
// =============================================================================

/// Primary or foreign key of a row.
///
/// Collections use either UUIDs or integer keys; both are carried as text
/// and compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        RowId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        RowId(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        RowId(id)
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        RowId(id.to_string())
    }
}

impl Serialize for RowId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct RowIdVisitor;

impl<'de> Visitor<'de> for RowIdVisitor {
    type Value = RowId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a row id as a string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RowId, E> {
        Ok(RowId(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RowId, E> {
        Ok(RowId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RowId, E> {
        Ok(RowId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RowId, E> {
        Ok(RowId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for RowId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RowIdVisitor)
    }
}

// =============================================================================
// Timestamps
// =============================================================================

/// Timestamp decoding that also accepts `timestamp without time zone`
/// columns, which the backend renders without an offset.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    use crate::format::parse_timestamp;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse_timestamp(&raw)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_quantity() -> u32 {
    1
}

// =============================================================================
// Status Enums
// =============================================================================

macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in lifecycle order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Value as stored in the backend column.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(CoreError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Kitchen/service progress of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed by the customer, not yet picked up by the kitchen.
    #[default]
    Pending,
    Preparing,
    /// Waiting at the pass.
    Ready,
    Served,
    /// Closed out, counted in analytics.
    Completed,
    Cancelled,
}

wire_enum!(OrderStatus, "order status", {
    Pending => "pending",
    Preparing => "preparing",
    Ready => "ready",
    Served => "served",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl OrderStatus {
    /// Whether the order still needs attention from staff.
    pub const fn is_open(&self) -> bool {
        !matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

/// Settlement state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    /// Customer asked for the bill or an online payment is in flight.
    Pending,
    Paid,
    Refunded,
}

wire_enum!(PaymentStatus, "payment status", {
    Unpaid => "unpaid",
    Pending => "pending",
    Paid => "paid",
    Refunded => "refunded",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
}

wire_enum!(PaymentMethod, "payment method", {
    Cash => "cash",
    Card => "card",
    Online => "online",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Admin,
    Manager,
    #[default]
    Staff,
    Waiter,
    Chef,
    Cashier,
}

wire_enum!(EmployeeRole, "employee role", {
    Admin => "admin",
    Manager => "manager",
    Staff => "staff",
    Waiter => "waiter",
    Chef => "chef",
    Cashier => "cashier",
});

// =============================================================================
// Dining Table
// =============================================================================

/// A physical table customers order from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiningTable {
    pub id: RowId,

    /// Number printed on the table card.
    pub table_number: i32,

    /// Language the table's QR code opens the menu in.
    #[serde(default)]
    pub language: Language,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewTable {
    pub table_number: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

// =============================================================================
// Category
// =============================================================================

/// A menu section (starters, tagines, drinks...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub id: RowId,
    pub slug: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub active: bool,

    /// Remaining columns, e.g. per-language display names.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// Display name for `lang`, read from a `name_{code}` column when the
    /// collection has one, else a plain `name` column, else the slug.
    pub fn display_name(&self, lang: Language) -> &str {
        let localized = format!("name_{}", lang.code());
        self.extra
            .get(&localized)
            .or_else(|| self.extra.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(self.slug.as_str())
    }
}

/// The slice of a category embedded in menu item reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryRef {
    pub slug: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCategory {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Menu Item
// =============================================================================

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    pub id: RowId,
    pub name: String,
    pub category_id: Option<RowId>,

    /// Language the row is written in, when the menu is stored per language.
    #[serde(default)]
    pub language: Option<Language>,

    #[serde(default = "default_true")]
    pub available: bool,

    /// Unit price.
    pub price: Money,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    /// Embedded parent category, present on menu reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryRef>,

    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

impl MenuItem {
    /// Sort key the menu page groups by: category order, then name.
    pub fn menu_position(&self) -> (i32, &str) {
        let order = self
            .categories
            .as_ref()
            .map(|c| c.display_order)
            .unwrap_or(i32::MAX);
        (order, self.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMenuItem {
    pub name: String,
    pub category_id: RowId,
    pub price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Order
// =============================================================================

/// One line of an order, snapshotting the menu item at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    #[serde(default, alias = "id")]
    pub menu_item_id: Option<RowId>,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Unit price at order time.
    pub price: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

/// The slice of a table embedded in order reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TableRef {
    pub table_number: i32,
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: RowId,
    pub table_id: Option<RowId>,

    #[serde(default)]
    pub items: Vec<OrderLine>,

    #[serde(default)]
    pub status: OrderStatus,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,

    /// Amount due, as stored by the backend.
    #[serde(default, alias = "total")]
    pub total_amount: Money,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(deserialize_with = "timestamp::deserialize")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Embedded table, present on order list reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<TableRef>,
}

impl Order {
    /// Sum of the line totals. May differ from `total_amount` when the
    /// backend applied service charges or discounts.
    pub fn items_subtotal(&self) -> Money {
        self.items.iter().map(OrderLine::line_total).sum()
    }

    /// Table number from the embedded table, if the read joined it.
    pub fn table_number(&self) -> Option<i32> {
        self.tables.as_ref().map(|t| t.table_number)
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// Payload for placing an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewOrder {
    pub table_id: RowId,
    pub items: Vec<OrderLine>,
    pub total_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewOrder {
    /// Order for `table_id` with its total computed from the lines.
    pub fn from_lines(table_id: impl Into<RowId>, items: Vec<OrderLine>) -> Self {
        let total_amount = items.iter().map(OrderLine::line_total).sum();
        NewOrder {
            table_id: table_id.into(),
            items,
            total_amount,
            status: None,
            payment_status: None,
            payment_method: None,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Optional equality filters for order lists. Unset fields don't filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub table_id: Option<RowId>,
}

impl OrderFilter {
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn table(mut self, table_id: impl Into<RowId>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }
}

// =============================================================================
// Employee
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Employee {
    pub id: RowId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: EmployeeRole,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The slice of an employee embedded in shift reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeSummary {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: EmployeeRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewEmployee {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<EmployeeRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<EmployeeRole>,
}

// =============================================================================
// Employee Shift
// =============================================================================

/// A worked shift. Open while `end_time` is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeShift {
    pub id: RowId,
    pub employee_id: RowId,

    #[ts(as = "String")]
    pub shift_date: NaiveDate,

    #[serde(deserialize_with = "timestamp::deserialize")]
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,

    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,

    /// Embedded employee, present on shift list reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<EmployeeSummary>,
}

impl EmployeeShift {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Worked time, once clocked out.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewShift {
    pub employee_id: RowId,
    #[ts(as = "String")]
    pub shift_date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub shift_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Shift list filter. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShiftFilter {
    pub employee_id: Option<RowId>,
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

impl ShiftFilter {
    pub fn employee(mut self, employee_id: impl Into<RowId>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }
}

// =============================================================================
// Analytics
// =============================================================================

/// Per-day aggregate maintained by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyAnalytics {
    #[ts(as = "String")]
    pub business_date: NaiveDate,
    #[serde(default)]
    pub total_orders: i64,
    #[serde(default)]
    pub total_revenue: Money,
    #[serde(default)]
    pub average_order_value: Money,

    /// Any further metrics the aggregate carries.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

/// Date range for the analytics history. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalyticsFilter {
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

/// Which read of a date report failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ReportPart {
    Aggregate,
    Shifts,
    Orders,
}

/// A sub-read of a date report that failed and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PartialFailure {
    pub part: ReportPart,
    pub message: String,
}

/// Everything the day view shows for one business date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateAnalytics {
    /// The day's aggregate, `None` if there is none (or it failed).
    pub analytics: Option<DailyAnalytics>,
    /// Shifts on that date, earliest start first.
    pub shifts: Vec<EmployeeShift>,
    /// Orders created that day, oldest first.
    pub orders: Vec<Order>,
    /// Sub-reads that failed. Empty on a clean read.
    #[serde(default)]
    pub errors: Vec<PartialFailure>,
}

impl DateAnalytics {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Revenue of the listed orders, for days the aggregate hasn't caught up.
    pub fn orders_revenue(&self) -> Money {
        self.orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total_amount)
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_row_id_accepts_text_and_integers() {
        let id: RowId = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(id.as_str(), "42");
        let id: RowId = serde_json::from_value(json!("3f1c")).unwrap();
        assert_eq!(id, RowId::from("3f1c"));
        assert_eq!(serde_json::to_value(RowId::from(7)).unwrap(), json!("7"));
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(OrderStatus::Preparing.to_string(), "preparing");
        assert_eq!("served".parse::<OrderStatus>().unwrap(), OrderStatus::Served);
        assert!(matches!(
            "lost".parse::<OrderStatus>(),
            Err(CoreError::UnknownVariant { kind: "order status", .. })
        ));
        assert_eq!(PaymentMethod::ALL.len(), 3);
        assert!(!OrderStatus::Cancelled.is_open());
        assert_eq!(
            serde_json::to_value(PaymentStatus::Refunded).unwrap(),
            json!("refunded")
        );
    }

    #[test]
    fn test_order_decodes_with_join() {
        let order: Order = serde_json::from_value(json!({
            "id": "o-1",
            "table_id": "t-4",
            "items": [
                {"menu_item_id": "m-1", "name": "Harira", "quantity": 2, "price": 25},
                {"id": "m-2", "name": "Mint tea", "price": 12.5}
            ],
            "status": "preparing",
            "payment_status": "unpaid",
            "payment_method": null,
            "total_amount": 62.5,
            "created_at": "2026-10-19T12:05:00.123456+00:00",
            "updated_at": null,
            "tables": {"table_number": 4},
            "customer_lang": "ar"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.items[1].menu_item_id, Some(RowId::from("m-2")));
        assert_eq!(order.items[1].quantity, 1);
        assert_eq!(order.items_subtotal(), Money::from_minor(6250));
        assert_eq!(order.total_amount, Money::from_minor(6250));
        assert_eq!(order.table_number(), Some(4));
        assert!(!order.is_paid());
    }

    #[test]
    fn test_timestamp_without_offset() {
        let shift: EmployeeShift = serde_json::from_value(json!({
            "id": 9,
            "employee_id": 2,
            "shift_date": "2026-10-19",
            "start_time": "2026-10-19T08:00:00",
            "end_time": "2026-10-19T16:30:00"
        }))
        .unwrap();

        assert_eq!(
            shift.start_time,
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
        );
        assert!(!shift.is_open());
        assert_eq!(shift.duration(), Some(chrono::Duration::minutes(510)));
    }

    #[test]
    fn test_updates_skip_unset_fields() {
        let patch = TableUpdate {
            active: Some(false),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"active": false}));

        let patch = MenuItemUpdate {
            price: Some(Money::from_minor(1850)),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"price": 18.5}));
    }

    #[test]
    fn test_new_order_total_from_lines() {
        let lines = vec![
            OrderLine {
                menu_item_id: Some("m-1".into()),
                name: "Couscous".to_string(),
                quantity: 2,
                price: Money::from_minor(7000),
                notes: None,
            },
            OrderLine {
                menu_item_id: Some("m-9".into()),
                name: "Orange juice".to_string(),
                quantity: 1,
                price: Money::from_minor(1500),
                notes: Some("no ice".to_string()),
            },
        ];
        let order = NewOrder::from_lines("t-2", lines).with_notes("birthday");
        let body = serde_json::to_value(&order).unwrap();

        assert_eq!(body["total_amount"], json!(155));
        assert_eq!(body["table_id"], json!("t-2"));
        assert_eq!(body["notes"], json!("birthday"));
        assert!(body.get("status").is_none());
    }

    #[test]
    fn test_category_keeps_extra_columns() {
        let category: Category = serde_json::from_value(json!({
            "id": 1,
            "slug": "tagines",
            "display_order": 2,
            "active": true,
            "name_fr": "Tajines",
            "name_ar": "طواجن"
        }))
        .unwrap();

        assert_eq!(category.display_name(Language::Ar), "طواجن");
        assert_eq!(category.display_name(Language::Fr), "Tajines");
        assert_eq!(category.display_name(Language::En), "tagines");
    }

    #[test]
    fn test_menu_item_position() {
        let item: MenuItem = serde_json::from_value(json!({
            "id": "m-1",
            "name": "Pastilla",
            "category_id": "c-1",
            "available": true,
            "price": "45.00",
            "categories": {"slug": "starters", "display_order": 1}
        }))
        .unwrap();

        assert_eq!(item.menu_position(), (1, "Pastilla"));
        assert_eq!(item.price, Money::from_minor(4500));
    }

    #[test]
    fn test_date_analytics_revenue_skips_cancelled() {
        let order = |status: &str, total: f64| -> Order {
            serde_json::from_value(json!({
                "id": "o",
                "table_id": null,
                "status": status,
                "total_amount": total,
                "created_at": "2026-10-19T10:00:00Z"
            }))
            .unwrap()
        };
        let report = DateAnalytics {
            orders: vec![order("completed", 100.0), order("cancelled", 40.0)],
            ..Default::default()
        };

        assert_eq!(report.orders_revenue(), Money::from_major(100));
        assert!(report.is_complete());
    }
}
