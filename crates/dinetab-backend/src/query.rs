//! # Query Model
//!
//! A backend request described as data, so repositories stay independent of
//! the transport and tests can assert exactly what would be sent.
//!
//! ## PostgREST Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Query::select("orders", "*, tables(table_number)")                    │
//! │      .eq("status", "pending")                                          │
//! │      .order("created_at", Direction::Desc)                             │
//! │                                                                         │
//! │  GET /rest/v1/orders?select=*,tables(table_number)                     │
//! │                     &status=eq.pending                                 │
//! │                     &order=created_at.desc                             │
//! │                                                                         │
//! │  insert → POST   body = payload                                        │
//! │  update → PATCH  body = patch, filters pick the rows                   │
//! │  delete → DELETE filters pick the rows                                 │
//! │  writes ask for the affected rows back (Prefer: return=representation) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use std::fmt;

/// What the request does to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Select,
    Insert,
    Update,
    Delete,
}

impl Method {
    pub fn is_write(&self) -> bool {
        !matches!(self, Method::Select)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Select => write!(f, "select"),
            Method::Insert => write!(f, "insert"),
            Method::Update => write!(f, "update"),
            Method::Delete => write!(f, "delete"),
        }
    }
}

/// Comparison operator of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    Lt,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gte => "gte",
            FilterOp::Lte => "lte",
            FilterOp::Lt => "lt",
        }
    }
}

/// `column <op> value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// One request against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub method: Method,
    /// Column list with embedded relations, e.g. `*, categories(slug)`.
    pub select: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    /// The caller expects exactly one row back.
    pub single: bool,
    pub body: Option<Value>,
}

impl Query {
    fn new(collection: &str, method: Method) -> Self {
        Query {
            collection: collection.to_string(),
            method,
            select: None,
            filters: Vec::new(),
            order: None,
            single: false,
            body: None,
        }
    }

    pub fn select(collection: &str, columns: &str) -> Self {
        let mut query = Self::new(collection, Method::Select);
        query.select = Some(columns.to_string());
        query
    }

    pub fn insert(collection: &str, body: Value) -> Self {
        let mut query = Self::new(collection, Method::Insert);
        query.body = Some(body);
        query
    }

    pub fn update(collection: &str, body: Value) -> Self {
        let mut query = Self::new(collection, Method::Update);
        query.body = Some(body);
        query
    }

    pub fn delete(collection: &str) -> Self {
        Self::new(collection, Method::Delete)
    }

    fn filter(mut self, column: &str, op: FilterOp, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    /// Adds `column = value` only when `value` is set.
    pub fn eq_opt<T: ToString>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(column, v),
            None => self,
        }
    }

    pub fn gte_opt<T: ToString>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.gte(column, v),
            None => self,
        }
    }

    pub fn lte_opt<T: ToString>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.lte(column, v),
            None => self,
        }
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    /// Value of the first filter on `column`, for assertions and logs.
    pub fn filter_value(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    /// PostgREST query string pairs, in request order.
    ///
    /// Whitespace in the select list is dropped, as the backend expects.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);

        if let Some(ref columns) = self.select {
            let compact: String = columns.chars().filter(|c| !c.is_whitespace()).collect();
            pairs.push(("select".to_string(), compact));
        }
        for filter in &self.filters {
            pairs.push((
                filter.column.clone(),
                format!("{}.{}", filter.op.as_str(), filter.value),
            ));
        }
        if let Some(ref order) = self.order {
            let dir = match order.direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            pairs.push(("order".to_string(), format!("{}.{}", order.column, dir)));
        }
        pairs
    }
}
