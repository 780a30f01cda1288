use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::error::{StoreError, StoreResult};

/// Format used for every `created_at` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Owned SQL value exchanged with a [`Database`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Text(value.format(DATE_FORMAT).to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Named parameter bindings for a statement.
///
/// Names carry their SQL prefix (`:title`), and values are always bound by the
/// driver, never spliced into the statement text.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    values: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named value, replacing an earlier binding with the same name
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// One result row, keyed by column name
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    columns: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.columns.insert(name.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> StoreResult<&Value> {
        self.columns
            .get(column)
            .ok_or_else(|| StoreError::MissingColumn(column.to_string()))
    }

    pub fn get_i64(&self, column: &str) -> StoreResult<i64> {
        match self.get(column)? {
            Value::Integer(i) => Ok(*i),
            // MySQL-style drivers hand identifiers back as text
            Value::Text(s) => s.parse().map_err(|_| StoreError::ColumnType {
                column: column.to_string(),
                expected: "integer",
                found: "text",
            }),
            other => Err(StoreError::ColumnType {
                column: column.to_string(),
                expected: "integer",
                found: other.kind(),
            }),
        }
    }

    pub fn get_text(&self, column: &str) -> StoreResult<String> {
        match self.get(column)? {
            Value::Text(s) => Ok(s.clone()),
            other => Err(StoreError::ColumnType {
                column: column.to_string(),
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    /// Reads a `YYYY-MM-DD` column. A trailing time part is ignored.
    pub fn get_date(&self, column: &str) -> StoreResult<NaiveDate> {
        let raw = self.get_text(column)?;
        let date_part = raw.get(..10).unwrap_or(raw.as_str());
        NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|_| StoreError::InvalidDate {
            column: column.to_string(),
            value: raw.clone(),
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

/// Parameterized query executor the repositories are written against.
///
/// Every call is one blocking round-trip to the store. Implementations do not
/// retry and do not translate failures beyond wrapping them in [`StoreError`].
pub trait Database: Send + Sync {
    /// Runs a read statement and returns every row in store order
    fn select(&self, sql: &str, params: &Params) -> StoreResult<Vec<Record>>;

    /// Runs a write statement; `true` when at least one row was affected
    fn exec(&self, sql: &str, params: &Params) -> StoreResult<bool>;

    /// Identifier assigned by the most recent insert on this connection
    fn last_insert_id(&self) -> StoreResult<i64>;
}
