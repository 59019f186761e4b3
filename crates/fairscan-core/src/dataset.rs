//! Dataset model shared across fairscan components
//!
//! A [`Dataset`] is an immutable named set of columns for the duration of an
//! analysis run. The core never mutates it; callers own the data. All
//! text-heavy operations read a bounded sample of each column rather than the
//! full value sequence, which is the system's only scalability control.

use serde::{Deserialize, Serialize};

/// Maximum non-null values sampled from a column before any text work
pub const SAMPLE_ROWS_CAP: usize = 1000;

/// Maximum sampled values concatenated for pattern scanning
pub const CONCAT_CAP: usize = 100;

/// Maximum sampled values handed to the learned classifier
pub const CLASSIFY_CAP: usize = 50;

/// A single cell value; columns are heterogeneously typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Whether this value is missing
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render the value as text for detector input
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// A named column of values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Cell values, one per row
    pub values: Vec<Value>,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of rows in this column
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing values
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// First `cap` non-null values rendered as text, in row order
    ///
    /// `cap` is clamped to [`SAMPLE_ROWS_CAP`] so no caller ever walks more
    /// than the sampling stage allows.
    pub fn sample_text(&self, cap: usize) -> Vec<String> {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .take(cap.min(SAMPLE_ROWS_CAP))
            .map(Value::render)
            .collect()
    }
}

/// An immutable named set of columns under analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset name (source file name or logical table name)
    pub name: String,

    /// Columns in declaration order
    pub columns: Vec<Column>,
}

impl Dataset {
    /// Create a new dataset
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (longest column)
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Column::len).max().unwrap_or(0)
    }

    /// Whether the dataset has no columns or no rows
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.row_count() == 0
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Restrict the dataset to the named columns, preserving their order
    /// in `names`. Missing names are skipped, not errored.
    pub fn select(&self, names: &[String]) -> Dataset {
        let columns = names
            .iter()
            .filter_map(|n| self.column(n).cloned())
            .collect();
        Dataset::new(self.name.clone(), columns)
    }
}
