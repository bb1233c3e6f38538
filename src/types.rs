//! Host-facing contract types for data source declarations and results.
//!
//! These are the types a hosting query engine exchanges with a
//! [`DataSource`](crate::source::DataSource): argument and column
//! declarations going out, argument values coming in, and pages of rows
//! going back.
//!
//! # Serialization
//!
//! All structs use `#[serde(rename_all = "camelCase")]` for their wire
//! form. Optional fields are omitted when `None`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The value kind of a declared input argument.
///
/// Only string arguments exist today; the enum is non-exhaustive so hosts
/// match with a fallback arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ArgumentKind {
    /// A free-form string value.
    String,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
        }
    }
}

/// The value kind of a declared output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ColumnKind {
    /// A string-valued column.
    String,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
        }
    }
}

/// Declaration of one input argument a data source accepts.
///
/// # Examples
///
/// ```
/// use rowsource::ArgumentInfo;
///
/// let arg = ArgumentInfo::string("Job ID").with_required(false);
/// assert_eq!(arg.name, "Job ID");
/// assert!(!arg.required);
///
/// let json = serde_json::to_value(&arg).unwrap();
/// assert_eq!(json["kind"], "string");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentInfo {
    /// Argument name shown to and keyed by the host.
    pub name: String,

    /// Value kind the host should collect.
    pub kind: ArgumentKind,

    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the host must supply a value. Defaults to `false`.
    #[serde(default)]
    pub required: bool,
}

impl ArgumentInfo {
    /// Declares an optional string argument with the given name.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ArgumentKind::String,
            description: None,
            required: false,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets whether the argument is required.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Argument values supplied by the host for one request.
///
/// An ordered name-to-value map. Lookups that expect a string answer
/// `None` both when the name is absent and when the value has a
/// different JSON type, so callers have a single "not usable" path.
///
/// # Examples
///
/// ```
/// use rowsource::ArgumentValues;
///
/// let values = ArgumentValues::new()
///     .with_value("Job ID", "JOB-42")
///     .with_value("limit", 10);
///
/// assert_eq!(values.get_str("Job ID"), Some("JOB-42"));
/// assert_eq!(values.get_str("limit"), None); // present but not a string
/// assert_eq!(values.get_str("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentValues(Map<String, Value>);

impl ArgumentValues {
    /// Creates an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, replacing any previous value under the same name.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the raw value for `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the string value for `name`.
    ///
    /// Answers `None` when the name is absent or the value is not a
    /// JSON string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns the number of supplied values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no values were supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Declaration of one output column in a data source's result schema.
///
/// # Examples
///
/// ```
/// use rowsource::ColumnInfo;
///
/// let col = ColumnInfo::string("Notes")
///     .with_description("Free text note, possibly empty.");
/// assert_eq!(col.name, "Notes");
/// assert!(col.description.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Column name shown by the host.
    pub name: String,

    /// Value kind of the column's cells.
    pub kind: ColumnKind,

    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ColumnInfo {
    /// Declares a string column with the given name.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::String,
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A single result cell: the value plus an optional display override.
///
/// # Examples
///
/// ```
/// use rowsource::Cell;
///
/// let cell = Cell::new("JOB-42").with_display_value("Job 42");
/// assert_eq!(cell.value, "JOB-42");
/// assert_eq!(cell.display(), "Job 42");
///
/// let plain = Cell::new("N1");
/// assert_eq!(plain.display(), "N1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// The cell's value in its canonical string form.
    pub value: String,

    /// Optional human-facing rendering. When `None`, hosts display
    /// [`value`](Cell::value) as-is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl Cell {
    /// Creates a cell with no display override.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_value: None,
        }
    }

    /// Sets the display override.
    pub fn with_display_value(mut self, display_value: impl Into<String>) -> Self {
        self.display_value = Some(display_value.into());
        self
    }

    /// Returns the string a host should render for this cell.
    pub fn display(&self) -> &str {
        self.display_value.as_deref().unwrap_or(&self.value)
    }
}

/// One result row. Cells are positional and follow the declared column
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    /// The row's cells, one per declared column.
    pub cells: Vec<Cell>,
}

impl Row {
    /// Creates a row from its cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// A page of result rows.
///
/// # Examples
///
/// ```
/// use rowsource::{Cell, Page, Row};
///
/// let page = Page::last(vec![Row::new(vec![Cell::new("N1")])]);
/// assert_eq!(page.rows.len(), 1);
/// assert!(!page.has_next_page);
///
/// let json = serde_json::to_value(&page).unwrap();
/// assert_eq!(json["hasNextPage"], false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The rows in this page.
    pub rows: Vec<Row>,

    /// Whether more pages follow. Hosts stop pulling when `false`.
    pub has_next_page: bool,
}

impl Page {
    /// Creates a final page carrying the given rows.
    pub fn last(rows: Vec<Row>) -> Self {
        Self {
            rows,
            has_next_page: false,
        }
    }

    /// Creates an empty final page.
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }
}
