//! The data source contract a hosting query engine drives.
//!
//! A host instantiates one [`DataSource`] per request and calls it in a
//! fixed sequence: read the declarations ([`info`](DataSource::info),
//! [`arguments`](DataSource::arguments), [`columns`](DataSource::columns)),
//! hand over the collected argument values
//! ([`on_arguments_processed`](DataSource::on_arguments_processed)), then
//! pull result pages ([`next_page`](DataSource::next_page)) until a page
//! reports no successor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{ArgumentInfo, ArgumentValues, ColumnInfo, Page};

/// Catalog metadata for a data source.
///
/// # Examples
///
/// ```
/// use rowsource::SourceInfo;
///
/// let info = SourceInfo::new("Job configuration notes")
///     .with_description("One row per job node.");
/// assert_eq!(info.name, "Job configuration notes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// Display name shown in the host's source catalog.
    pub name: String,

    /// Optional human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SourceInfo {
    /// Creates catalog metadata with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A per-request data source driven by a hosting query engine.
///
/// Declarations are synchronous and may be read at any time; the two
/// lifecycle methods are async and ordered:
/// `on_arguments_processed` first, then `next_page` until the returned
/// [`Page::has_next_page`] is `false`.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so hosts can move requests
/// across worker threads. The lifecycle methods take `&mut self`: one
/// source instance serves one request at a time and carries no state
/// into the next request.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Returns catalog metadata for this source.
    fn info(&self) -> SourceInfo;

    /// Declares the input arguments this source accepts.
    ///
    /// The default declares no arguments; sources without inputs need
    /// not override this.
    fn arguments(&self) -> Vec<ArgumentInfo> {
        Vec::new()
    }

    /// Declares the fixed column schema of the result table.
    fn columns(&self) -> Vec<ColumnInfo>;

    /// Receives the argument values the host collected.
    ///
    /// Called once per request before any page is pulled. Calling it
    /// again restarts the request with the new values.
    ///
    /// # Errors
    ///
    /// Implementations may reject values they cannot work with, though
    /// sources that degrade silently (like
    /// [`JobNotesSource`](crate::jobs::JobNotesSource)) always succeed.
    async fn on_arguments_processed(&mut self, values: &ArgumentValues) -> Result<()>;

    /// Produces the next page of result rows.
    ///
    /// # Errors
    ///
    /// - [`Error::NotReady`](crate::Error::NotReady) if called before
    ///   [`on_arguments_processed`](DataSource::on_arguments_processed).
    async fn next_page(&mut self) -> Result<Page>;
}
