//! Job domain: schema configuration, the job aggregate, and the
//! resolve-then-project pipeline.
//!
//! A [`Job`] is the request-scoped view of one store [`Instance`]: its
//! node sub-records with their configuration payloads, and nothing else.
//! [`JobSchema`] names the store identifiers the pipeline needs (which
//! definition holds jobs, which field carries the caller-facing job id,
//! which sub-record field carries the payload).
//!
//! - [`resolver`] - job lookup with silent degradation
//! - [`projector`] - node-to-row projection
//! - [`source`] - the host-facing data source over both

pub mod projector;
pub mod resolver;
pub mod source;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{DefinitionId, Instance, InstanceId};

pub use projector::{extract_note, project, project_node, NOTES_FIELD};
pub use resolver::JobResolver;
pub use source::{JobNotesSource, JOB_ID_ARGUMENT, NODE_ID_COLUMN, NOTES_COLUMN};

/// Default name of the sub-record field holding the configuration
/// payload.
pub const DEFAULT_CONFIG_FIELD: &str = "configuration_parameters";

/// Store identifiers the job pipeline is configured with.
///
/// Loadable from TOML, so deployments can point the same binary at
/// different store schemas:
///
/// ```toml
/// job_definition = "8b0161f4-8f2a-4d4f-a483-9de35d8f037c"
/// job_id_field = "job_id"
/// config_field = "configuration_parameters"
/// ```
///
/// # Examples
///
/// ```
/// use rowsource::jobs::JobSchema;
/// use rowsource::store::DefinitionId;
///
/// let schema = JobSchema::new(DefinitionId::new(), "job_id");
/// assert_eq!(schema.job_id_field, "job_id");
/// assert_eq!(schema.config_field, "configuration_parameters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSchema {
    /// Definition holding job instances.
    pub job_definition: DefinitionId,

    /// Instance field carrying the caller-facing job identifier.
    pub job_id_field: String,

    /// Sub-record field carrying the configuration payload string.
    #[serde(default = "default_config_field")]
    pub config_field: String,
}

fn default_config_field() -> String {
    DEFAULT_CONFIG_FIELD.to_string()
}

impl JobSchema {
    /// Creates a schema with the default configuration field name.
    pub fn new(job_definition: DefinitionId, job_id_field: impl Into<String>) -> Self {
        Self {
            job_definition,
            job_id_field: job_id_field.into(),
            config_field: default_config_field(),
        }
    }

    /// Sets the sub-record field holding the configuration payload.
    pub fn with_config_field(mut self, config_field: impl Into<String>) -> Self {
        self.config_field = config_field.into();
        self
    }

    /// Loads a schema from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the document does not parse or a
    /// required key is missing.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        toml::from_str(document).map_err(|err| Error::Config {
            message: err.to_string(),
        })
    }
}

/// Identifier of a node within a job, in its string form.
///
/// This is the value downstream queries join on.
///
/// # Examples
///
/// ```
/// use rowsource::jobs::NodeId;
///
/// let id = NodeId::new("N1");
/// assert_eq!(id.as_str(), "N1");
/// assert_eq!(id.to_string(), "N1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One node of a resolved job.
///
/// The configuration payload is carried verbatim; it is expected to be
/// a JSON object but nothing validates that until projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// The node's identifier, used as the row key.
    pub id: NodeId,

    /// Raw configuration payload. Empty when the store record had no
    /// readable payload field.
    pub configuration: String,
}

impl Node {
    /// Creates a node.
    pub fn new(id: impl Into<NodeId>, configuration: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            configuration: configuration.into(),
        }
    }
}

/// A resolved job: the ordered nodes of exactly one store instance.
///
/// Immutable once built; constructed at most once per request and
/// dropped when the request's rows have been emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    instance_id: InstanceId,
    nodes: Vec<Node>,
}

impl Job {
    /// Builds the aggregate from a store instance.
    ///
    /// Node order follows the instance's sub-record order. A sub-record
    /// without a readable payload field yields a node with an empty
    /// configuration; that degrades the note later, never the node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordMismatch`] when the instance was created
    /// from a different definition than the schema expects.
    pub fn from_instance(instance: &Instance, schema: &JobSchema) -> Result<Self> {
        if instance.definition != schema.job_definition {
            return Err(Error::RecordMismatch {
                expected: schema.job_definition,
                actual: instance.definition,
            });
        }

        let nodes = instance
            .sub_records
            .iter()
            .map(|sub| Node {
                id: NodeId::new(sub.id.clone()),
                configuration: sub.field_str(&schema.config_field).unwrap_or_default().to_string(),
            })
            .collect();

        Ok(Self {
            instance_id: instance.id,
            nodes,
        })
    }

    /// The job's nodes, in store order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The backing store record id. Crate-internal; the record id is
    /// not part of the public contract.
    pub(crate) fn instance_id(&self) -> InstanceId {
        self.instance_id
    }
}
