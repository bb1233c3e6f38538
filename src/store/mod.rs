//! Instance store port and the filter model used to query it.
//!
//! The [`InstanceStore`] trait is the seam between the job domain and
//! whatever system actually holds the records. Implementations answer
//! conjunctive equality filters ([`Filter`]) over typed records
//! ([`Instance`]) and know nothing about jobs, nodes, or notes; that
//! domain logic lives in [`jobs`](crate::jobs).
//!
//! # Thread Safety
//!
//! Store implementations must be `Send + Sync`; one store is typically
//! shared across many concurrent requests behind an `Arc`.

pub mod memory;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ---- Record identifiers ----

/// Store-assigned identifier of one [`Instance`].
///
/// # Examples
///
/// ```
/// use rowsource::store::InstanceId;
///
/// let id = InstanceId::new();
/// assert_ne!(id, InstanceId::new());
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for InstanceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identifier of a record type (definition) in the store.
///
/// Every [`Instance`] carries the definition it was created from;
/// filters use it to keep queries from matching records of other types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(Uuid);

impl DefinitionId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for DefinitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DefinitionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ---- Records ----

/// A child record nested inside an [`Instance`].
///
/// Sub-records keep their insertion order; that order is meaningful to
/// consumers (it becomes row order downstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubRecord {
    /// Identifier of this sub-record, opaque to the store.
    pub id: String,

    /// Named scalar fields, in insertion order.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl SubRecord {
    /// Creates a sub-record with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Adds a field, replacing any previous value under the same name.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the raw value of `name`, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the string value of `name`; `None` when absent or not a
    /// JSON string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// One typed record held by the store.
///
/// # Examples
///
/// ```
/// use rowsource::store::{DefinitionId, Instance, SubRecord};
///
/// let definition = DefinitionId::new();
/// let instance = Instance::new(definition)
///     .with_field("job_id", "JOB-42")
///     .with_sub_record(SubRecord::new("N1"));
///
/// assert_eq!(instance.definition, definition);
/// assert_eq!(instance.field_str("job_id"), Some("JOB-42"));
/// assert_eq!(instance.sub_records.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Store-assigned record identifier.
    pub id: InstanceId,

    /// The record type this instance was created from.
    pub definition: DefinitionId,

    /// Named scalar fields, in insertion order.
    #[serde(default)]
    pub fields: Map<String, Value>,

    /// Child records, in insertion order.
    #[serde(default)]
    pub sub_records: Vec<SubRecord>,
}

impl Instance {
    /// Creates an empty instance of the given definition with a fresh id.
    pub fn new(definition: DefinitionId) -> Self {
        Self {
            id: InstanceId::new(),
            definition,
            fields: Map::new(),
            sub_records: Vec::new(),
        }
    }

    /// Adds a field, replacing any previous value under the same name.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Appends a sub-record.
    pub fn with_sub_record(mut self, sub_record: SubRecord) -> Self {
        self.sub_records.push(sub_record);
        self
    }

    /// Returns the raw value of `name`, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the string value of `name`; `None` when absent or not a
    /// JSON string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

// ---- Filters ----

/// Comparison operator for a field condition.
///
/// Only exact equality exists today; the enum is non-exhaustive so
/// store implementations match with a fallback arm and report
/// [`StoreError::Unsupported`] for operators they cannot evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Operator {
    /// Exact, case-sensitive equality.
    Equals,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals => write!(f, "equals"),
        }
    }
}

/// A single predicate over one [`Instance`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    /// The instance's definition must equal the given identifier.
    Definition(DefinitionId),

    /// A named field must satisfy `op` against `value`.
    ///
    /// An absent field never matches, not even against `null`.
    Field {
        /// The field name to test.
        name: String,
        /// The comparison to apply.
        op: Operator,
        /// The value to compare against.
        value: Value,
    },
}

impl Condition {
    /// Evaluates this condition against an instance.
    pub fn matches(&self, instance: &Instance) -> bool {
        match self {
            Self::Definition(definition) => instance.definition == *definition,
            Self::Field { name, op, value } => match op {
                Operator::Equals => instance.field(name) == Some(value),
            },
        }
    }
}

/// A conjunction of [`Condition`]s.
///
/// An instance matches when every condition holds; the empty filter
/// matches every instance.
///
/// # Examples
///
/// ```
/// use rowsource::store::{DefinitionId, Filter, Instance};
///
/// let definition = DefinitionId::new();
/// let filter = Filter::new()
///     .definition(definition)
///     .field_equals("job_id", "JOB-42");
///
/// let hit = Instance::new(definition).with_field("job_id", "JOB-42");
/// let miss = Instance::new(definition).with_field("job_id", "JOB-7");
/// assert!(filter.matches(&hit));
/// assert!(!filter.matches(&miss));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Creates an empty filter (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition condition.
    pub fn definition(mut self, definition: DefinitionId) -> Self {
        self.conditions.push(Condition::Definition(definition));
        self
    }

    /// Adds an exact-equality condition on a named field.
    pub fn field_equals(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Field {
            name: name.into(),
            op: Operator::Equals,
            value: value.into(),
        });
        self
    }

    /// Returns the conditions in the order they were added.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluates the conjunction against an instance.
    pub fn matches(&self, instance: &Instance) -> bool {
        self.conditions.iter().all(|c| c.matches(instance))
    }
}

// ---- Errors ----

/// Errors raised by store implementations.
///
/// These never reach data source callers: the resolver absorbs them and
/// degrades to an empty result. They exist so store faults stay
/// inspectable at the seam.
///
/// # Examples
///
/// ```
/// use rowsource::store::StoreError;
///
/// let err = StoreError::Backend {
///     message: "connection timeout".to_string(),
///     source: None,
/// };
/// assert_eq!(err.to_string(), "backend error: connection timeout");
/// ```
#[derive(Debug)]
pub enum StoreError {
    /// An I/O or backend-specific failure (network fault, timeout,
    /// malformed response).
    Backend {
        /// Human-readable description of the failure.
        message: String,
        /// The underlying error, if available. Accessible via
        /// [`std::error::Error::source()`].
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store cannot evaluate the given filter (for example an
    /// operator it does not implement).
    Unsupported {
        /// What the store could not evaluate.
        message: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { message, .. } => write!(f, "backend error: {message}"),
            Self::Unsupported { message } => write!(f, "unsupported filter: {message}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Backend {
                source: Some(src), ..
            } => Some(src.as_ref()),
            _ => None,
        }
    }
}

// ---- Store port ----

/// Read access to an external instance store.
///
/// Implementations evaluate a [`Filter`] and return every matching
/// instance. The result order is implementation-defined; callers that
/// care about cardinality (such as a unique-key lookup) inspect the
/// returned length rather than assuming one hit.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single store is shared
/// across requests behind `Arc<dyn InstanceStore>`.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Returns all instances matching `filter`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Backend`] on I/O or backend-specific failures.
    /// - [`StoreError::Unsupported`] when the filter uses a capability
    ///   the store does not implement.
    async fn find(&self, filter: &Filter) -> Result<Vec<Instance>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ---- Identifier tests ----

    #[test]
    fn instance_id_display_parses_back() {
        let id = InstanceId::new();
        let parsed: InstanceId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn definition_id_from_uuid_round_trips() {
        let uuid = Uuid::new_v4();
        let id = DefinitionId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = DefinitionId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, json!(id.to_string()));
    }

    // ---- Record accessor tests ----

    #[test]
    fn instance_field_str_requires_string_value() {
        let instance = Instance::new(DefinitionId::new())
            .with_field("name", "alpha")
            .with_field("count", 3);
        assert_eq!(instance.field_str("name"), Some("alpha"));
        assert_eq!(instance.field_str("count"), None);
        assert_eq!(instance.field("count"), Some(&json!(3)));
        assert_eq!(instance.field_str("missing"), None);
    }

    #[test]
    fn sub_record_field_str_requires_string_value() {
        let sub = SubRecord::new("N1")
            .with_field("configuration_parameters", "{}")
            .with_field("severity", 2);
        assert_eq!(sub.field_str("configuration_parameters"), Some("{}"));
        assert_eq!(sub.field_str("severity"), None);
        assert_eq!(sub.field("severity"), Some(&json!(2)));
    }

    #[test]
    fn sub_records_keep_insertion_order() {
        let instance = Instance::new(DefinitionId::new())
            .with_sub_record(SubRecord::new("N1"))
            .with_sub_record(SubRecord::new("N2"))
            .with_sub_record(SubRecord::new("N3"));
        let ids: Vec<&str> = instance
            .sub_records
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["N1", "N2", "N3"]);
    }

    #[test]
    fn instance_serializes_camel_case() {
        let instance = Instance::new(DefinitionId::new())
            .with_sub_record(SubRecord::new("N1"));
        let json = serde_json::to_value(&instance).unwrap();
        assert!(json.get("subRecords").is_some());
        assert_eq!(json["subRecords"][0]["id"], "N1");
    }

    // ---- Filter evaluation tests ----

    #[test]
    fn empty_filter_matches_everything() {
        let instance = Instance::new(DefinitionId::new());
        assert!(Filter::new().matches(&instance));
    }

    #[test]
    fn definition_condition_matches_same_definition_only() {
        let definition = DefinitionId::new();
        let filter = Filter::new().definition(definition);
        assert!(filter.matches(&Instance::new(definition)));
        assert!(!filter.matches(&Instance::new(DefinitionId::new())));
    }

    #[test]
    fn field_condition_is_exact_and_case_sensitive() {
        let definition = DefinitionId::new();
        let filter = Filter::new().field_equals("job_id", "JOB-42");
        assert!(filter.matches(&Instance::new(definition).with_field("job_id", "JOB-42")));
        assert!(!filter.matches(&Instance::new(definition).with_field("job_id", "job-42")));
        assert!(!filter.matches(&Instance::new(definition).with_field("job_id", "JOB-421")));
    }

    #[test]
    fn absent_field_never_matches() {
        let instance = Instance::new(DefinitionId::new());
        let filter = Filter::new().field_equals("job_id", Value::Null);
        assert!(!filter.matches(&instance));
    }

    #[test]
    fn conjunction_requires_all_conditions() {
        let definition = DefinitionId::new();
        let filter = Filter::new()
            .definition(definition)
            .field_equals("job_id", "JOB-42");

        // Right field, wrong definition.
        let other = Instance::new(DefinitionId::new()).with_field("job_id", "JOB-42");
        assert!(!filter.matches(&other));

        // Right definition, wrong field.
        let wrong = Instance::new(definition).with_field("job_id", "JOB-7");
        assert!(!filter.matches(&wrong));

        let hit = Instance::new(definition).with_field("job_id", "JOB-42");
        assert!(filter.matches(&hit));
        assert_eq!(filter.conditions().len(), 2);
    }

    #[test]
    fn field_condition_compares_non_string_values() {
        let definition = DefinitionId::new();
        let filter = Filter::new().field_equals("retries", 3);
        assert!(filter.matches(&Instance::new(definition).with_field("retries", 3)));
        assert!(!filter.matches(&Instance::new(definition).with_field("retries", "3")));
    }

    // ---- StoreError tests ----

    #[test]
    fn store_error_display() {
        let err = StoreError::Backend {
            message: "connection timeout".to_string(),
            source: None,
        };
        assert_eq!(err.to_string(), "backend error: connection timeout");

        let err = StoreError::Unsupported {
            message: "operator not_equals".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported filter: operator not_equals");
    }

    #[test]
    fn store_error_source_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = StoreError::Backend {
            message: "read failed".to_string(),
            source: Some(Box::new(inner)),
        };
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert!(source.unwrap().to_string().contains("timed out"));

        let err = StoreError::Unsupported {
            message: "x".to_string(),
        };
        assert!(std::error::Error::source(&err).is_none());
    }

    // ---- Filter wire shape ----

    #[test]
    fn filter_serializes_as_condition_list() {
        let definition = DefinitionId::new();
        let filter = Filter::new()
            .definition(definition)
            .field_equals("job_id", "JOB-42");
        let json = serde_json::to_value(&filter).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["definition"], json!(definition.to_string()));
        assert_eq!(json[1]["field"]["name"], "job_id");
        assert_eq!(json[1]["field"]["op"], "equals");
        assert_eq!(json[1]["field"]["value"], "JOB-42");

        let back: Filter = serde_json::from_value(json).unwrap();
        assert_eq!(back, filter);
    }
}
