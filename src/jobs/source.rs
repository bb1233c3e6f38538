//! The job notes data source.
//!
//! [`JobNotesSource`] wires the resolver and projector into the
//! [`DataSource`] lifecycle: arguments in, one final page of
//! node/note rows out. Each instance serves one request; the host
//! drives it through `on_arguments_processed` and then `next_page`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::jobs::{projector, Job, JobResolver, JobSchema};
use crate::source::{DataSource, SourceInfo};
use crate::store::InstanceStore;
use crate::types::{ArgumentInfo, ArgumentValues, ColumnInfo, Page};

const LOG_TARGET: &str = "rowsource.source";

/// Name of the job identifier argument.
pub const JOB_ID_ARGUMENT: &str = "Job ID";

/// Name of the node identifier column.
pub const NODE_ID_COLUMN: &str = "Job Node ID";

/// Name of the note column.
pub const NOTES_COLUMN: &str = "Notes";

/// Where one request stands in its lifecycle.
enum RequestState {
    /// No argument values received yet.
    Uninitialized,
    /// Arguments processed; the resolved job (if any) waits for
    /// projection.
    ArgumentsProcessed { job: Option<Job> },
    /// The final page has been emitted.
    RowsEmitted,
}

/// Data source producing one row per node of a job, keyed by node id
/// and carrying the note from the node's configuration payload.
///
/// Declares a single optional string argument, [`JOB_ID_ARGUMENT`]. A
/// request without it (or without a matching job) produces an empty
/// final page; it never fails over data.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rowsource::jobs::{JobNotesSource, JobSchema};
/// use rowsource::store::memory::MemoryStore;
/// use rowsource::store::DefinitionId;
///
/// let schema = JobSchema::new(DefinitionId::new(), "job_id");
/// let source = JobNotesSource::new(Arc::new(MemoryStore::new()), schema);
/// ```
pub struct JobNotesSource {
    resolver: JobResolver,
    state: RequestState,
}

impl JobNotesSource {
    /// Creates a source over the given store and schema.
    pub fn new(store: Arc<dyn InstanceStore>, schema: JobSchema) -> Self {
        Self::with_resolver(JobResolver::new(store, schema))
    }

    /// Creates a source around an existing resolver.
    pub fn with_resolver(resolver: JobResolver) -> Self {
        Self {
            resolver,
            state: RequestState::Uninitialized,
        }
    }
}

#[async_trait]
impl DataSource for JobNotesSource {
    fn info(&self) -> SourceInfo {
        SourceInfo::new("Job configuration notes").with_description(
            "One row per job node with the note recorded in its configuration payload.",
        )
    }

    fn arguments(&self) -> Vec<ArgumentInfo> {
        vec![ArgumentInfo::string(JOB_ID_ARGUMENT)
            .with_description("Identifier of the job to load nodes for.")
            .with_required(false)]
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string(NODE_ID_COLUMN)
                .with_description("Node identifier, the join key for node level queries."),
            ColumnInfo::string(NOTES_COLUMN)
                .with_description("Note from the node configuration payload; empty when unreadable."),
        ]
    }

    async fn on_arguments_processed(&mut self, values: &ArgumentValues) -> Result<()> {
        let job_id = values.get_str(JOB_ID_ARGUMENT);
        let job = self.resolver.resolve(job_id).await;
        debug!(
            target: LOG_TARGET,
            resolved = job.is_some(),
            "arguments processed"
        );
        self.state = RequestState::ArgumentsProcessed { job };
        Ok(())
    }

    async fn next_page(&mut self) -> Result<Page> {
        match std::mem::replace(&mut self.state, RequestState::RowsEmitted) {
            RequestState::Uninitialized => {
                // Misuse does not advance the lifecycle.
                self.state = RequestState::Uninitialized;
                warn!(
                    target: LOG_TARGET,
                    "page requested before arguments were processed"
                );
                Err(Error::NotReady {
                    message: "arguments have not been processed".to_string(),
                })
            }
            RequestState::ArgumentsProcessed { job } => {
                let rows = projector::project(job.as_ref());
                debug!(target: LOG_TARGET, rows = rows.len(), "final page emitted");
                Ok(Page::last(rows))
            }
            RequestState::RowsEmitted => Ok(Page::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{DefinitionId, Instance, SubRecord};
    use crate::types::ArgumentKind;

    fn seeded_source() -> JobNotesSource {
        let schema = JobSchema::new(DefinitionId::new(), "job_id");
        let store = MemoryStore::new();
        store.insert(
            Instance::new(schema.job_definition)
                .with_field("job_id", "JOB-42")
                .with_sub_record(
                    SubRecord::new("N1")
                        .with_field(&schema.config_field, r#"{"notes":"check cabling"}"#),
                )
                .with_sub_record(SubRecord::new("N2").with_field(&schema.config_field, "garbage")),
        );
        JobNotesSource::new(Arc::new(store), schema)
    }

    fn values_with(job_id: &str) -> ArgumentValues {
        ArgumentValues::new().with_value(JOB_ID_ARGUMENT, job_id)
    }

    // ---- Declaration tests ----

    #[test]
    fn declares_one_optional_string_argument() {
        let source = seeded_source();
        let args = source.arguments();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].name, JOB_ID_ARGUMENT);
        assert_eq!(args[0].kind, ArgumentKind::String);
        assert!(!args[0].required);
    }

    #[test]
    fn declares_node_id_and_notes_columns() {
        let source = seeded_source();
        let columns = source.columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![NODE_ID_COLUMN, NOTES_COLUMN]);
    }

    #[test]
    fn catalog_info_has_a_name() {
        let source = seeded_source();
        assert!(!source.info().name.is_empty());
    }

    // ---- Lifecycle tests ----

    #[tokio::test]
    async fn emits_one_final_page_of_rows() {
        let mut source = seeded_source();
        source
            .on_arguments_processed(&values_with("JOB-42"))
            .await
            .unwrap();

        let page = source.next_page().await.unwrap();
        assert!(!page.has_next_page);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[0].cells[0].value, "N1");
        assert_eq!(page.rows[0].cells[1].value, "check cabling");
        assert_eq!(page.rows[1].cells[0].value, "N2");
        assert_eq!(page.rows[1].cells[1].value, "");
    }

    #[tokio::test]
    async fn page_before_arguments_is_not_ready() {
        let mut source = seeded_source();
        let result = source.next_page().await;
        assert!(matches!(result, Err(Error::NotReady { .. })));

        // The lifecycle did not advance; processing arguments still works.
        source
            .on_arguments_processed(&values_with("JOB-42"))
            .await
            .unwrap();
        assert_eq!(source.next_page().await.unwrap().rows.len(), 2);
    }

    #[tokio::test]
    async fn second_page_is_empty_and_final() {
        let mut source = seeded_source();
        source
            .on_arguments_processed(&values_with("JOB-42"))
            .await
            .unwrap();
        source.next_page().await.unwrap();

        let page = source.next_page().await.unwrap();
        assert!(page.rows.is_empty());
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn missing_argument_yields_empty_page() {
        let mut source = seeded_source();
        source
            .on_arguments_processed(&ArgumentValues::new())
            .await
            .unwrap();
        let page = source.next_page().await.unwrap();
        assert!(page.rows.is_empty());
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn non_string_argument_is_treated_as_missing() {
        let mut source = seeded_source();
        let values = ArgumentValues::new().with_value(JOB_ID_ARGUMENT, 42);
        source.on_arguments_processed(&values).await.unwrap();
        assert!(source.next_page().await.unwrap().rows.is_empty());
    }

    #[tokio::test]
    async fn reprocessing_arguments_restarts_the_request() {
        let mut source = seeded_source();

        source
            .on_arguments_processed(&values_with("JOB-7"))
            .await
            .unwrap();
        assert!(source.next_page().await.unwrap().rows.is_empty());

        source
            .on_arguments_processed(&values_with("JOB-42"))
            .await
            .unwrap();
        assert_eq!(source.next_page().await.unwrap().rows.len(), 2);
    }
}
