//! Job lookup against the instance store.
//!
//! The resolver owns the degradation policy: whatever goes wrong on the
//! way to a job (store fault, wrong record shape, ambiguous matches),
//! the answer is "no job" and the failure is logged, never propagated.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::jobs::{Job, JobSchema};
use crate::store::{Filter, InstanceStore};

const LOG_TARGET: &str = "rowsource.resolver";

/// Resolves a job identifier to at most one [`Job`].
///
/// Holds a shared store handle and the schema naming the job
/// definition and its identifier field. One resolver serves any number
/// of lookups; it keeps no per-request state.
pub struct JobResolver {
    store: Arc<dyn InstanceStore>,
    schema: JobSchema,
}

impl JobResolver {
    /// Creates a resolver over the given store and schema.
    pub fn new(store: Arc<dyn InstanceStore>, schema: JobSchema) -> Self {
        Self { store, schema }
    }

    /// Returns the schema this resolver queries with.
    pub fn schema(&self) -> &JobSchema {
        &self.schema
    }

    /// Resolves `job_id` to its job aggregate.
    ///
    /// `None` in means `None` out, without touching the store. A
    /// present identifier (the empty string included) is looked up
    /// verbatim with an exact, case-sensitive match. Zero matches,
    /// more than one match, and every store or wrapping failure all
    /// answer `None`; nothing here errors or panics.
    pub async fn resolve(&self, job_id: Option<&str>) -> Option<Job> {
        let job_id = match job_id {
            Some(id) => id,
            None => {
                debug!(target: LOG_TARGET, "no job id supplied, skipping lookup");
                return None;
            }
        };

        match self.try_resolve(job_id).await {
            Ok(Some(job)) => {
                debug!(
                    target: LOG_TARGET,
                    job_id,
                    instance_id = %job.instance_id(),
                    nodes = job.nodes().len(),
                    "job resolved"
                );
                Some(job)
            }
            Ok(None) => {
                debug!(target: LOG_TARGET, job_id, "no matching job");
                None
            }
            Err(err) => {
                warn!(
                    target: LOG_TARGET,
                    job_id,
                    error = %err,
                    "job lookup failed, returning no job"
                );
                None
            }
        }
    }

    /// The fallible lookup behind [`resolve`](JobResolver::resolve).
    async fn try_resolve(&self, job_id: &str) -> Result<Option<Job>> {
        let filter = self.job_filter(job_id);
        let mut matches = self.store.find(&filter).await?;

        match matches.len() {
            0 => Ok(None),
            1 => {
                let instance = matches.remove(0);
                Job::from_instance(&instance, &self.schema).map(Some)
            }
            n => {
                // A unique key matched several records. Picking one
                // arbitrarily would be wrong, so none is returned.
                warn!(
                    target: LOG_TARGET,
                    job_id,
                    matches = n,
                    "multiple records matched a unique job id, treating as not found"
                );
                Ok(None)
            }
        }
    }

    fn job_filter(&self, job_id: &str) -> Filter {
        Filter::new()
            .definition(self.schema.job_definition)
            .field_equals(&self.schema.job_id_field, job_id)
    }
}
