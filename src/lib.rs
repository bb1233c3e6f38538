//! Job-to-rows data source over an external instance store.
//!
//! This crate implements a single query operation for a hosting query
//! engine: given an optional job identifier, resolve at most one job
//! record from an instance store and emit one row per job node, pairing
//! the node's identifier with the note found in its configuration
//! payload.
//!
//! # Overview
//!
//! A request flows through two units. The resolver builds a conjunctive
//! equality filter (job definition plus job-id field), issues exactly
//! one store read, and yields at most one [`jobs::Job`]. The projector
//! turns that job (or its absence) into [`Row`]s, extracting the note
//! from each node's JSON payload and degrading to an empty string when
//! the payload is unreadable. Data-path failures never surface: a
//! missing identifier, a store fault, or an ambiguous match all produce
//! an empty final page.
//!
//! # Module Organization
//!
//! - [`types`] - Contract types exchanged with the host (arguments,
//!   columns, cells, rows, pages)
//! - [`source`] - The [`DataSource`] lifecycle trait hosts drive
//! - [`store`] - The [`store::InstanceStore`] port, filter model, and an
//!   in-memory implementation
//! - [`jobs`] - The job domain: schema, aggregate, resolver, projector,
//!   and [`JobNotesSource`]
//! - [`error`] - Crate error and result types
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use rowsource::jobs::{JobNotesSource, JobSchema};
//! use rowsource::store::memory::MemoryStore;
//! use rowsource::store::{DefinitionId, Instance, SubRecord};
//!
//! let schema = JobSchema::new(DefinitionId::new(), "job_id");
//!
//! let store = MemoryStore::new();
//! store.insert(
//!     Instance::new(schema.job_definition)
//!         .with_field("job_id", "JOB-42")
//!         .with_sub_record(
//!             SubRecord::new("N1")
//!                 .with_field(&schema.config_field, r#"{"notes":"check cabling"}"#),
//!         ),
//! );
//!
//! let source = JobNotesSource::new(Arc::new(store), schema);
//! // The host reads source.arguments() / source.columns(), calls
//! // source.on_arguments_processed(..), then pulls source.next_page().
//! ```

pub mod error;
pub mod jobs;
pub mod source;
pub mod store;
pub mod types;

// Re-exports for ergonomic access
pub use error::{Error, Result};
pub use jobs::JobNotesSource;
pub use source::{DataSource, SourceInfo};
pub use types::*;
