//! Schema ingestion for Gryphin.
//!
//! This crate provides:
//! - `graph`: The in-memory type graph built from a schema
//! - `ingest`: Introspection JSON parsing with two-pass reference resolution
//! - `scalars`: Custom scalar overrides merged into the graph
//! - `error`: The schema error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use gryphin_schema::{ingest, scalars, ScalarOverride, ScalarSource};
//!
//! let mut graph = ingest(&introspection_json)?;
//! scalars::merge(
//!     &[ScalarOverride::new("DateTime", ScalarSource::File("scalars/date.rs".into()))],
//!     &mut graph,
//! );
//! ```

pub mod error;
pub mod graph;
pub mod ingest;
pub mod scalars;

pub use error::{ErrorKind, SchemaError, SchemaResult};
pub use graph::{
    Deprecation, EnumValue, Field, InputValue, NamedType, RegisterError, RootTypes, TypeBody,
    TypeGraph, TypeId, TypeKind, TypeRef, BUILTIN_SCALARS,
};
pub use ingest::{ingest, ingest_value};
pub use scalars::{
    distinct_file_sources, effective_file_sources, MergeReport, ScalarOverride, ScalarSource,
    SkipReason,
};
