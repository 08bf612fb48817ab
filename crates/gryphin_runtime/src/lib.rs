//! Runtime for Gryphin-generated query builders.
//!
//! Generated code builds queries through this crate:
//! - `value`: GraphQL input values and arguments
//! - `selection`: Selection sets, field aliasing and operations
//! - `response`: Typed access to response objects
//!
//! The runtime only produces query text and decodes responses. Sending
//! requests is left to the caller's HTTP client.
//!
//! # Example
//!
//! ```ignore
//! use generated::query;
//!
//! let operation = query(|q| {
//!     q.viewer(|user| {
//!         user.id().name();
//!     });
//! });
//! assert_eq!(operation.render(), "query { viewer { id name } }");
//! ```

pub mod response;
pub mod selection;
pub mod value;

pub use response::{ResponseError, ResponseObject};
pub use selection::{
    nested, FieldSelection, InlineFragment, Operation, OperationKind, Selection, SelectionBuilder,
    SelectionSet,
};
pub use value::{Argument, IntoValue, ObjectValue, Value};

// Generated code derives through these paths so it needs no direct dependency.
pub use serde;
pub use serde_json;
