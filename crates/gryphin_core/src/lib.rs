//! Core utilities for Gryphin.
//!
//! This crate provides the naming primitives shared by the code generator and
//! the runtime the generated code links against:
//! - `naming`: Rust identifier casing, keyword escaping and collision-free scopes
//! - `alias`: Response-key aliasing for repeated field selections

pub mod alias;
pub mod naming;

pub use alias::{is_alias, AliasResolver, ALIAS_PREFIX, TYPENAME_FIELD};
pub use naming::{escape_keyword, to_pascal_case, to_snake_case, Case, NameScope};
