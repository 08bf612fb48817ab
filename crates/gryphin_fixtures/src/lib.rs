//! Query builder generated from `schema/schema.json` at build time.
//!
//! Building this crate compiles every generated unit against
//! `gryphin_runtime`. The tests drive the generated API end to end.

include!(concat!(env!("OUT_DIR"), "/generated.rs"));
