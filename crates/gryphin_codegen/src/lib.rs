//! Code generation for Gryphin.
//!
//! This crate turns a [`TypeGraph`] into Rust source for a strongly typed
//! query builder:
//! - `rust`: Emission of one unit per schema type
//! - `unit`: Generated units, the output collecting them, and override loading
//!
//! The generated code depends on the `gryphin_runtime` crate.
//!
//! # Example
//!
//! ```ignore
//! use gryphin_codegen::CodeGenerator;
//!
//! let graph = gryphin_schema::ingest(&introspection_json)?;
//! let mut output = CodeGenerator::new(&graph).generate();
//! output.append_file_overrides(&graph, &overrides, &|path: &Path| std::fs::read_to_string(path))?;
//! ```

mod names;
mod rust;
pub mod unit;

pub use unit::{GeneratedOutput, GeneratedUnit, SourceLoader, UnitKind};

use gryphin_schema::TypeGraph;
use rust::RustEmitter;

/// Header written at the top of every generated unit.
pub const DEFAULT_HEADER: &str = "// Generated by Gryphin. Do not edit.";

/// Code generation options.
#[derive(Debug, Clone)]
pub struct CodegenOptions {
    /// Emit the `__*` introspection types as well.
    pub include_introspection_types: bool,
    /// Comment written at the top of each unit. Empty for none.
    pub header: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            include_introspection_types: false,
            header: DEFAULT_HEADER.to_string(),
        }
    }
}

/// Main code generator.
pub struct CodeGenerator<'a> {
    graph: &'a TypeGraph,
    options: CodegenOptions,
}

impl<'a> CodeGenerator<'a> {
    /// Creates a new code generator.
    #[must_use]
    pub fn new(graph: &'a TypeGraph) -> Self {
        Self::with_options(graph, CodegenOptions::default())
    }

    /// Creates a new code generator with options.
    #[must_use]
    pub fn with_options(graph: &'a TypeGraph, options: CodegenOptions) -> Self {
        Self { graph, options }
    }

    /// Sets code generation options.
    #[must_use]
    pub fn options(mut self, options: CodegenOptions) -> Self {
        self.options = options;
        self
    }

    /// Generates every unit for the graph.
    ///
    /// Output is a pure function of the graph and options.
    #[must_use]
    pub fn generate(&self) -> GeneratedOutput {
        let units = RustEmitter::new(self.graph, &self.options).emit();
        tracing::debug!(units = units.len(), "generated units");
        GeneratedOutput::new(units)
    }
}

/// Generates code with default options.
#[must_use]
pub fn generate(graph: &TypeGraph) -> GeneratedOutput {
    CodeGenerator::new(graph).generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gryphin_schema::TypeKind;

    #[test]
    fn test_codegen_options_default() {
        let options = CodegenOptions::default();
        assert!(!options.include_introspection_types);
        assert_eq!(options.header, DEFAULT_HEADER);
    }

    #[test]
    fn test_empty_graph_has_module_and_aliases() {
        let graph = TypeGraph::new();
        let output = generate(&graph);

        let kinds: Vec<_> = output.units().iter().map(|u| u.kind).collect();
        assert_eq!(kinds, vec![UnitKind::Module, UnitKind::Aliases]);
        assert!(output.aliases().content.contains("pub type Int = i32;"));
    }

    #[test]
    fn test_header_can_be_disabled() {
        let mut graph = TypeGraph::new();
        graph.register("Role", None, TypeKind::Enum).unwrap();

        let output = CodeGenerator::new(&graph)
            .options(CodegenOptions {
                header: String::new(),
                ..CodegenOptions::default()
            })
            .generate();

        let role = output.unit("role.rs").unwrap();
        assert!(role.content.starts_with("use super::*;"));
    }

    #[test]
    fn test_empty_enum() {
        let mut graph = TypeGraph::new();
        graph.register("Nothing", None, TypeKind::Enum).unwrap();

        let output = generate(&graph);
        let unit = output.unit("nothing.rs").unwrap();
        assert_eq!(unit.kind, UnitKind::Enum);
        assert!(unit.content.contains("match self {}"));
    }
}
