//! Generated units and the output that collects them.

use gryphin_schema::{effective_file_sources, ScalarOverride, TypeGraph};
use std::path::{Path, PathBuf};

/// What a generated unit contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// The module root declaring every other unit.
    Module,
    /// Scalar type aliases and override sources.
    Aliases,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub kind: UnitKind,
    /// Path relative to the output directory, e.g. `user.rs`.
    pub relative_path: PathBuf,
    pub content: String,
}

impl GeneratedUnit {
    /// Creates a unit.
    pub fn new(kind: UnitKind, relative_path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            kind,
            relative_path: relative_path.into(),
            content,
        }
    }

    /// Appends source text after a newline separator.
    pub fn append_source(&mut self, source: &str) {
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            self.content.push('\n');
        }
        self.content.push('\n');
        self.content.push_str(source);
        if !self.content.ends_with('\n') {
            self.content.push('\n');
        }
    }
}

/// Loads the content of scalar override files.
///
/// The generator performs no I/O itself; callers decide where files come
/// from.
pub trait SourceLoader {
    type Error;

    /// Returns the content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the file cannot be read.
    fn load(&self, path: &Path) -> Result<String, Self::Error>;
}

impl<F, E> SourceLoader for F
where
    F: Fn(&Path) -> Result<String, E>,
{
    type Error = E;

    fn load(&self, path: &Path) -> Result<String, E> {
        self(path)
    }
}

/// Every unit produced by one generation run, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    units: Vec<GeneratedUnit>,
    aliases: usize,
}

impl GeneratedOutput {
    pub(crate) fn new(units: Vec<GeneratedUnit>) -> Self {
        let aliases = units
            .iter()
            .position(|unit| unit.kind == UnitKind::Aliases)
            .unwrap_or_default();
        debug_assert_eq!(
            units.iter().filter(|u| u.kind == UnitKind::Aliases).count(),
            1
        );
        Self { units, aliases }
    }

    /// Returns the units in emission order.
    #[must_use]
    pub fn units(&self) -> &[GeneratedUnit] {
        &self.units
    }

    /// Consumes the output, returning its units.
    #[must_use]
    pub fn into_units(self) -> Vec<GeneratedUnit> {
        self.units
    }

    /// Returns the aliases unit. There is exactly one.
    #[must_use]
    pub fn aliases(&self) -> &GeneratedUnit {
        &self.units[self.aliases]
    }

    /// Returns the aliases unit mutably.
    pub fn aliases_mut(&mut self) -> &mut GeneratedUnit {
        &mut self.units[self.aliases]
    }

    /// Returns the units of one kind.
    pub fn of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &GeneratedUnit> {
        self.units.iter().filter(move |unit| unit.kind == kind)
    }

    /// Returns the unit with the given relative path.
    #[must_use]
    pub fn unit(&self, relative_path: impl AsRef<Path>) -> Option<&GeneratedUnit> {
        let path = relative_path.as_ref();
        self.units.iter().find(|unit| unit.relative_path == path)
    }

    /// Appends the content of each file override still in effect in the
    /// merged `graph` to the aliases unit, once per file, in first-seen
    /// order.
    ///
    /// Files behind skipped or replaced overrides are not read.
    ///
    /// # Errors
    ///
    /// Stops at the first file the loader fails to read. Units are left
    /// with the sources appended so far.
    pub fn append_file_overrides<L: SourceLoader>(
        &mut self,
        graph: &TypeGraph,
        overrides: &[ScalarOverride],
        loader: &L,
    ) -> Result<usize, L::Error> {
        let sources = effective_file_sources(overrides, graph);
        for path in &sources {
            let content = loader.load(path)?;
            tracing::debug!(path = %path.display(), "appending scalar source");
            self.aliases_mut().append_source(&content);
        }
        Ok(sources.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gryphin_schema::{scalars, ScalarSource, TypeKind};

    fn output() -> GeneratedOutput {
        GeneratedOutput::new(vec![
            GeneratedUnit::new(UnitKind::Module, "mod.rs", "pub mod aliases;\n".into()),
            GeneratedUnit::new(UnitKind::Aliases, "aliases.rs", "pub type Int = i32;\n".into()),
        ])
    }

    fn file(scalar: &str, path: &str) -> ScalarOverride {
        ScalarOverride::new(scalar, ScalarSource::File(path.into()))
    }

    fn merged(overrides: &[ScalarOverride]) -> TypeGraph {
        let mut graph = TypeGraph::new();
        for name in ["ID", "DateTime", "Date", "Url"] {
            graph.register(name, None, TypeKind::Scalar).unwrap();
        }
        scalars::merge(overrides, &mut graph);
        graph
    }

    fn echo(path: &Path) -> Result<String, std::io::Error> {
        Ok(format!("// from {}\n", path.display()))
    }

    #[test]
    fn test_append_source_separates_with_newline() {
        let mut unit = GeneratedUnit::new(UnitKind::Aliases, "aliases.rs", "a".into());
        unit.append_source("b");
        assert_eq!(unit.content, "a\n\nb\n");
    }

    #[test]
    fn test_aliases_unit_is_found() {
        let output = output();
        assert_eq!(output.aliases().relative_path, Path::new("aliases.rs"));
        assert_eq!(output.of_kind(UnitKind::Module).count(), 1);
        assert!(output.unit("mod.rs").is_some());
    }

    #[test]
    fn test_file_overrides_appended_once_in_order() {
        let mut output = output();
        let overrides = [
            file("DateTime", "time.rs"),
            file("Url", "url.rs"),
            file("Date", "time.rs"),
        ];
        let graph = merged(&overrides);

        let appended = output
            .append_file_overrides(&graph, &overrides, &echo)
            .unwrap();

        assert_eq!(appended, 2);
        assert_eq!(
            output.aliases().content,
            "pub type Int = i32;\n\n// from time.rs\n\n// from url.rs\n"
        );
    }

    #[test]
    fn test_skipped_builtin_file_is_not_appended() {
        let mut output = output();
        let overrides = [file("ID", "id.rs"), file("Url", "url.rs")];
        let graph = merged(&overrides);

        let appended = output
            .append_file_overrides(&graph, &overrides, &echo)
            .unwrap();

        assert_eq!(appended, 1);
        assert!(!output.aliases().content.contains("id.rs"));
    }

    #[test]
    fn test_replaced_file_is_not_read() {
        let mut output = output();
        let overrides = [
            file("DateTime", "old.rs"),
            ScalarOverride::new("DateTime", ScalarSource::Inline("pub type DateTime = i64;".into())),
        ];
        let graph = merged(&overrides);

        let loader = |path: &Path| -> Result<String, String> {
            Err(format!("unexpected read of {}", path.display()))
        };
        let appended = output
            .append_file_overrides(&graph, &overrides, &loader)
            .unwrap();

        assert_eq!(appended, 0);
        assert_eq!(output.aliases().content, "pub type Int = i32;\n");
    }

    #[test]
    fn test_loader_failure_propagates() {
        let mut output = output();
        let overrides = [file("DateTime", "time.rs")];
        let graph = merged(&overrides);
        let loader = |_: &Path| -> Result<String, String> { Err("unreadable".into()) };

        let err = output
            .append_file_overrides(&graph, &overrides, &loader)
            .unwrap_err();
        assert_eq!(err, "unreadable");
    }
}
