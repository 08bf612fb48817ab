//! Custom scalar overrides.
//!
//! An override replaces the default alias a custom scalar gets in generated
//! code with user-supplied Rust source, given either inline or as a file the
//! writer appends to the aliases unit.

use crate::graph::{TypeBody, TypeGraph, BUILTIN_SCALARS};
use indexmap::IndexSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where the source of a scalar override comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarSource {
    /// Literal Rust source.
    Inline(String),
    /// A file whose contents are appended to the aliases unit.
    File(PathBuf),
}

/// Maps a schema scalar to custom source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarOverride {
    pub scalar: String,
    pub source: ScalarSource,
}

impl ScalarOverride {
    /// Creates a new override.
    pub fn new(scalar: impl Into<String>, source: ScalarSource) -> Self {
        Self {
            scalar: scalar.into(),
            source,
        }
    }
}

/// Why an override was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No type with that name exists.
    UnknownType,
    /// The named type is not a scalar.
    NotAScalar,
    /// Built-in scalars always keep their built-in alias.
    BuiltinScalar,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::UnknownType => "no such type",
            Self::NotAScalar => "not a scalar",
            Self::BuiltinScalar => "built-in scalar",
        })
    }
}

/// Outcome of [`merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Scalars that received an override, in first-applied order.
    pub applied: IndexSet<String>,
    /// Overrides that were skipped.
    pub skipped: Vec<(String, SkipReason)>,
}

/// Annotates the scalars of `graph` with their overrides.
///
/// When several overrides name the same scalar, the last one wins. Applying
/// the same overrides again leaves the graph unchanged.
pub fn merge(overrides: &[ScalarOverride], graph: &mut TypeGraph) -> MergeReport {
    let mut report = MergeReport::default();

    for entry in overrides {
        let reason = match graph.lookup(&entry.scalar) {
            None => Some(SkipReason::UnknownType),
            Some(_) if BUILTIN_SCALARS.contains(&entry.scalar.as_str()) => {
                Some(SkipReason::BuiltinScalar)
            }
            Some(id) => match &mut graph.get_mut(id).body {
                TypeBody::Scalar { override_source } => {
                    *override_source = Some(entry.source.clone());
                    report.applied.insert(entry.scalar.clone());
                    None
                }
                _ => Some(SkipReason::NotAScalar),
            },
        };

        if let Some(reason) = reason {
            warn!(scalar = %entry.scalar, ?reason, "skipping scalar override");
            report.skipped.push((entry.scalar.clone(), reason));
        }
    }

    debug!(applied = report.applied.len(), "merged scalar overrides");
    report
}

/// Returns each file source once, in first-seen order.
#[must_use]
pub fn distinct_file_sources(overrides: &[ScalarOverride]) -> IndexSet<PathBuf> {
    overrides
        .iter()
        .filter_map(|entry| match &entry.source {
            ScalarSource::File(path) => Some(path.clone()),
            ScalarSource::Inline(_) => None,
        })
        .collect()
}

/// Returns the file sources still in effect in a merged graph, each once,
/// in first-seen order.
///
/// A file named only by skipped overrides, or by overrides a later entry
/// replaced, is left out.
#[must_use]
pub fn effective_file_sources(
    overrides: &[ScalarOverride],
    graph: &TypeGraph,
) -> IndexSet<PathBuf> {
    let in_effect: IndexSet<&PathBuf> = graph
        .iter()
        .filter_map(|(_, ty)| match ty.scalar_override() {
            Some(ScalarSource::File(path)) => Some(path),
            _ => None,
        })
        .collect();

    distinct_file_sources(overrides)
        .into_iter()
        .filter(|path| in_effect.contains(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TypeKind;

    fn graph() -> TypeGraph {
        let mut graph = TypeGraph::new();
        graph.register("ID", None, TypeKind::Scalar).unwrap();
        graph.register("DateTime", None, TypeKind::Scalar).unwrap();
        graph.register("Url", None, TypeKind::Scalar).unwrap();
        graph.register("User", None, TypeKind::Object).unwrap();
        graph
    }

    fn file(path: &str) -> ScalarSource {
        ScalarSource::File(PathBuf::from(path))
    }

    #[test]
    fn test_merge_annotates_scalar() {
        let mut graph = graph();
        let report = merge(&[ScalarOverride::new("DateTime", file("date.rs"))], &mut graph);

        assert_eq!(report.applied.len(), 1);
        assert_eq!(
            graph.by_name("DateTime").unwrap().scalar_override(),
            Some(&file("date.rs"))
        );
        assert!(graph.by_name("Url").unwrap().scalar_override().is_none());
    }

    #[test]
    fn test_last_override_wins() {
        let mut graph = graph();
        merge(
            &[
                ScalarOverride::new("DateTime", file("a.rs")),
                ScalarOverride::new("DateTime", ScalarSource::Inline("pub type DateTime = i64;".into())),
            ],
            &mut graph,
        );

        assert_eq!(
            graph.by_name("DateTime").unwrap().scalar_override(),
            Some(&ScalarSource::Inline("pub type DateTime = i64;".into()))
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let overrides = [ScalarOverride::new("Url", file("url.rs"))];
        let mut once = graph();
        let mut twice = graph();

        merge(&overrides, &mut once);
        merge(&overrides, &mut twice);
        merge(&overrides, &mut twice);

        for ((_, a), (_, b)) in once.iter().zip(twice.iter()) {
            assert_eq!(a.scalar_override(), b.scalar_override());
        }
    }

    #[test]
    fn test_skips_invalid_targets() {
        let mut graph = graph();
        let report = merge(
            &[
                ScalarOverride::new("Missing", file("m.rs")),
                ScalarOverride::new("User", file("u.rs")),
                ScalarOverride::new("ID", file("id.rs")),
            ],
            &mut graph,
        );

        assert!(report.applied.is_empty());
        assert_eq!(
            report.skipped,
            vec![
                ("Missing".to_string(), SkipReason::UnknownType),
                ("User".to_string(), SkipReason::NotAScalar),
                ("ID".to_string(), SkipReason::BuiltinScalar),
            ]
        );
        assert!(graph.by_name("ID").unwrap().scalar_override().is_none());
    }

    #[test]
    fn test_distinct_file_sources() {
        let overrides = [
            ScalarOverride::new("DateTime", file("scalars.extra")),
            ScalarOverride::new("Url", ScalarSource::Inline("pub type Url = String;".into())),
            ScalarOverride::new("Url", file("scalars.extra")),
            ScalarOverride::new("Json", file("json.rs")),
        ];

        let sources: Vec<_> = distinct_file_sources(&overrides).into_iter().collect();
        assert_eq!(
            sources,
            vec![PathBuf::from("scalars.extra"), PathBuf::from("json.rs")]
        );
    }

    #[test]
    fn test_effective_file_sources_drop_skipped_and_replaced() {
        let mut graph = graph();
        let overrides = [
            ScalarOverride::new("ID", file("id.rs")),
            ScalarOverride::new("DateTime", file("old.rs")),
            ScalarOverride::new("DateTime", ScalarSource::Inline("pub type DateTime = i64;".into())),
            ScalarOverride::new("Url", file("shared.rs")),
            ScalarOverride::new("Missing", file("shared.rs")),
        ];
        merge(&overrides, &mut graph);

        let sources: Vec<_> = effective_file_sources(&overrides, &graph).into_iter().collect();
        assert_eq!(sources, vec![PathBuf::from("shared.rs")]);
    }
}
