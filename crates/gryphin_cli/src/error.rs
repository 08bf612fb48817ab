//! CLI error types.

use gryphin_schema::SchemaError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a CLI run.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("no .gryphin configuration file found in {}", .0.display())]
    #[diagnostic(
        code(gryphin::config::not_found),
        help("create a configuration file named .gryphin in the project root")
    )]
    ConfigNotFound(PathBuf),

    #[error("multiple configuration files found: {}", display_paths(.0))]
    #[diagnostic(
        code(gryphin::config::ambiguous),
        help("keep exactly one configuration file")
    )]
    MultipleConfigs(Vec<PathBuf>),

    #[error("invalid configuration in {}: {source}", .path.display())]
    #[diagnostic(code(gryphin::config::invalid))]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration must provide a schema path")]
    #[diagnostic(
        code(gryphin::config::no_schema),
        help("set `schema.path` to an introspection JSON file")
    )]
    NoSchemaLocation,

    #[error("remote schemas are not supported: {url}")]
    #[diagnostic(
        code(gryphin::config::remote_schema),
        help("download the introspection result and set `schema.path` instead")
    )]
    RemoteSchema { url: String },

    #[error("scalar `{name}` must set exactly one of `file` or `source`")]
    #[diagnostic(code(gryphin::config::scalar))]
    InvalidScalar { name: String },

    #[error("failed to read {}: {source}", .path.display())]
    #[diagnostic(
        code(gryphin::io::read),
        help(
            "paths resolve against the configuration directory; an unreadable scalar \
             override file stops generation instead of being skipped, so fix its path \
             or remove the entry"
        )
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    #[diagnostic(code(gryphin::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema: {0}")]
    #[diagnostic(code(gryphin::schema))]
    Schema(#[from] SchemaError),
}

/// Result alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CliError::MultipleConfigs(vec![".gryphin".into(), ".gryphin.json".into()]);
        assert_eq!(
            err.to_string(),
            "multiple configuration files found: .gryphin, .gryphin.json"
        );
        assert_eq!(
            CliError::NoSchemaLocation.to_string(),
            "configuration must provide a schema path"
        );
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = CliError::ConfigNotFound("/tmp/app".into());
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("gryphin::config::not_found")
        );
        assert!(err.help().is_some());
    }

    #[test]
    fn test_read_help_explains_unreadable_overrides() {
        let err = CliError::Read {
            path: "scalars/time.rs".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("instead of being skipped"));
        assert!(help.contains("configuration directory"));
    }
}
