//! The `.gryphin` configuration file.
//!
//! ```json
//! {
//!   "schema": { "path": "schema.json" },
//!   "scalars": [
//!     { "name": "DateTime", "file": "scalars/date_time.rs" },
//!     { "name": "URL", "source": "pub type URL = ::std::string::String;" }
//!   ],
//!   "options": { "includeIntrospectionTypes": false }
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the file.

use crate::error::{CliError, CliResult};
use gryphin_codegen::CodegenOptions;
use gryphin_schema::{ScalarOverride, ScalarSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = ".gryphin";

/// Where the schema comes from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaLocation {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

/// A custom scalar implementation.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalarEntry {
    pub name: String,
    pub file: Option<PathBuf>,
    pub source: Option<String>,
}

/// Generation options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    pub include_introspection_types: bool,
    /// Replaces the default unit header when set.
    pub header: Option<String>,
}

/// A parsed `.gryphin` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    pub schema: SchemaLocation,
    #[serde(default)]
    pub scalars: Vec<ScalarEntry>,
    #[serde(default)]
    pub options: GenerateOptions,
}

impl Configuration {
    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Returns the schema file, resolved against `base`.
    ///
    /// # Errors
    ///
    /// Fails if only a URL is configured, or nothing at all.
    pub fn schema_path(&self, base: &Path) -> CliResult<PathBuf> {
        match (&self.schema.path, &self.schema.url) {
            (Some(path), _) => Ok(base.join(path)),
            (None, Some(url)) => Err(CliError::RemoteSchema { url: url.clone() }),
            (None, None) => Err(CliError::NoSchemaLocation),
        }
    }

    /// Returns the scalar overrides in file order, file paths resolved
    /// against `base`.
    ///
    /// # Errors
    ///
    /// Fails for an entry that sets both `file` and `source`, or neither.
    pub fn scalar_overrides(&self, base: &Path) -> CliResult<Vec<ScalarOverride>> {
        self.scalars
            .iter()
            .map(|entry| {
                let source = match (&entry.file, &entry.source) {
                    (Some(file), None) => ScalarSource::File(base.join(file)),
                    (None, Some(text)) => ScalarSource::Inline(text.clone()),
                    _ => {
                        return Err(CliError::InvalidScalar {
                            name: entry.name.clone(),
                        })
                    }
                };
                Ok(ScalarOverride::new(entry.name.clone(), source))
            })
            .collect()
    }

    /// Returns the code generation options.
    #[must_use]
    pub fn codegen_options(&self) -> CodegenOptions {
        let mut options = CodegenOptions {
            include_introspection_types: self.options.include_introspection_types,
            ..CodegenOptions::default()
        };
        if let Some(header) = &self.options.header {
            options.header.clone_from(header);
        }
        options
    }
}

/// Finds the single configuration file in `root`.
///
/// `.gryphin` and any `.gryphin.<ext>` variant count as candidates.
///
/// # Errors
///
/// Fails if `root` cannot be listed, or holds no candidate or several.
pub fn discover(root: &Path) -> CliResult<PathBuf> {
    let entries = std::fs::read_dir(root).map_err(|source| CliError::Read {
        path: root.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name == CONFIG_FILE_NAME
                || name
                    .strip_prefix(CONFIG_FILE_NAME)
                    .is_some_and(|rest| rest.starts_with('.') && rest.len() > 1)
        })
        .map(|entry| entry.path())
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(CliError::ConfigNotFound(root.to_path_buf())),
        1 => Ok(candidates.remove(0)),
        _ => Err(CliError::MultipleConfigs(candidates)),
    }
}
