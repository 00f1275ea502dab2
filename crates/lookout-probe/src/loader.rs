//! Probe definition loading from TOML or JSON files.
//!
//! The bundled definitions live in `probe-definitions/platforms.toml` at the
//! workspace root. JSON arrays of the same objects are accepted as well.

use crate::{
    definition::{ProbeDefinition, RawProbeDefinition},
    error::{ProbeDefinitionError, Result},
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory (relative to the workspace root) holding bundled definitions.
const DEFINITIONS_DIR: &str = "probe-definitions";

/// File name of the bundled definition set.
const DEFAULT_FILE: &str = "platforms.toml";

/// Loader for probe definitions from a single file.
#[derive(Debug, Clone)]
pub struct ProbeLoader {
    path: PathBuf,
}

impl ProbeLoader {
    /// Create a loader for the given definition file.
    ///
    /// The file is not touched until [`load`](Self::load) or
    /// [`load_all`](Self::load_all) is called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a loader using the bundled definitions file.
    ///
    /// Looks for `probe-definitions/platforms.toml` relative to the workspace root.
    ///
    /// # Errors
    /// Returns error if the default file doesn't exist.
    pub fn with_default_path() -> Result<Self> {
        let mut current_dir = std::env::current_dir()?;

        loop {
            let cargo_toml = current_dir.join("Cargo.toml");
            if cargo_toml.exists() {
                if let Ok(contents) = std::fs::read_to_string(&cargo_toml) {
                    if contents.contains("[workspace]") {
                        return Self::existing(current_dir.join(DEFINITIONS_DIR).join(DEFAULT_FILE));
                    }
                }
            }

            if let Some(parent) = current_dir.parent() {
                current_dir = parent.to_path_buf();
            } else {
                break;
            }
        }

        // Fallback: try relative path
        Self::existing(PathBuf::from(DEFINITIONS_DIR).join(DEFAULT_FILE))
    }

    fn existing(path: PathBuf) -> Result<Self> {
        if path.is_file() {
            Ok(Self::new(path))
        } else {
            Err(ProbeDefinitionError::FileNotFound {
                path: path.display().to_string(),
            })
        }
    }

    /// Path this loader reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ordered probe list, failing soft.
    ///
    /// A missing or unparseable file yields an empty list (logged as a
    /// warning); callers treat that as "zero platforms available".
    #[must_use]
    pub fn load(&self) -> Vec<ProbeDefinition> {
        match self.load_all() {
            Ok(definitions) => definitions,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "probe definitions unavailable, continuing with none"
                );
                Vec::new()
            }
        }
    }

    /// Load all probe definitions in file order.
    ///
    /// Invalid or duplicate entries are logged as warnings and skipped.
    ///
    /// # Errors
    /// Returns error if the file can't be read, has an unknown extension, or
    /// is not valid TOML/JSON as a whole.
    pub fn load_all(&self) -> Result<Vec<ProbeDefinition>> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| ProbeDefinitionError::LoadError {
                path: self.path.display().to_string(),
                source: e,
            })?;

        let entries = match self.path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::parse_toml(&self.path, &contents)?,
            Some("json") => Self::parse_json(&self.path, &contents)?,
            _ => {
                return Err(ProbeDefinitionError::UnsupportedFormat {
                    path: self.path.display().to_string(),
                })
            }
        };

        let mut definitions = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let definition = match entry.and_then(ProbeDefinition::try_from) {
                Ok(definition) => definition,
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        index,
                        error = %e,
                        "skipping invalid probe definition"
                    );
                    continue;
                }
            };

            if !seen.insert(definition.name().to_string()) {
                warn!(
                    path = %self.path.display(),
                    error = %ProbeDefinitionError::Duplicate { name: definition.name().to_string() },
                    "skipping duplicate probe definition"
                );
                continue;
            }

            debug!(platform = %definition.name(), "loaded probe definition");
            definitions.push(definition);
        }

        info!(
            count = definitions.len(),
            path = %self.path.display(),
            "loaded probe definitions"
        );

        Ok(definitions)
    }

    /// Split a TOML file into `[[platform]]` entries, each parsed separately.
    fn parse_toml(path: &Path, contents: &str) -> Result<Vec<Result<RawProbeDefinition>>> {
        let table: toml::Table =
            toml::from_str(contents).map_err(|e| ProbeDefinitionError::ParseError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let Some(platforms) = table.get("platform") else {
            return Ok(Vec::new());
        };

        let array = platforms
            .as_array()
            .ok_or_else(|| ProbeDefinitionError::ParseError {
                path: path.display().to_string(),
                reason: "`platform` must be an array of tables".to_string(),
            })?;

        Ok(array
            .iter()
            .enumerate()
            .map(|(index, value)| {
                value
                    .clone()
                    .try_into::<RawProbeDefinition>()
                    .map_err(|e| entry_error(index, &e.to_string()))
            })
            .collect())
    }

    /// Split a JSON array into entries, each parsed separately.
    fn parse_json(path: &Path, contents: &str) -> Result<Vec<Result<RawProbeDefinition>>> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(contents).map_err(|e| ProbeDefinitionError::ParseError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        Ok(values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<RawProbeDefinition>(value)
                    .map_err(|e| entry_error(index, &e.to_string()))
            })
            .collect())
    }
}

fn entry_error(index: usize, reason: &str) -> ProbeDefinitionError {
    ProbeDefinitionError::ValidationError {
        name: format!("entry #{index}"),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::CheckStrategy;
    use lookout_core::Category;
    use tempfile::TempDir;

    const TOML_FIXTURE: &str = r#"
[[platform]]
name = "GitHub"
url = "https://github.com/{}"
category = "Developer"

[[platform]]
name = "Reddit"
url = "https://www.reddit.com/user/{}"
category = "Social"
check_type = "string_match"
error_msg = "Sorry, nobody on Reddit goes by that name."

[[platform]]
name = "Broken"
url = "https://broken.test/"
category = "Social"

[[platform]]
url = "https://nameless.test/{}"
category = "Social"

[[platform]]
name = "Reddit"
url = "https://old.reddit.com/user/{}"
category = "Social"
"#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn test_load_toml_skips_invalid_entries() {
        let dir = TempDir::new().expect("create temp dir");
        let path = write(&dir, "platforms.toml", TOML_FIXTURE);

        let definitions = ProbeLoader::new(path).load_all().expect("load definitions");

        let names: Vec<_> = definitions.iter().map(ProbeDefinition::name).collect();
        assert_eq!(names, vec!["GitHub", "Reddit"]);
        assert!(definitions[0].deep_scan());
        assert_eq!(definitions[1].category(), Category::Social);
        assert!(matches!(
            definitions[1].check(),
            CheckStrategy::StringMatch { error_msg } if error_msg.contains("nobody on Reddit")
        ));
        // First occurrence wins on duplicate names
        assert_eq!(definitions[1].url_template(), "https://www.reddit.com/user/{}");
    }

    #[test]
    fn test_load_json_array() {
        let dir = TempDir::new().expect("create temp dir");
        let path = write(
            &dir,
            "platforms.json",
            r#"[
                {"name": "Twitch", "url": "https://www.twitch.tv/{}", "category": "Gaming"},
                {"name": "Medium", "url": "https://medium.com/@{}", "category": "Media",
                 "check_type": "string_match", "error_msg": "404"},
                {"name": 42}
            ]"#,
        );

        let definitions = ProbeLoader::new(path).load();
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].name(), "Twitch");
        assert_eq!(definitions[1].category(), Category::Media);
    }

    #[test]
    fn test_load_missing_file_fails_soft() {
        let loader = ProbeLoader::new("/nonexistent/platforms.toml");
        assert!(matches!(
            loader.load_all(),
            Err(ProbeDefinitionError::LoadError { .. })
        ));
        assert!(loader.load().is_empty());
    }

    #[test]
    fn test_load_malformed_file_fails_soft() {
        let dir = TempDir::new().expect("create temp dir");
        let toml_path = write(&dir, "bad.toml", "invalid toml content [[[");
        let json_path = write(&dir, "bad.json", "{\"not\": \"an array\"}");

        assert!(ProbeLoader::new(&toml_path).load().is_empty());
        assert!(ProbeLoader::new(&json_path).load().is_empty());
        assert!(matches!(
            ProbeLoader::new(&toml_path).load_all(),
            Err(ProbeDefinitionError::ParseError { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().expect("create temp dir");
        let path = write(&dir, "platforms.yaml", "- name: x");
        assert!(matches!(
            ProbeLoader::new(path).load_all(),
            Err(ProbeDefinitionError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_toml_without_platforms_is_empty() {
        let dir = TempDir::new().expect("create temp dir");
        let path = write(&dir, "empty.toml", "# nothing here\n");
        let definitions = ProbeLoader::new(path).load_all().expect("load definitions");
        assert!(definitions.is_empty());
    }
}
