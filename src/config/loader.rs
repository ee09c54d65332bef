//! Config file loading

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::key::join_path;
use crate::error::{ConfigError, Result};

/// Conventional config file locations, relative to the base directory.
const CONFIG_CANDIDATES: [&str; 2] = ["config/config.yaml", "config/config.yml"];

/// Where to look for the YAML file.
#[derive(Debug, Clone)]
pub enum FileLocation {
    /// Search the conventional names under a base directory. Absence is fine.
    Conventional(PathBuf),
    /// A path the user asked for. Absence is an error.
    Explicit(PathBuf),
}

impl FileLocation {
    /// Every path that will be tried, in order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        match self {
            Self::Conventional(base) => CONFIG_CANDIDATES.iter().map(|c| base.join(c)).collect(),
            Self::Explicit(path) => vec![path.clone()],
        }
    }
}

/// A parsed config file, flattened to dotted keys.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    /// `(dotted.key, leaf value)` in document order. Null leaves are omitted.
    pub entries: Vec<(String, serde_yaml::Value)>,
}

/// Read and parse the config file.
///
/// Returns `Ok(None)` when no file exists at a conventional location. Every
/// other failure is an error, including an explicit path that does not exist.
pub fn load_file(location: &FileLocation) -> Result<Option<LoadedFile>> {
    let path = match location {
        FileLocation::Explicit(path) => path.clone(),
        FileLocation::Conventional(_) => match discover(location)? {
            Some(path) => path,
            None => return Ok(None),
        },
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return match location {
                FileLocation::Explicit(_) => Err(ConfigError::FileNotFound { path }),
                FileLocation::Conventional(_) => Ok(None),
            };
        }
        Err(source) => return Err(ConfigError::FileRead { path, source }),
    };

    let entries = parse_yaml_config(&content, &path)?;
    tracing::debug!("Loaded {} keys from {}", entries.len(), path.display());
    Ok(Some(LoadedFile { path, entries }))
}

/// First conventional candidate that exists. A candidate whose existence
/// cannot be checked is a read error, not an absent file.
fn discover(location: &FileLocation) -> Result<Option<PathBuf>> {
    for path in location.candidates() {
        match path.try_exists() {
            Ok(true) => return Ok(Some(path)),
            Ok(false) => {}
            Err(source) => return Err(ConfigError::FileRead { path, source }),
        }
    }
    Ok(None)
}

/// Parse a YAML document and flatten its mappings into dotted keys.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Vec<(String, serde_yaml::Value)>> {
    let malformed = |reason: String| ConfigError::FileMalformed { path: config_file.to_path_buf(), reason };

    let raw: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| malformed(e.to_string()))?;

    let mut entries = Vec::new();
    match raw {
        // An empty document has nothing to contribute.
        serde_yaml::Value::Null => {}
        serde_yaml::Value::Mapping(mapping) => {
            flatten(&mut entries, &mut Vec::new(), mapping).map_err(malformed)?;
        }
        _ => return Err(malformed("top level must be a mapping".to_string())),
    }
    Ok(entries)
}

fn flatten(
    out: &mut Vec<(String, serde_yaml::Value)>,
    prefix: &mut Vec<String>,
    mapping: serde_yaml::Mapping,
) -> std::result::Result<(), String> {
    for (key, value) in mapping {
        let segment = match key {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            other => return Err(format!("unsupported mapping key {other:?}")),
        };
        prefix.push(segment);

        match value {
            serde_yaml::Value::Mapping(nested) => flatten(out, prefix, nested)?,
            serde_yaml::Value::Null => {
                tracing::debug!("Skipping empty config key {}", join_path(prefix.as_slice()));
            }
            leaf => out.push((join_path(prefix.as_slice()), leaf)),
        }

        prefix.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let config_dir = dir.join("config");
        fs::create_dir_all(&config_dir).expect("mkdir");
        let path = config_dir.join(name);
        fs::write(&path, content).expect("write");
        path
    }

    fn keys(file: &LoadedFile) -> Vec<&str> {
        file.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_missing_conventional_file_is_none() {
        let tmp = TempDir::new().expect("tmp");
        let loaded = load_file(&FileLocation::Conventional(tmp.path().to_path_buf())).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("nope.yaml");
        let err = load_file(&FileLocation::Explicit(path)).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_nested_mappings_flatten_to_dotted_keys() {
        let tmp = TempDir::new().expect("tmp");
        write_config(
            tmp.path(),
            "config.yaml",
            "port: 8080\nchild:\n  enabled: true\n  strings: [a, b]\n  grand_child:\n    string: deep\n",
        );

        let loaded = load_file(&FileLocation::Conventional(tmp.path().to_path_buf()))
            .expect("load")
            .expect("file present");
        assert_eq!(
            keys(&loaded),
            vec!["port", "child.enabled", "child.strings", "child.grand_child.string"]
        );
        assert!(loaded.path.ends_with("config/config.yaml"));
    }

    #[test]
    fn test_yml_extension_is_discovered() {
        let tmp = TempDir::new().expect("tmp");
        write_config(tmp.path(), "config.yml", "loglevel: debug\n");

        let loaded = load_file(&FileLocation::Conventional(tmp.path().to_path_buf()))
            .expect("load")
            .expect("file present");
        assert_eq!(keys(&loaded), vec!["loglevel"]);
    }

    #[test]
    fn test_null_leaves_are_skipped() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(tmp.path(), "config.yaml", "top_string:\nport: 1\n");

        let loaded = load_file(&FileLocation::Explicit(path)).expect("load").expect("file present");
        assert_eq!(keys(&loaded), vec!["port"]);
    }

    #[test]
    fn test_empty_document_has_no_entries() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(tmp.path(), "config.yaml", "");

        let loaded = load_file(&FileLocation::Explicit(path)).expect("load").expect("file present");
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        let tmp = TempDir::new().expect("tmp");
        write_config(tmp.path(), "config.yaml", "port: [1, 2\nchild: {\n");

        let err = load_file(&FileLocation::Conventional(tmp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::FileMalformed { .. }), "got {err:?}");
    }

    #[test]
    fn test_scalar_document_is_malformed() {
        let tmp = TempDir::new().expect("tmp");
        let path = write_config(tmp.path(), "config.yaml", "just a string\n");

        let err = load_file(&FileLocation::Explicit(path)).unwrap_err();
        assert!(err.to_string().contains("top level must be a mapping"));
    }

    #[test]
    fn test_directory_in_place_of_file_is_read_error() {
        let tmp = TempDir::new().expect("tmp");
        fs::create_dir_all(tmp.path().join("config/config.yaml")).expect("mkdir");

        let err = load_file(&FileLocation::Conventional(tmp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }), "got {err:?}");
    }

    #[test]
    fn test_uncheckable_candidate_is_read_error() {
        let tmp = TempDir::new().expect("tmp");
        // `config` is a plain file, so `config/config.yaml` fails with ENOTDIR.
        fs::write(tmp.path().join("config"), "not a directory").expect("write");

        let err = load_file(&FileLocation::Conventional(tmp.path().to_path_buf())).unwrap_err();
        assert!(
            matches!(err, ConfigError::FileRead { ref path, .. } if path.ends_with("config/config.yaml")),
            "got {err:?}"
        );
    }
}
