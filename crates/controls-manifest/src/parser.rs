//! Shared YAML/JSON input loading.
//!
//! All input documents come through these functions so that every parse
//! failure carries the offending file path. The format is chosen by
//! extension: `.json` parses as JSON, everything else as YAML. Absent
//! files map to [`ManifestError::FileNotFound`] rather than a bare I/O
//! error, since a mistyped path is the most common operator mistake.

use std::path::Path;

use crate::error::{ManifestError, ManifestResult};

/// Load an input document into a strongly-typed struct, choosing the
/// parser by file extension (`.json` -> JSON, anything else -> YAML).
pub fn load_document<T: serde::de::DeserializeOwned>(path: &Path) -> ManifestResult<T> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json_typed(path),
        _ => load_yaml_typed(path),
    }
}

/// Load a YAML file into a strongly-typed struct.
pub fn load_yaml_typed<T: serde::de::DeserializeOwned>(path: &Path) -> ManifestResult<T> {
    let content = read_input(path)?;
    serde_yaml::from_str(&content).map_err(|e| ManifestError::YamlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a JSON file into a strongly-typed struct.
pub fn load_json_typed<T: serde::de::DeserializeOwned>(path: &Path) -> ManifestResult<T> {
    let content = read_input(path)?;
    serde_json::from_str(&content).map_err(|e| ManifestError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_input(path: &Path) -> ManifestResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ManifestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ManifestError::Io(e)
        }
    })
}
