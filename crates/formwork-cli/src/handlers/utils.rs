//! Shared utilities for command handlers

use crate::cli::SchemaArgs;
use crate::config::{is_yaml, Config};
use crate::error::{Error, Result};
use formwork_core::{ModelSchema, ModelSerializer, SerializerDef};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Path that stands for standard input
pub const STDIN: &str = "-";

/// Find a schema file, either as given or by name in the schemas directory
pub fn locate_schema(schema: &Path, config: &Config) -> Result<PathBuf> {
    if schema.exists() {
        return Ok(schema.to_path_buf());
    }

    let name = schema.to_string_lossy();
    ["json", "yaml", "yml"]
        .iter()
        .map(|extension| config.paths.schemas_dir.join(format!("{}.{}", name, extension)))
        .find(|candidate| candidate.exists())
        .ok_or_else(|| Error::FileNotFound {
            path: schema.to_path_buf(),
        })
}

/// Load a model schema and build its serializer
pub fn load_serializer(args: &SchemaArgs, config: &Config) -> Result<Arc<SerializerDef>> {
    let path = locate_schema(&args.schema, config)?;
    debug!(path = %path.display(), "Loading model schema");

    let document = read_document(&path)?;
    let schema: ModelSchema = serde_json::from_value(document).map_err(|_| Error::InvalidFormat {
        path: path.clone(),
        expected: "model schema".to_string(),
    })?;

    let builder = ModelSerializer::builder(&schema);
    let def = if args.only.is_empty() {
        builder.build()?
    } else {
        builder.only(args.only.as_slice()).build()?
    };
    debug!(serializer = def.name(), fields = ?def.field_names(), "Built serializer");
    Ok(def)
}

/// Read a file, or standard input for `-`
pub fn read_text(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Read a JSON or YAML document
///
/// The format follows the extension. Standard input is tried as JSON first.
pub fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content = read_text(path)?;
    debug!("Read {} bytes from {}", content.len(), path.display());

    if is_yaml(path) {
        return serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        });
    }
    match serde_json::from_str(&content) {
        Ok(value) => Ok(value),
        Err(_) if path.as_os_str() == STDIN => {
            serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON or YAML".to_string(),
            })
        }
        Err(_) => Err(Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        }),
    }
}

/// Write a document as YAML or pretty JSON, by extension
pub fn write_document(path: &Path, value: &serde_json::Value) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    const NOTE_SCHEMA: &str = r#"{
        "name": "Note",
        "fields": [
            {"name": "id", "type": "AutoField", "primary_key": true},
            {"name": "title", "type": "CharField", "max_length": 20},
            {"name": "pinned", "type": "BooleanField"}
        ]
    }"#;

    fn config_with_schemas(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.schemas_dir = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_locate_schema_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("note.yaml"), "name: Note\nfields: []\n").unwrap();
        let config = config_with_schemas(&dir);

        let found = locate_schema(Path::new("note"), &config).unwrap();
        assert_eq!(found, dir.path().join("note.yaml"));

        let err = locate_schema(Path::new("missing"), &config).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_load_serializer_with_only() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", NOTE_SCHEMA).unwrap();

        let args = SchemaArgs {
            schema: file.path().to_path_buf(),
            only: vec!["pinned".into(), "title".into()],
        };
        let def = load_serializer(&args, &Config::default()).unwrap();
        assert_eq!(def.name(), "NoteSerializer");
        assert_eq!(def.field_names(), ["pinned", "title"]);
    }

    #[test]
    fn test_unknown_only_field_is_core_error() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", NOTE_SCHEMA).unwrap();

        let args = SchemaArgs {
            schema: file.path().to_path_buf(),
            only: vec!["body".into()],
        };
        let err = load_serializer(&args, &Config::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_document() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();

        let err = read_document(file.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { ref expected, .. } if expected == "JSON"));
    }

    #[test]
    fn test_write_document_by_extension() {
        let dir = TempDir::new().unwrap();
        let value = serde_json::json!({"title": "Hello"});

        let yaml = dir.path().join("out.yaml");
        write_document(&yaml, &value).unwrap();
        assert_eq!(fs::read_to_string(&yaml).unwrap(), "title: Hello\n");

        let json = dir.path().join("out.json");
        write_document(&json, &value).unwrap();
        assert_eq!(read_document(&json).unwrap(), value);
    }
}
