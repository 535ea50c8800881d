//! Validation command handler

use super::utils::{load_serializer, read_document, read_text, write_document};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use formwork_core::{Input, MultiDict, Serializer};
use tracing::{debug, info, instrument, trace, warn};

/// Handle the validate command
#[instrument(skip(config, output), fields(schema = %args.schema.schema.display(), form = args.form, partial = args.partial))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("input: {}", args.input.display()));
    info!("Starting validation");
    output.info(&format!("Validating {} against {}", args.input.display(), args.schema.schema.display()))?;

    if args.partial {
        output.warning("Partial mode: missing fields are not reported")?;
    }

    let def = load_serializer(&args.schema, config)?;

    let input: Input = if args.form {
        let body = read_text(&args.input)?;
        trace!(body = %redaction::redact_form_body(body.trim()), "Parsing form body");
        MultiDict::from_urlencoded(body.trim()).into()
    } else {
        read_document(&args.input)?.into()
    };

    let mut serializer = Serializer::new(&def).partial(args.partial).data(input);
    let valid = {
        let _validation_timer = Timer::new("serializer_validation");
        serializer.is_valid()?
    };

    if !valid {
        let detail = serializer.error_detail();
        let count = detail.count();
        warn!(count, "Input failed validation");
        output.error(&format!("✗ {} rejected the input", def.name()))?;
        output.validation_errors(&detail)?;
        return Err(Error::InvalidInput { count });
    }

    let validated = serializer
        .validated_data()
        .map(|value| value.to_json())
        .ok_or_else(|| Error::other("validation produced no data"))?;
    debug!(fields = validated.as_object().map_or(0, |map| map.len()), "Validation succeeded");

    output.success("✓ Input is valid")?;
    output.section("Validated Data")?;
    output.data(&validated)?;

    if let Some(path) = args.save_to {
        write_document(&path, &validated)?;
        info!(path = %path.display(), "Saved validated data");
        output.success(&format!("✓ Validated data saved to {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{OutputFormat, SchemaArgs};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const NOTE_SCHEMA: &str = r#"{
        "name": "Note",
        "fields": [
            {"name": "id", "type": "AutoField", "primary_key": true},
            {"name": "title", "type": "CharField", "max_length": 20},
            {"name": "rank", "type": "PositiveIntegerField", "default": 1},
            {"name": "pinned", "type": "BooleanField"}
        ]
    }"#;

    fn args(dir: &TempDir, input: &str, body: &str) -> ValidateArgs {
        let schema = dir.path().join("note.json");
        fs::write(&schema, NOTE_SCHEMA).unwrap();
        let input_path = dir.path().join(input);
        fs::write(&input_path, body).unwrap();

        ValidateArgs {
            schema: SchemaArgs {
                schema,
                only: Vec::new(),
            },
            input: input_path,
            form: false,
            partial: false,
            save_to: None,
        }
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, true, 0, Box::new(std::io::sink()))
    }

    #[test]
    fn test_valid_document_is_saved() {
        let dir = TempDir::new().unwrap();
        let saved: PathBuf = dir.path().join("out.json");
        let mut args = args(&dir, "note.json", r#"{"title": "Hello", "rank": "3", "pinned": true}"#);
        args.save_to = Some(saved.clone());

        handle_validate(args, &Config::default(), &mut quiet_output()).unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(saved).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"title": "Hello", "rank": 3, "pinned": true}));
    }

    #[test]
    fn test_invalid_document_counts_errors() {
        let dir = TempDir::new().unwrap();
        let args = args(&dir, "note.yaml", "title: a title that is far too long\nrank: -1\n");

        let err = handle_validate(args, &Config::default(), &mut quiet_output()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { count: 3 }));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_partial_form_body() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, "body.txt", "title=Hello\n");
        args.form = true;
        args.partial = true;

        handle_validate(args, &Config::default(), &mut quiet_output()).unwrap();
    }

    #[test]
    fn test_partial_mode_is_announced() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, "note.json", r#"{"rank": 2}"#);
        args.partial = true;
        let transcript = dir.path().join("transcript.txt");
        let sink = fs::File::create(&transcript).unwrap();
        let mut output = OutputWriter::with_writer(OutputFormat::Human, false, false, 0, Box::new(sink));

        handle_validate(args, &Config::default(), &mut output).unwrap();

        let written = fs::read_to_string(transcript).unwrap();
        assert!(written.contains("WARNING: Partial mode: missing fields are not reported"));
        assert!(written.contains("\"rank\": 2"));
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let mut args = args(&dir, "note.json", "{}");
        args.input = dir.path().join("absent.json");

        let err = handle_validate(args, &Config::default(), &mut quiet_output()).unwrap_err();
        assert!(err.should_show_help());
    }
}
