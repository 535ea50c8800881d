//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with dedicated
//! layouts for validation errors and field listings.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use formwork_core::ErrorDetail;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, trace};

/// One row of a field listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub label: Option<String>,
    pub template: String,
}

impl FieldSummary {
    /// Comma-separated flags for table output
    fn flags(&self) -> String {
        let mut flags = Vec::new();
        if self.required {
            flags.push("required");
        }
        if self.read_only {
            flags.push("read-only");
        }
        if self.write_only {
            flags.push("write-only");
        }
        flags.join(", ")
    }
}

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format validation errors
    fn format_errors(&self, errors: &ErrorDetail) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_errors(&self, errors: &ErrorDetail) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_errors_human(errors)),
            _ => self.format(&errors.to_json()),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "✓".green(), message.green()))
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose > 0 && self.format == OutputFormat::Human {
            if self.use_color {
                self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
            } else {
                self.writeln(&format!("DEBUG: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(
            "Outputting data: {}",
            serde_json::to_string(&value_json).unwrap_or_else(|_| "[failed to serialize]".to_string())
        );

        let formatted = self.format.format(value)?;
        self.write_formatted(&formatted)
    }

    /// Write validation errors in the configured format
    ///
    /// Machine formats always carry the error map, even in quiet mode.
    pub fn validation_errors(&mut self, errors: &ErrorDetail) -> Result<()> {
        let formatted = self.format.format_errors(errors)?;
        if self.format == OutputFormat::Human && self.use_color {
            let colored = formatted
                .lines()
                .map(|line| line.red().to_string())
                .collect::<Vec<_>>()
                .join("\n");
            return self.writeln(&colored);
        }
        self.write_formatted(&formatted)
    }

    /// Write a field listing: a table for humans, records otherwise
    pub fn fields(&mut self, fields: &[FieldSummary]) -> Result<()> {
        if self.format != OutputFormat::Human {
            return self.data(&fields);
        }
        let rows = fields
            .iter()
            .map(|field| {
                vec![
                    field.name.clone(),
                    field.type_name.clone(),
                    field.flags(),
                    field.template.clone(),
                ]
            })
            .collect();
        self.table(&["FIELD", "TYPE", "FLAGS", "TEMPLATE"], rows)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        // Column widths in characters, not bytes
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");
        let header_row = header_row.trim_end();
        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| match widths.get(i) {
                    Some(width) => format!("{:width$}", cell, width = *width),
                    None => cell.clone(),
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }

    fn write_formatted(&mut self, formatted: &str) -> Result<()> {
        if formatted.ends_with('\n') {
            self.write(formatted)
        } else {
            self.writeln(formatted)
        }
    }
}

/// Flatten an error detail into `(path, message)` pairs
pub fn error_lines(detail: &ErrorDetail) -> Vec<(String, String)> {
    let mut lines = Vec::new();
    collect_error_lines(detail, String::new(), &mut lines);
    lines
}

fn collect_error_lines(detail: &ErrorDetail, path: String, lines: &mut Vec<(String, String)>) {
    let join = |segment: &str| {
        if path.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", path, segment)
        }
    };
    match detail {
        ErrorDetail::Message { message, .. } => lines.push((path.clone(), message.clone())),
        ErrorDetail::Fields(fields) => {
            for (name, child) in fields {
                collect_error_lines(child, join(name), lines);
            }
        }
        ErrorDetail::Items(items) => {
            for (index, child) in items {
                collect_error_lines(child, join(&index.to_string()), lines);
            }
        }
    }
}

/// Format validation errors for human reading
fn format_errors_human(errors: &ErrorDetail) -> String {
    let mut output = format!("Validation failed - {} error(s)\n", errors.count());
    for (path, message) in error_lines(errors) {
        if path.is_empty() {
            output.push_str(&format!("  • {}\n", message));
        } else {
            output.push_str(&format!("  • {}: {}\n", path, message));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    include!("output/tests.rs");
}
