//! Field listing command handler

use super::utils::load_serializer;
use crate::cli::FieldsArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::{FieldSummary, OutputWriter};
use formwork_core::{template_name, Serializer};
use tracing::{info, instrument};

/// Summaries of the bound fields of a serializer, in declaration order
pub fn summarize(serializer: &Serializer) -> Vec<FieldSummary> {
    serializer
        .fields()
        .iter()
        .map(|(name, field)| FieldSummary {
            name: name.clone(),
            type_name: field.type_name().to_string(),
            required: field.required(),
            read_only: field.read_only(),
            write_only: field.write_only(),
            label: field.label().map(str::to_string),
            template: template_name(field).to_string(),
        })
        .collect()
}

/// Handle the fields command
#[instrument(skip(config, output), fields(schema = %args.schema.schema.display()))]
pub fn handle_fields(args: FieldsArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let def = load_serializer(&args.schema, config)?;
    let serializer = Serializer::new(&def);
    let summaries = summarize(&serializer);
    info!(count = summaries.len(), "Listing fields");

    output.section(def.name())?;
    output.fields(&summaries)
}
