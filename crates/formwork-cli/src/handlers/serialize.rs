//! Serialization command handler

use super::utils::{load_serializer, read_document};
use crate::cli::SerializeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use formwork_core::{Serializer, Value};
use tracing::{debug, info, instrument};

/// Handle the serialize command
#[instrument(skip(config, output), fields(schema = %args.schema.schema.display(), object = %args.object.display()))]
pub fn handle_serialize(args: SerializeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("serialize_command", &format!("object: {}", args.object.display()));
    info!("Starting serialization");

    let def = load_serializer(&args.schema, config)?;
    let instance = Value::from(read_document(&args.object)?);
    debug!(type_name = instance.type_name(), "Loaded instance");

    let primitive = Serializer::new(&def).serialize(&instance)?;

    output.section(&format!("{} Representation", def.name()))?;
    output.data(&primitive.to_json())
}
