//! Lineage CLI library
//!
//! This module contains the core CLI logic for the Lineage family tree tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::{info, warn};

use lineage::{LineageError, TreeBuilder};

/// Run the Lineage CLI application
///
/// Reads the person records from the input file, lays them out and writes
/// the result in the requested format. Record inconsistencies are logged as
/// warnings and do not fail the run.
///
/// # Errors
///
/// Returns `LineageError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed input records
/// - Duplicate person identifiers
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), LineageError> {
    let output = args.output_path();
    let format = args.output_format();
    info!(
        input_path = args.input,
        output_path = output,
        format:?;
        "Processing family tree"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = TreeBuilder::new(app_config);
    let persons = builder.parse(&source)?;
    let layout = builder.layout(&persons)?;

    if !layout.diagnostics().is_empty() {
        warn!(
            count = layout.diagnostics().len();
            "Input records are inconsistent; the tree was repaired where needed"
        );
    }

    let rendered = match format {
        OutputFormat::Svg => builder.render_svg(&layout)?,
        OutputFormat::Json => builder.render_json(&layout)?,
    };

    fs::write(&output, rendered)?;

    info!(output_file = output; "Family tree exported successfully");

    Ok(())
}
