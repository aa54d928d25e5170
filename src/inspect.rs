use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::InspectArgs,
    columns::{self, METADATA_ID_CANDIDATES, TAXONOMY_ID_CANDIDATES},
    io_utils,
    layout::{self, Layout},
    loader, table,
};

pub fn execute(args: &InspectArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let loaded = loader::load_table(&args.input, encoding)
        .with_context(|| format!("Inspecting {:?}", args.input))?;
    let frame = &loaded.frame;
    info!(
        "{:?} read as {} with shape {:?}",
        args.input,
        loaded.format,
        frame.shape()
    );
    info!("Columns: {:?}", frame.headers());

    match layout::classify(frame.headers(), TAXONOMY_ID_CANDIDATES) {
        Layout::Long {
            id_column,
            id_fallback,
        } => info!(
            "Taxonomy layout: long (sample column '{id_column}'{})",
            if id_fallback { ", first-column fallback" } else { "" }
        ),
        Layout::Wide => info!("Taxonomy layout: wide (first column taken as the identifier)"),
    }
    if let Some(resolved) = columns::resolve_identifier(frame.headers(), METADATA_ID_CANDIDATES) {
        info!(
            "Metadata ID column: {}{}",
            resolved.name,
            if resolved.fallback { " (first-column fallback)" } else { "" }
        );
    }
    match columns::resolve_bmi(frame.headers()) {
        Some(bmi) => info!("BMI column: {bmi}"),
        None => info!("No BMI-like column"),
    }

    table::print_preview(frame, args.rows);
    info!(
        "Displayed {} row(s) from {:?}",
        frame.len().min(args.rows),
        args.input
    );
    Ok(())
}
