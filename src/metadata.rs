//! Sample metadata cleaning: reduce the metadata table to `(sample_id, bmi)`.

use std::path::Path;

use itertools::Itertools;
use log::{info, warn};

use crate::{
    columns::{self, ID_COLUMN},
    error::MergeError,
    frame::{Frame, is_missing},
};

pub const BMI_COLUMN: &str = "bmi";

const EXAMPLE_IDS: usize = 5;

#[derive(Debug, Clone)]
pub struct CleanedMetadata {
    /// Two columns, [`ID_COLUMN`] and [`BMI_COLUMN`].
    pub frame: Frame,
    pub id_column: String,
    pub id_fallback: bool,
    pub bmi_column: String,
    pub rows_before: usize,
    pub dropped_missing: usize,
    /// Kept rows whose BMI cell does not parse as a number.
    pub non_numeric_bmi: usize,
}

/// Projects metadata onto the identifier and first BMI-like column and drops
/// rows where either value is missing.
///
/// Cells are kept verbatim so identifiers compare as strings downstream. A BMI
/// that is present but not a number is kept and only counted in a warning.
pub fn clean_metadata<S>(
    frame: &Frame,
    source: &Path,
    id_candidates: &[S],
) -> Result<CleanedMetadata, MergeError>
where
    S: AsRef<str>,
{
    info!("Metadata columns: {:?}", frame.headers());
    let resolved = columns::resolve_identifier(frame.headers(), id_candidates).ok_or_else(|| {
        MergeError::EmptyHeader {
            path: source.to_path_buf(),
        }
    })?;
    if resolved.fallback {
        warn!(
            "Could not find any of [{}] in metadata",
            id_candidates.iter().map(|c| c.as_ref()).join(", ")
        );
        warn!(
            "Using first column '{}' as the identifier; the join may not match",
            resolved.name
        );
    }
    info!("Using metadata ID column: {}", resolved.name);

    let bmi_column = columns::resolve_bmi(frame.headers()).ok_or_else(|| {
        MergeError::MissingBmiColumn {
            path: source.to_path_buf(),
        }
    })?;
    info!("Selected BMI column: {bmi_column}");

    let id_idx = frame
        .column_index(resolved.name)
        .expect("identifier column comes from the header row");
    let bmi_idx = frame
        .column_index(bmi_column)
        .expect("BMI column comes from the header row");

    let mut rows = Vec::with_capacity(frame.len());
    let mut dropped_missing = 0usize;
    let mut non_numeric_bmi = 0usize;
    for row in frame.rows() {
        let id = row[id_idx].as_str();
        let bmi = row[bmi_idx].as_str();
        if is_missing(id) || is_missing(bmi) {
            dropped_missing += 1;
            continue;
        }
        if bmi.trim().parse::<f64>().is_err() {
            non_numeric_bmi += 1;
        }
        rows.push(vec![id.to_string(), bmi.to_string()]);
    }
    if non_numeric_bmi > 0 {
        warn!("{non_numeric_bmi} metadata row(s) in '{bmi_column}' hold a non-numeric BMI");
    }

    let cleaned = Frame::from_trusted(vec![ID_COLUMN.to_string(), BMI_COLUMN.to_string()], rows);
    info!("Samples with valid BMI: {}", cleaned.len());
    info!(
        "Example metadata IDs: {:?}",
        cleaned.column(0).take(EXAMPLE_IDS).collect::<Vec<_>>()
    );

    Ok(CleanedMetadata {
        id_column: resolved.name.to_string(),
        id_fallback: resolved.fallback,
        bmi_column: bmi_column.to_string(),
        rows_before: frame.len(),
        dropped_missing,
        non_numeric_bmi,
        frame: cleaned,
    })
}
