//! Taxonomy layout detection and the long-to-wide pivot.
//!
//! A taxonomy table is either long (one row per sample/species pair, with
//! `species` and `rel_abund` columns) or assumed to be already wide (one row
//! per sample). [`classify`] only looks at column names; [`pivot_long`] and
//! [`assume_wide`] do the reshaping.

use std::collections::{BTreeMap, BTreeSet, HashMap, hash_map::Entry};

use log::{info, warn};
use serde::Serialize;

use crate::{
    columns::{self, ID_COLUMN},
    error::MergeError,
    frame::{Frame, is_missing},
};

pub const SPECIES_COLUMN: &str = "species";
pub const ABUNDANCE_COLUMN: &str = "rel_abund";

/// Value written for a species that was not observed in a sample.
pub const ABSENT_ABUNDANCE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Layout {
    Long { id_column: String, id_fallback: bool },
    Wide,
}

impl Layout {
    pub fn label(&self) -> &'static str {
        match self {
            Layout::Long { .. } => "long",
            Layout::Wide => "wide",
        }
    }
}

pub fn classify<S>(columns: &[String], id_candidates: &[S]) -> Layout
where
    S: AsRef<str>,
{
    let has = |name: &str| columns.iter().any(|c| c == name);
    if !(has(SPECIES_COLUMN) && has(ABUNDANCE_COLUMN)) {
        return Layout::Wide;
    }
    match columns::resolve_identifier(columns, id_candidates) {
        Some(resolved) => Layout::Long {
            id_column: resolved.name.to_string(),
            id_fallback: resolved.fallback,
        },
        None => Layout::Wide,
    }
}

/// Classifies `frame` and reshapes it so the identifier is the first column,
/// named [`ID_COLUMN`].
pub fn reshape<S>(frame: Frame, id_candidates: &[S]) -> Result<(Layout, Frame), MergeError>
where
    S: AsRef<str>,
{
    let layout = classify(frame.headers(), id_candidates);
    let reshaped = match &layout {
        Layout::Long {
            id_column,
            id_fallback,
        } => {
            info!("Detected LONG format taxonomy. Pivoting to WIDE format...");
            if *id_fallback {
                warn!("No taxonomy ID column matched; falling back to first column '{id_column}'");
            }
            info!("Using taxonomy ID column: {id_column}");
            let wide = pivot_long(&frame, id_column)?;
            info!("Pivoted taxonomy shape: {:?}", wide.shape());
            wide
        }
        Layout::Wide => {
            warn!("Taxonomy seems to be already WIDE (or unknown format)");
            assume_wide(frame)
        }
    };
    Ok((layout, reshaped))
}

/// Pivots a long table: one row per sample (sorted), one column per species
/// (sorted), absent pairs filled with [`ABSENT_ABUNDANCE`].
///
/// Rows missing a sample or species are skipped; a missing abundance counts as
/// zero. Other abundance cells are placed verbatim, numeric or not. A repeated
/// sample/species pair cannot be placed and is an error.
pub fn pivot_long(frame: &Frame, id_column: &str) -> Result<Frame, MergeError> {
    let (Some(id_idx), Some(species_idx), Some(abund_idx)) = (
        frame.column_index(id_column),
        frame.column_index(SPECIES_COLUMN),
        frame.column_index(ABUNDANCE_COLUMN),
    ) else {
        return Err(MergeError::MissingColumns {
            expected: vec![
                id_column.to_string(),
                SPECIES_COLUMN.to_string(),
                ABUNDANCE_COLUMN.to_string(),
            ],
        });
    };

    let mut species_names: BTreeSet<&str> = BTreeSet::new();
    let mut samples: BTreeMap<&str, HashMap<&str, &str>> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut non_numeric = 0usize;

    for row in frame.rows() {
        let sample = row[id_idx].as_str();
        let species = row[species_idx].as_str();
        if is_missing(sample) || is_missing(species) {
            skipped += 1;
            continue;
        }
        let raw = row[abund_idx].as_str();
        let abundance = if is_missing(raw) {
            ABSENT_ABUNDANCE
        } else {
            if raw.trim().parse::<f64>().is_err() {
                non_numeric += 1;
            }
            raw
        };

        species_names.insert(species);
        match samples.entry(sample).or_default().entry(species) {
            Entry::Occupied(_) => {
                return Err(MergeError::DuplicatePivotEntry {
                    sample: sample.to_string(),
                    species: species.to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(abundance);
            }
        }
    }
    if skipped > 0 {
        warn!("Skipped {skipped} taxonomy row(s) without a sample or species");
    }
    if non_numeric > 0 {
        warn!("{non_numeric} '{ABUNDANCE_COLUMN}' value(s) are not numeric; kept as written");
    }

    let mut headers = Vec::with_capacity(species_names.len() + 1);
    headers.push(ID_COLUMN.to_string());
    headers.extend(species_names.iter().map(|s| s.to_string()));

    let rows = samples
        .into_iter()
        .map(|(sample, cells)| {
            let mut row = Vec::with_capacity(headers.len());
            row.push(sample.to_string());
            row.extend(species_names.iter().map(|species| {
                cells
                    .get(species)
                    .copied()
                    .unwrap_or(ABSENT_ABUNDANCE)
                    .to_string()
            }));
            row
        })
        .collect();

    Ok(Frame::from_trusted(headers, rows))
}

/// Treats the first column as the identifier without validating it.
pub fn assume_wide(frame: Frame) -> Frame {
    if frame
        .headers()
        .iter()
        .skip(1)
        .any(|header| header == ID_COLUMN)
    {
        warn!("Taxonomy already has a '{ID_COLUMN}' column that is not first; keeping both");
    }
    frame.with_renamed(0, ID_COLUMN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::TAXONOMY_ID_CANDIDATES;

    fn frame(headers: &[&str], rows: &[&[&str]]) -> Frame {
        Frame::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn classify_requires_species_and_abundance() {
        assert_eq!(
            classify(&columns(&["sample", "species", "rel_abund"]), TAXONOMY_ID_CANDIDATES),
            Layout::Long {
                id_column: "sample".to_string(),
                id_fallback: false
            }
        );
        assert_eq!(
            classify(&columns(&["sample", "species", "abundance"]), TAXONOMY_ID_CANDIDATES),
            Layout::Wide
        );
        assert_eq!(
            classify(&columns(&["Species", "rel_abund"]), TAXONOMY_ID_CANDIDATES),
            Layout::Wide
        );
    }

    #[test]
    fn classify_prefers_sample_alias_and_falls_back_to_first_column() {
        let layout = classify(
            &columns(&["sample", "sample_alias", "species", "rel_abund"]),
            TAXONOMY_ID_CANDIDATES,
        );
        assert_eq!(
            layout,
            Layout::Long {
                id_column: "sample_alias".to_string(),
                id_fallback: false
            }
        );

        let layout = classify(
            &columns(&["run", "species", "rel_abund"]),
            TAXONOMY_ID_CANDIDATES,
        );
        assert_eq!(
            layout,
            Layout::Long {
                id_column: "run".to_string(),
                id_fallback: true
            }
        );
    }

    #[test]
    fn pivot_fills_absent_species_with_zero() {
        let long = frame(
            &["sample", "species", "rel_abund"],
            &[&["a", "X", "0.3"], &["a", "Y", "0.2"], &["b", "X", "0.7"]],
        );
        let wide = pivot_long(&long, "sample").unwrap();

        assert_eq!(wide.headers(), ["sample_id", "X", "Y"]);
        assert_eq!(
            wide.rows(),
            [vec!["a", "0.3", "0.2"], vec!["b", "0.7", "0"]]
        );
    }

    #[test]
    fn pivot_sorts_samples_and_species_and_ignores_extra_columns() {
        let long = frame(
            &["rank", "sample_id", "species", "rel_abund"],
            &[
                &["s", "c", "Z", "1.0"],
                &["s", "a", "Y", "0.5"],
                &["s", "b", "X", "0.25"],
            ],
        );
        let wide = pivot_long(&long, "sample_id").unwrap();
        assert_eq!(wide.headers(), ["sample_id", "X", "Y", "Z"]);
        assert_eq!(wide.column(0).collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(wide.rows()[2], vec!["c", "0", "0", "1.0"]);
    }

    #[test]
    fn pivot_treats_missing_abundance_as_zero_and_skips_unkeyed_rows() {
        let long = frame(
            &["sample", "species", "rel_abund"],
            &[&["a", "X", "NA"], &["", "X", "0.4"], &["a", "", "0.1"]],
        );
        let wide = pivot_long(&long, "sample").unwrap();
        assert_eq!(wide.shape(), (1, 2));
        assert_eq!(wide.rows()[0], vec!["a", "0"]);
    }

    #[test]
    fn pivot_rejects_duplicate_pairs() {
        let long = frame(
            &["sample", "species", "rel_abund"],
            &[&["a", "X", "0.3"], &["a", "X", "0.4"]],
        );
        let err = pivot_long(&long, "sample").unwrap_err();
        assert!(matches!(err, MergeError::DuplicatePivotEntry { .. }));
    }

    #[test]
    fn pivot_keeps_non_numeric_abundance_verbatim() {
        let long = frame(
            &["sample", "species", "rel_abund"],
            &[&["a", "X", "0.3"], &["a", "Y", "<0.001"], &["b", "X", "high"]],
        );
        let wide = pivot_long(&long, "sample").unwrap();
        assert_eq!(wide.rows()[0], vec!["a", "0.3", "<0.001"]);
        assert_eq!(wide.rows()[1], vec!["b", "high", "0"]);
    }

    #[test]
    fn pivot_requires_identifier_species_and_abundance_columns() {
        let long = frame(&["sample", "species", "abundance"], &[&["a", "X", "0.3"]]);
        let err = pivot_long(&long, "sample").unwrap_err();
        assert!(matches!(err, MergeError::MissingColumns { .. }));
        assert!(err.to_string().contains("rel_abund"));

        let long = frame(&["sample", "species", "rel_abund"], &[&["a", "X", "0.3"]]);
        let err = pivot_long(&long, "run").unwrap_err();
        assert!(matches!(
            err,
            MergeError::MissingColumns { ref expected } if expected[0] == "run"
        ));
    }

    #[test]
    fn wide_tables_only_rename_the_first_column() {
        let wide = frame(&["run", "X", "Y"], &[&["r1", "0.1", "0.9"]]);
        let (layout, reshaped) = reshape(wide, TAXONOMY_ID_CANDIDATES).unwrap();
        assert_eq!(layout, Layout::Wide);
        assert_eq!(reshaped.headers(), ["sample_id", "X", "Y"]);
        assert_eq!(reshaped.rows()[0], vec!["r1", "0.1", "0.9"]);
    }
}
