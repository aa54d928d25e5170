//! The merge pipeline: load, clean, reshape, join, then write or diagnose.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::{info, warn};
use serde::Serialize;

use crate::{
    cli::MergeArgs,
    columns::{self, ID_COLUMN, METADATA_ID_CANDIDATES, TAXONOMY_ID_CANDIDATES},
    io_utils::{self, DEFAULT_CSV_DELIMITER},
    join::{self, OVERLAP_SAMPLE_ROWS, OverlapReport},
    layout::{self, Layout},
    loader::{self, SourceFormat},
    metadata,
};

pub const DEFAULT_METADATA_PATH: &str = "../Data/human_extended_wide_2025-12-14.tsv";
pub const DEFAULT_TAXONOMY_PATH: &str = "../Data/human_metaphlan4_species_2025-12-14.tsv";
pub const DEFAULT_OUTPUT_PATH: &str = "../Data/metalog_subset.csv";

#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub metadata: PathBuf,
    pub taxonomy: PathBuf,
    pub output: PathBuf,
    pub metadata_id_candidates: Vec<String>,
    pub taxonomy_id_candidates: Vec<String>,
    pub encoding: &'static Encoding,
    pub overlap_sample_rows: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            metadata: PathBuf::from(DEFAULT_METADATA_PATH),
            taxonomy: PathBuf::from(DEFAULT_TAXONOMY_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            metadata_id_candidates: to_owned_list(METADATA_ID_CANDIDATES),
            taxonomy_id_candidates: to_owned_list(TAXONOMY_ID_CANDIDATES),
            encoding: UTF_8,
            overlap_sample_rows: OVERLAP_SAMPLE_ROWS,
        }
    }
}

impl MergeConfig {
    pub fn from_args(args: &MergeArgs) -> Result<Self> {
        let mut config = Self {
            metadata: args.metadata.clone(),
            taxonomy: args.taxonomy.clone(),
            output: args.output.clone(),
            encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
            overlap_sample_rows: args.overlap_sample,
            ..Self::default()
        };
        let metadata_ids = columns::parse_candidate_list(&args.id_columns);
        if !metadata_ids.is_empty() {
            config.metadata_id_candidates = metadata_ids;
        }
        let taxonomy_ids = columns::parse_candidate_list(&args.taxonomy_id_columns);
        if !taxonomy_ids.is_empty() {
            config.taxonomy_id_candidates = taxonomy_ids;
        }
        Ok(config)
    }
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    Merged {
        rows: usize,
        columns: usize,
        output: PathBuf,
    },
    Empty {
        overlap: OverlapReport,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    pub metadata: PathBuf,
    pub metadata_format: SourceFormat,
    pub metadata_id_column: String,
    pub metadata_id_fallback: bool,
    pub bmi_column: String,
    pub metadata_rows: usize,
    pub samples_with_bmi: usize,
    pub taxonomy: PathBuf,
    pub taxonomy_format: SourceFormat,
    pub taxonomy_layout: Layout,
    pub taxonomy_shape: (usize, usize),
    pub outcome: MergeOutcome,
}

impl MergeSummary {
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating summary file {path:?}"))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).context("Writing summary JSON")
    }
}

pub fn run(config: &MergeConfig) -> Result<MergeSummary> {
    let meta = loader::load_table(&config.metadata, config.encoding)?;
    let cleaned = metadata::clean_metadata(
        &meta.frame,
        &config.metadata,
        &config.metadata_id_candidates,
    )?;

    let tax = loader::load_table(&config.taxonomy, config.encoding)?;
    info!("Taxonomy columns: {:?}", tax.frame.headers());
    let (taxonomy_layout, taxonomy) = layout::reshape(tax.frame, &config.taxonomy_id_candidates)
        .with_context(|| format!("Reshaping taxonomy from {:?}", config.taxonomy))?;

    info!("Merging metadata and taxonomy...");
    join::warn_on_duplicate_keys(&cleaned.frame, &taxonomy, ID_COLUMN);
    let merged = join::inner_join(&cleaned.frame, &taxonomy, ID_COLUMN);
    info!("Final merged dataset size: {} samples", merged.len());

    let outcome = if merged.is_empty() {
        warn!("The merged dataset is empty!");
        warn!("Checking for ID overlap...");
        let overlap = join::overlap_report(
            &cleaned.frame,
            &taxonomy,
            ID_COLUMN,
            config.overlap_sample_rows,
        );
        warn!(
            "{} unique metadata ID(s), {} unique taxonomy ID(s) in the first {} row(s), {} shared",
            overlap.left_ids, overlap.right_ids_sampled, overlap.right_rows_sampled, overlap.overlap
        );
        warn!("Example metadata IDs: {:?}", overlap.left_examples);
        warn!("Example taxonomy IDs: {:?}", overlap.right_examples);
        warn!("No output written to {:?}", config.output);
        MergeOutcome::Empty { overlap }
    } else {
        info!("Saving to {}...", config.output.display());
        io_utils::write_frame(&config.output, &merged, DEFAULT_CSV_DELIMITER)
            .with_context(|| format!("Writing merged table to {:?}", config.output))?;
        info!("Done!");
        MergeOutcome::Merged {
            rows: merged.len(),
            columns: merged.width(),
            output: config.output.clone(),
        }
    };

    Ok(MergeSummary {
        metadata: config.metadata.clone(),
        metadata_format: meta.format,
        metadata_id_column: cleaned.id_column,
        metadata_id_fallback: cleaned.id_fallback,
        bmi_column: cleaned.bmi_column,
        metadata_rows: cleaned.rows_before,
        samples_with_bmi: cleaned.frame.len(),
        taxonomy: config.taxonomy.clone(),
        taxonomy_format: tax.format,
        taxonomy_layout,
        taxonomy_shape: taxonomy.shape(),
        outcome,
    })
}
