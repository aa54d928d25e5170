use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    join::OVERLAP_SAMPLE_ROWS,
    pipeline::{DEFAULT_METADATA_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_TAXONOMY_PATH},
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Merge sample metadata (BMI) with taxonomy abundance tables",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Join metadata BMI values with per-species abundances into one CSV
    Merge(MergeArgs),
    /// Report how a table is read and which columns the heuristics pick
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Sample metadata table (TSV, optionally gzip-compressed)
    #[arg(long, default_value = DEFAULT_METADATA_PATH)]
    pub metadata: PathBuf,
    /// Taxonomy abundance table in long or wide form (TSV, optionally gzip-compressed)
    #[arg(long, default_value = DEFAULT_TAXONOMY_PATH)]
    pub taxonomy: PathBuf,
    /// Destination CSV file (overwritten)
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,
    /// Metadata identifier columns to try, in priority order
    #[arg(long = "id-columns", value_delimiter = ',')]
    pub id_columns: Vec<String>,
    /// Taxonomy identifier columns to try when pivoting, in priority order
    #[arg(long = "taxonomy-id-columns", value_delimiter = ',')]
    pub taxonomy_id_columns: Vec<String>,
    /// Character encoding of both inputs (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Taxonomy rows sampled when diagnosing an empty merge
    #[arg(long = "overlap-sample", default_value_t = OVERLAP_SAMPLE_ROWS)]
    pub overlap_sample: usize,
    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Table to inspect (TSV, optionally gzip-compressed)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 5)]
    pub rows: usize,
    /// Character encoding of the input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
