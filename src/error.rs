//! Typed failures raised by the loader and the merge pipeline.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Reading {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Could not read {path:?} ({reason}). Check whether the file is corrupted or uses an \
         unsupported compression scheme (e.g. zip instead of gzip)"
    )]
    Unreadable { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("No BMI column found in {path:?}")]
    MissingBmiColumn { path: PathBuf },

    #[error("{path:?} has no columns")]
    EmptyHeader { path: PathBuf },

    #[error("Long-format taxonomy requires columns {expected:?}")]
    MissingColumns { expected: Vec<String> },

    #[error("Duplicate entry for sample '{sample}' and species '{species}'; cannot pivot")]
    DuplicatePivotEntry { sample: String, species: String },
}
