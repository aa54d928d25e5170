//! Robust table loading for files that may be gzip-compressed regardless of
//! their extension.
//!
//! Loading happens in two steps. [`classify_bytes`] decides how the raw bytes
//! should be decoded and returns a tagged [`Classification`]; parsing then runs
//! on the decoded text. A plain-text file that decodes but fails to parse gets
//! one more attempt through gzip before the load is declared unreadable.

use std::{fmt, fs, path::Path};

use anyhow::Result;
use encoding_rs::Encoding;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    error::LoadError,
    frame::Frame,
    io_utils::{self, DEFAULT_TSV_DELIMITER},
};

/// How the bytes of a file turned out to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    PlainText(String),
    GzipCompressed(String),
    Unreadable(String),
}

/// The format a successfully loaded file was read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    PlainText,
    GzipCompressed,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::PlainText => write!(f, "plain text"),
            SourceFormat::GzipCompressed => write!(f, "gzip-compressed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub frame: Frame,
    pub format: SourceFormat,
}

pub fn classify_bytes(bytes: &[u8], encoding: &'static Encoding) -> Classification {
    let decode_err = match io_utils::decode_bytes(bytes, encoding) {
        Ok(text) => return Classification::PlainText(text),
        Err(err) => err,
    };
    warn!("{decode_err}. The file is likely compressed (gzip)");
    warn!("Retrying with gzip decompression...");
    match decode_gzip(bytes, encoding) {
        Ok(text) => Classification::GzipCompressed(text),
        Err(err) => {
            warn!("Failed with gzip decompression too: {err:#}");
            Classification::Unreadable(format!("{err:#}"))
        }
    }
}

pub fn load_table(path: &Path, encoding: &'static Encoding) -> Result<LoadedTable, LoadError> {
    info!("Loading {}...", path.display());
    let bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let unreadable = |reason: String| LoadError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    match classify_bytes(&bytes, encoding) {
        Classification::PlainText(text) => {
            let plain_err = match io_utils::parse_delimited(&text, DEFAULT_TSV_DELIMITER) {
                Ok(frame) => {
                    return Ok(LoadedTable {
                        frame,
                        format: SourceFormat::PlainText,
                    });
                }
                Err(err) => err,
            };
            warn!("Parsing as plain text failed: {plain_err:#}");
            warn!("Retrying with gzip decompression just in case...");
            decode_gzip(&bytes, encoding)
                .and_then(|text| io_utils::parse_delimited(&text, DEFAULT_TSV_DELIMITER))
                .map(|frame| LoadedTable {
                    frame,
                    format: SourceFormat::GzipCompressed,
                })
                .map_err(|gzip_err| {
                    debug!("Gzip retry for {path:?} failed: {gzip_err:#}");
                    unreadable(format!("{plain_err:#}"))
                })
        }
        Classification::GzipCompressed(text) => {
            io_utils::parse_delimited(&text, DEFAULT_TSV_DELIMITER)
                .map(|frame| LoadedTable {
                    frame,
                    format: SourceFormat::GzipCompressed,
                })
                .map_err(|err| unreadable(format!("gzip content failed to parse: {err:#}")))
        }
        Classification::Unreadable(reason) => Err(unreadable(reason)),
    }
}

fn decode_gzip(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let inflated = io_utils::gunzip(bytes)?;
    io_utils::decode_bytes(&inflated, encoding)
}
