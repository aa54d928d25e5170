//! I/O utilities for reading and writing delimited tables.
//!
//! All file I/O in metalog-merge flows through this module. It provides:
//!
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8. A
//!   decode failure is the signal the loader uses to suspect compression.
//! - **Decompression**: gzip (including multi-member streams) via `flate2`.
//! - **Parsing**: tab-separated text into a [`Frame`].
//! - **Writing**: comma-separated output with a header row and no index.

use std::{
    fs::File,
    io::{BufWriter, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use flate2::read::MultiGzDecoder;

use crate::frame::Frame;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(bytes);
    let mut inflated = Vec::new();
    decoder
        .read_to_end(&mut inflated)
        .context("Decompressing gzip stream")?;
    Ok(inflated)
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Parses decoded text with a header row into a [`Frame`].
///
/// Short rows are padded with empty (missing) cells; a row wider than the
/// header is an error.
pub fn parse_delimited(text: &str, delimiter: u8) -> Result<Frame> {
    let mut reader = open_csv_reader(text.as_bytes(), delimiter, true);
    let headers = reader
        .headers()
        .context("Reading header row")?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(anyhow!("No columns to parse from input"));
    }
    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let line = row_idx + 2;
        let record = record.with_context(|| format!("Reading row {line}"))?;
        if record.len() > headers.len() {
            return Err(anyhow!(
                "Reading row {line}: expected {} field(s), saw {}",
                headers.len(),
                record.len()
            ));
        }
        let mut row = record.iter().map(str::to_string).collect::<Vec<_>>();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    Ok(Frame::from_trusted(headers, rows))
}

pub fn open_csv_writer(path: &Path, delimiter: u8) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(BufWriter::new(file)))
}

/// Writes the header row followed by every row, overwriting `path`.
pub fn write_frame(path: &Path, frame: &Frame, delimiter: u8) -> Result<()> {
    let mut writer = open_csv_writer(path, delimiter)?;
    writer
        .write_record(frame.headers())
        .context("Writing header row")?;
    for (idx, row) in frame.rows().iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing row {}", idx + 1))?;
    }
    writer.flush().with_context(|| format!("Flushing {path:?}"))?;
    Ok(())
}
