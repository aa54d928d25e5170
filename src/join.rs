use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

use crate::frame::Frame;

pub const OVERLAP_SAMPLE_ROWS: usize = 1000;
const EXAMPLE_IDS: usize = 3;
const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Identifier overlap between the two sides of an empty join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapReport {
    pub left_ids: usize,
    pub right_ids_sampled: usize,
    pub right_rows_sampled: usize,
    pub overlap: usize,
    pub left_examples: Vec<String>,
    pub right_examples: Vec<String>,
}

/// Inner join on `key`, which must name a column in both frames.
///
/// Output rows follow left-row order, with every right match for a left row
/// in right-row order, so repeated keys multiply rows. Columns are the left
/// columns followed by the right columns minus the key; shared names are
/// suffixed `_x` (left) and `_y` (right).
pub fn inner_join(left: &Frame, right: &Frame, key: &str) -> Frame {
    let (Some(left_key), Some(right_key)) = (left.column_index(key), right.column_index(key))
    else {
        return Frame::from_trusted(output_headers(left, right, None).0, Vec::new());
    };

    let right_lookup = build_right_lookup(right, right_key);
    let (headers, right_columns) = output_headers(left, right, Some(right_key));

    let mut rows = Vec::new();
    let mut matched_left = 0usize;
    for record in left.rows() {
        let Some(bucket) = right_lookup.get(record[left_key].as_str()) else {
            continue;
        };
        matched_left += 1;
        for right_row in bucket {
            let mut combined = record.clone();
            combined.extend(right_columns.iter().map(|idx| right_row[*idx].clone()));
            rows.push(combined);
        }
    }
    info!(
        "Join complete: {} output row(s), {} matched left row(s)",
        rows.len(),
        matched_left
    );
    Frame::from_trusted(headers, rows)
}

fn build_right_lookup<'a>(right: &'a Frame, key_idx: usize) -> HashMap<&'a str, Vec<&'a [String]>> {
    let mut map: HashMap<&str, Vec<&[String]>> = HashMap::new();
    for row in right.rows() {
        map.entry(row[key_idx].as_str())
            .or_default()
            .push(row.as_slice());
    }
    map
}

/// Left headers followed by the right non-key headers. A name present on both
/// sides gets `_x` on the left and `_y` on the right.
fn output_headers(
    left: &Frame,
    right: &Frame,
    right_key: Option<usize>,
) -> (Vec<String>, Vec<usize>) {
    let right_columns = (0..right.width())
        .filter(|idx| Some(*idx) != right_key)
        .collect::<Vec<_>>();
    let right_names: HashSet<&str> = right_columns
        .iter()
        .map(|idx| right.headers()[*idx].as_str())
        .collect();
    let left_names: HashSet<&str> = left.headers().iter().map(String::as_str).collect();

    let mut headers = left
        .headers()
        .iter()
        .map(|name| {
            if right_names.contains(name.as_str()) {
                format!("{name}{LEFT_SUFFIX}")
            } else {
                name.clone()
            }
        })
        .collect::<Vec<_>>();
    headers.extend(right_columns.iter().map(|idx| {
        let name = &right.headers()[*idx];
        if left_names.contains(name.as_str()) {
            format!("{name}{RIGHT_SUFFIX}")
        } else {
            name.clone()
        }
    }));

    (headers, right_columns)
}

/// Number of key values that occur on more than one row.
pub fn duplicate_keys(frame: &Frame, key: &str) -> usize {
    let Some(idx) = frame.column_index(key) else {
        return 0;
    };
    frame
        .column(idx)
        .counts()
        .values()
        .filter(|count| **count > 1)
        .count()
}

/// Logs keys repeated on either side; each repeat multiplies joined rows.
pub fn warn_on_duplicate_keys(left: &Frame, right: &Frame, key: &str) {
    for (side, frame) in [("metadata", left), ("taxonomy", right)] {
        let duplicates = duplicate_keys(frame, key);
        if duplicates > 0 {
            warn!(
                "{duplicates} '{key}' value(s) repeat in the {side} table; matching rows will be multiplied"
            );
        }
    }
}

/// Compares unique keys of `left` with those in the first `sample_rows` rows
/// of `right`. Examples are listed in first-seen order.
pub fn overlap_report(left: &Frame, right: &Frame, key: &str, sample_rows: usize) -> OverlapReport {
    let left_ids = unique_keys(left, key, usize::MAX);
    let right_ids = unique_keys(right, key, sample_rows);
    let left_set: HashSet<&str> = left_ids.iter().copied().collect();
    let overlap = right_ids.iter().filter(|id| left_set.contains(*id)).count();

    OverlapReport {
        left_ids: left_ids.len(),
        right_ids_sampled: right_ids.len(),
        right_rows_sampled: right.len().min(sample_rows),
        overlap,
        left_examples: examples(&left_ids),
        right_examples: examples(&right_ids),
    }
}

fn unique_keys<'a>(frame: &'a Frame, key: &str, limit: usize) -> Vec<&'a str> {
    match frame.column_index(key) {
        Some(idx) => frame.column(idx).take(limit).unique().collect(),
        None => Vec::new(),
    }
}

fn examples(ids: &[&str]) -> Vec<String> {
    ids.iter()
        .take(EXAMPLE_IDS)
        .map(|id| id.to_string())
        .collect()
}
