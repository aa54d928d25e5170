//! Plain-text rendering of frame previews.
//!
//! Taxonomy tables can carry thousands of species columns, so previews keep
//! the first [`MAX_PREVIEW_COLUMNS`] and replace the rest with a single `...`
//! column.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::frame::Frame;

pub const MAX_PREVIEW_COLUMNS: usize = 8;
const ELLIPSIS: &str = "...";

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }
    let separator = widths
        .iter()
        .map(|w| "-".repeat((*w).max(3)))
        .collect::<Vec<_>>();

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let _ = writeln!(output, "{}", format_row(&separator, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

/// Renders the first `rows` rows, eliding columns past [`MAX_PREVIEW_COLUMNS`].
pub fn render_preview(frame: &Frame, rows: usize) -> String {
    let keep = frame.width().min(MAX_PREVIEW_COLUMNS);
    let elided = frame.width() > keep;
    let clip = |cells: &[String], filler: &str| {
        let mut clipped = cells[..keep].to_vec();
        if elided {
            clipped.push(filler.to_string());
        }
        clipped
    };
    let headers = clip(frame.headers(), ELLIPSIS);
    let body = frame
        .rows()
        .iter()
        .take(rows)
        .map(|row| clip(row.as_slice(), ""))
        .collect::<Vec<_>>();
    render_table(&headers, &body)
}

pub fn print_preview(frame: &Frame, rows: usize) {
    print!("{}", render_preview(frame, rows));
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let sanitized = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&sanitized));
            format!("{sanitized}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.truncate(line.trim_end().len());
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
