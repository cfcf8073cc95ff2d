//! Film list export parsing.
//!
//! A Letterboxd export starts with free-form preamble rows (export version,
//! list metadata), then a header row, then one row per film. The header is
//! found by `HeaderPattern` within the first `max_header_rows` rows; data rows
//! are keyed by the header's labels.

mod entry;
mod header;

pub use entry::FilmEntry;
pub use header::HeaderPattern;

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// One data row keyed by header label. Every header label is present; the
/// value is `None` when the row had fewer cells than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilmRow {
    cells: HashMap<String, Option<String>>,
}

impl FilmRow {
    /// Map `cells` positionally onto `header`. Surplus cells are dropped;
    /// missing cells become `None`.
    fn from_cells(header: &[String], cells: &csv::StringRecord) -> Self {
        let cells = header
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), cells.get(i).map(str::to_string)))
            .collect();
        Self { cells }
    }

    /// Value of column `label`, if the column exists and the row filled it.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells.get(label).and_then(|v| v.as_deref())
    }

    pub fn contains_column(&self, label: &str) -> bool {
        self.cells.contains_key(label)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

/// A film list split into its three sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    /// Rows before the header, verbatim.
    pub preamble: Vec<Vec<String>>,
    /// The header row, or `None` if it was not found within the scan window.
    pub header: Option<Vec<String>>,
    /// Data rows after the header. Empty when `header` is `None`.
    pub films: Vec<FilmRow>,
}

impl ParsedList {
    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Film entries for rows that carry a name and a URL. Returns the entries
    /// and the number of rows skipped for lacking either.
    pub fn entries(&self) -> (Vec<FilmEntry>, usize) {
        let mut skipped = 0;
        let entries = self
            .films
            .iter()
            .filter_map(|row| {
                let entry = FilmEntry::from_row(row);
                if entry.is_none() {
                    skipped += 1;
                }
                entry
            })
            .collect();
        (entries, skipped)
    }
}

/// Parses `path` as a film list. Fails with `Error::Io` if the file cannot be
/// opened; a file without a recognizable header yields `header: None`.
pub fn parse(path: &Path, pattern: &HeaderPattern, max_header_rows: usize) -> Result<ParsedList> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("cannot open {}", path.display()), e))?;
    let parsed = parse_reader(file, pattern, max_header_rows)?;
    tracing::debug!(
        path = %path.display(),
        preamble_rows = parsed.preamble.len(),
        header_found = parsed.has_header(),
        films = parsed.films.len(),
        "parsed film list"
    );
    Ok(parsed)
}

/// Like [`parse`] but reads from any reader.
///
/// The header window counts physical rows the way a line-oriented reader
/// sees them: blank lines are rows too and land in `preamble` as empty rows.
pub fn parse_reader<R: io::Read>(
    mut reader: R,
    pattern: &HeaderPattern,
    max_header_rows: usize,
) -> Result<ParsedList> {
    let mut input = Vec::new();
    reader
        .read_to_end(&mut input)
        .map_err(|e| Error::io("cannot read film list", e))?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input.as_slice());

    let mut parsed = ParsedList::default();
    let mut record = csv::StringRecord::new();
    let mut rows_seen = 0;

    while parsed.header.is_none() && rows_seen < max_header_rows {
        let start = rdr.position().byte() as usize;
        let found = rdr.read_record(&mut record)?;
        // csv drops blank lines silently; they still use up the window.
        for _ in 0..blank_rows(&input, start) {
            if rows_seen == max_header_rows {
                break;
            }
            parsed.preamble.push(Vec::new());
            rows_seen += 1;
        }
        if !found || rows_seen == max_header_rows {
            break;
        }
        rows_seen += 1;

        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        if pattern.matches_row(&cells) {
            parsed.header = Some(cells);
        } else {
            parsed.preamble.push(cells);
        }
    }

    let Some(header) = parsed.header.as_ref() else {
        return Ok(parsed);
    };
    while rdr.read_record(&mut record)? {
        parsed.films.push(FilmRow::from_cells(header, &record));
    }
    Ok(parsed)
}

/// Number of blank lines starting at byte `from`, where the previous record
/// ended. A `\n` completing the previous record's `\r\n` is not a blank line.
fn blank_rows(input: &[u8], from: usize) -> usize {
    let mut i = from;
    if i > 0 && input.get(i - 1) == Some(&b'\r') && input.get(i) == Some(&b'\n') {
        i += 1;
    }
    let mut rows = 0;
    while let Some(&b) = input.get(i) {
        match b {
            b'\n' => i += 1,
            b'\r' => {
                i += 1;
                if input.get(i) == Some(&b'\n') {
                    i += 1;
                }
            }
            _ => break,
        }
        rows += 1;
    }
    rows
}

/// Parses `path` and requires a header row, turning its absence into
/// `Error::Format` with the format-example help text.
pub fn parse_required(
    path: &Path,
    pattern: &HeaderPattern,
    max_header_rows: usize,
) -> Result<ParsedList> {
    let parsed = parse(path, pattern, max_header_rows)?;
    if !parsed.has_header() {
        return Err(Error::format(path, pattern.labels(), max_header_rows));
    }
    Ok(parsed)
}

/// Explains the expected layout of the export.
pub fn format_help(labels: &[String], max_header_rows: usize) -> String {
    const SAMPLE: [(&str, &str, &str); 3] = [
        ("Amélie", "2001", "https://boxd.it/2aUc"),
        ("RRR", "2022", "https://boxd.it/ljDs"),
        ("Oldboy", "2003", "https://boxd.it/29R2"),
    ];

    let mut columns: Vec<&str> = labels.iter().map(String::as_str).collect();
    if columns.is_empty() {
        columns = vec!["Name", "URL"];
    }
    let cell = |label: &str, row: (&str, &str, &str)| -> String {
        match label {
            "Name" => row.0.to_string(),
            "Year" => row.1.to_string(),
            "URL" => row.2.to_string(),
            _ => "...".to_string(),
        }
    };
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| {
            SAMPLE
                .iter()
                .map(|r| cell(*c, *r).chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(3)
        })
        .collect();

    let line = |values: Vec<String>| -> String {
        let inner = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!(" {:<width$} ", v, width = *w))
            .collect::<Vec<_>>()
            .join("│ ... │");
        format!("│ ... │{}│ ... │", inner)
    };
    let rule = {
        let inner = widths
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("┼─────┼");
        format!("├─────┼{}┼─────┤", inner)
    };

    let mut rows = vec![
        line(columns.iter().map(|_| "...".to_string()).collect()),
        rule.clone(),
        line(columns.iter().map(|c| c.to_string()).collect()),
    ];
    for sample in SAMPLE {
        rows.push(rule.clone());
        rows.push(line(columns.iter().map(|c| cell(*c, sample)).collect()));
    }

    let quoted = columns
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "\nMake sure the column labels {quoted} occur within the first {max_header_rows} lines of your csv file.\n\n\
         The expected format looks similar to this (the columns can be in any order):\n\n{}\n\n\
         Check your csv file and try again.",
        rows.join("\n")
    )
}
