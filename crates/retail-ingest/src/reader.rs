//! Encoding-resolving CSV reader.
//!
//! Each candidate encoding gets a fresh read of the file. The first encoding
//! that decodes the bytes without error wins; parsing then happens exactly
//! once, and a parse failure is final.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::Path;

use encoding_rs::Encoding;
use polars::prelude::{CsvReadOptions, DataFrame, DataType, NullValues, PolarsResult, SerReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::encoding::{EncodingChain, decode_strict};
use crate::error::{IngestError, Result};
use crate::source::ByteSource;

/// Cell contents read as missing, on top of empty fields.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-NaN", "-nan", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a",
    "nan", "null",
];

/// Options controlling how a file is decoded and parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Encodings to try, in priority order.
    pub encodings: EncodingChain,
    /// Rows scanned for type inference; `None` scans the whole file.
    pub infer_schema_rows: Option<usize>,
    /// Literal cell values treated as missing.
    pub null_markers: Vec<String>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            encodings: EncodingChain::default(),
            infer_schema_rows: None,
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|marker| (*marker).to_string())
                .collect(),
        }
    }
}

/// A parsed table plus the encoding that decoded it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: DataFrame,
    pub encoding: &'static Encoding,
}

#[derive(Debug, Clone)]
pub struct CsvReader<S> {
    source: S,
    options: ReaderOptions,
}

impl<S: ByteSource> CsvReader<S> {
    pub fn new(source: S, options: ReaderOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Load `path` as a table.
    ///
    /// # Errors
    ///
    /// - `UnreadableFile` / `FileTooLarge` when the file cannot be read
    /// - `UndecodableFile` when no configured encoding decodes it
    /// - `MalformedTable` when the decoded text is not a valid table
    pub fn load(&self, path: &Path) -> Result<LoadedTable> {
        for &encoding in self.options.encodings.encodings() {
            let bytes = self.source.read_bytes(path)?;
            let Some(text) = decode_strict(&bytes, encoding) else {
                trace!(path = %path.display(), encoding = encoding.name(), "decode failed");
                continue;
            };
            debug!(
                path = %path.display(),
                encoding = encoding.name(),
                bytes = bytes.len(),
                "decoded file"
            );
            let table = parse_csv_text(text, &self.options).map_err(|error| {
                IngestError::MalformedTable {
                    path: path.to_path_buf(),
                    encoding: encoding.name().to_string(),
                    message: error.to_string(),
                }
            })?;
            return Ok(LoadedTable { table, encoding });
        }

        Err(IngestError::UndecodableFile {
            path: path.to_path_buf(),
            tried: self
                .options
                .encodings
                .names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Parse already-decoded CSV text. Blank input is an empty table.
///
/// Columns the parser would read as booleans keep their source text, and
/// repeated headers are named `<header>_<n>` instead of the parser's
/// `_duplicated_` form.
pub fn parse_csv_text(text: String, options: &ReaderOptions) -> PolarsResult<DataFrame> {
    if text.trim().is_empty() {
        return Ok(DataFrame::empty());
    }
    let bytes = text.into_bytes();
    let mut table = read_csv(&bytes, options, options.infer_schema_rows)?;

    let boolean: Vec<usize> = table
        .get_columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| column.dtype() == &DataType::Boolean)
        .map(|(idx, _)| idx)
        .collect();
    if !boolean.is_empty() {
        // Infer nothing: every column comes back as its source text.
        let raw = read_csv(&bytes, options, Some(0))?;
        let mut columns = table.take_columns();
        for idx in boolean {
            let name = columns[idx].name().clone();
            columns[idx] = raw.get_columns()[idx].clone().with_name(name);
        }
        table = DataFrame::new(columns)?;
    }

    restore_repeated_headers(&mut table, &bytes)?;
    Ok(table)
}

fn read_csv(
    bytes: &[u8],
    options: &ReaderOptions,
    infer_rows: Option<usize>,
) -> PolarsResult<DataFrame> {
    let null_values = if options.null_markers.is_empty() {
        None
    } else {
        Some(NullValues::AllColumns(
            options
                .null_markers
                .iter()
                .map(|marker| marker.as_str().into())
                .collect(),
        ))
    };
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_rows)
        .map_parse_options(move |parse| parse.with_null_values(null_values.clone()))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

/// The header row exactly as written, one entry per column.
fn source_headers(bytes: &[u8]) -> PolarsResult<Vec<Option<String>>> {
    let header = CsvReadOptions::default()
        .with_has_header(false)
        .with_n_rows(Some(1))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    header
        .get_columns()
        .iter()
        .map(|column| Ok(column.str()?.get(0).map(str::to_string)))
        .collect()
}

fn restore_repeated_headers(table: &mut DataFrame, bytes: &[u8]) -> PolarsResult<()> {
    let names: Vec<String> = table
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    if !names.iter().any(|name| name.contains("_duplicated_")) {
        return Ok(());
    }
    let headers = source_headers(bytes)?;
    let mut taken: BTreeSet<String> = names.iter().cloned().collect();
    for (name, header) in names.iter().zip(headers) {
        let Some(header) = header else {
            continue;
        };
        if !name.starts_with(&format!("{header}_duplicated_")) {
            continue;
        }
        let mut suffix = 2usize;
        let renamed = loop {
            let candidate = format!("{header}_{suffix}");
            if !taken.contains(&candidate) {
                break candidate;
            }
            suffix += 1;
        };
        trace!(from = %name, to = %renamed, "renamed repeated header");
        taken.remove(name);
        taken.insert(renamed.clone());
        table.rename(name, renamed.into())?;
    }
    Ok(())
}
