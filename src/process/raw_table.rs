// src/process/raw_table.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, warn};

/// Tokens that listing exports use for "no value".
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A single table value. Exports mix types freely, so every cell carries its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Type a raw CSV field: NA tokens → `Missing`, finite floats → `Number`,
    /// everything else verbatim `Text`.
    pub fn parse(raw: &str) -> Cell {
        if NA_TOKENS.contains(&raw.trim()) {
            return Cell::Missing;
        }
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Textual form of the cell; `None` for `Missing`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Number(v) => Some(v.to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Missing => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Cell::parse(raw)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

/// A table as the external source supplied it: its own column names and
/// rows of mixed cells. Every row is exactly `headers.len()` wide.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names from the header row, unmodified.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a table, padding short rows with `Missing` and cutting long ones.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let mut ragged = 0usize;
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() != width {
                    ragged += 1;
                    row.resize(width, Cell::Missing);
                }
                row
            })
            .collect();
        if ragged > 0 {
            warn!(ragged, width, "rows did not match header width; padded or truncated");
        }
        Self { headers, rows }
    }

    /// Parse delimited text with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        // Exports are not always UTF-8 (Latin-1 accents); decode lossily per field.
        let mut lossy = 0usize;
        let mut decode = |field: &[u8]| -> String {
            match std::str::from_utf8(field) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    lossy += 1;
                    String::from_utf8_lossy(field).into_owned()
                }
            }
        };

        let headers: Vec<String> = rdr
            .byte_headers()
            .context("reading CSV header row")?
            .iter()
            .map(&mut decode)
            .collect();

        let mut rows = Vec::new();
        for (idx, result) in rdr.byte_records().enumerate() {
            let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
            rows.push(record.iter().map(|f| Cell::parse(&decode(f))).collect());
        }

        if lossy > 0 {
            warn!(lossy, "fields were not valid UTF-8; replaced invalid bytes");
        }
        debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");
        Ok(Self::new(headers, rows))
    }

    #[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open CSV file: {:?}", path.as_ref()))?;
        Self::from_csv_reader(file)
            .with_context(|| format!("Failed to read CSV file: {:?}", path.as_ref()))
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.headers.len()
    }

    /// Position of the first column named exactly `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// The full value sequence of column `idx`, in row order.
    pub fn column(&self, idx: usize) -> Vec<Cell> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or(Cell::Missing))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn parse_types_cells() {
        assert_eq!(Cell::parse("1200"), Cell::Number(1200.0));
        assert_eq!(Cell::parse(" 2.5 "), Cell::Number(2.5));
        assert_eq!(Cell::parse("1,200 sqft"), Cell::Text("1,200 sqft".into()));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("N/A"), Cell::Missing);
        assert_eq!(Cell::parse("inf"), Cell::Text("inf".into()));
    }

    #[test]
    fn to_text_renders_numbers_without_trailing_zero() {
        assert_eq!(Cell::Number(1200.0).to_text().as_deref(), Some("1200"));
        assert_eq!(Cell::Number(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(Cell::Missing.to_text(), None);
    }

    #[test]
    fn csv_reader_pads_and_truncates_rows() -> Result<()> {
        crate::init_test_logging();
        let content = "Centris No.,ST,DOM\n1001,Sold,12\n1002,Active\n1003,Sold,4,extra\n";
        let table = RawTable::from_csv_reader(Cursor::new(content))?;

        assert_eq!(table.headers, vec!["Centris No.", "ST", "DOM"]);
        assert_eq!(table.num_rows(), 3);
        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert_eq!(table.rows[1][2], Cell::Missing);
        assert_eq!(table.rows[2][2], Cell::Number(4.0));
        assert_eq!(table.rows[0][1], Cell::Text("Sold".into()));
        Ok(())
    }

    #[test]
    fn quoted_fields_keep_commas() -> Result<()> {
        let content = "Address,Living Area (Imperial)\n\"12 Main St, Laval\",\"1,200 sqft\"\n";
        let table = RawTable::from_csv_reader(Cursor::new(content))?;
        assert_eq!(table.rows[0][0], Cell::Text("12 Main St, Laval".into()));
        assert_eq!(table.rows[0][1], Cell::Text("1,200 sqft".into()));
        Ok(())
    }

    #[test]
    fn latin1_bytes_are_decoded_lossily() -> Result<()> {
        crate::init_test_logging();
        let content: &[u8] = b"Address,ST,DOM\n12 Rue Saint-L\xe9onard,Sold,12\n3 Rue B,Active,4\n";
        let table = RawTable::from_csv_reader(Cursor::new(content))?;

        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.rows[0][0],
            Cell::Text("12 Rue Saint-L\u{FFFD}onard".into())
        );
        assert_eq!(table.rows[0][1], Cell::Text("Sold".into()));
        assert_eq!(table.rows[0][2], Cell::Number(12.0));
        Ok(())
    }

    #[test]
    fn from_csv_path_reads_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, "DOM,Rms\n3,7\n")?;
        let table = RawTable::from_csv_path(tmp.path())?;
        assert_eq!(table.position("Rms"), Some(1));
        assert_eq!(table.column(0), vec![Cell::Number(3.0)]);
        Ok(())
    }

    #[test]
    fn missing_file_has_context() {
        let err = RawTable::from_csv_path("/definitely/not/here.csv").unwrap_err();
        assert!(err.to_string().contains("here.csv"));
    }
}
