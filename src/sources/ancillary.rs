use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::btree_map::Entry;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use walkdir::WalkDir;

use super::{AncillaryExtraction, AncillarySource, SourceError};
use crate::metadata::{FieldRecord, SourceValue};

/// Date layouts accepted in table file names
const TABLE_DATE_FORMATS: [&str; 2] = ["%Y%m%d", "%Y-%m-%d"];

/// Category and measurement date of an ancillary table, parsed from a
/// `<Category>_<date>` file stem
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AncillaryTableKey {
    /// Category, e.g. `Height`
    pub category: String,
    /// Measurement date
    pub date: NaiveDate,
}

impl AncillaryTableKey {
    /// Key for `category` measured on `date`
    pub fn new(category: &str, date: NaiveDate) -> Self {
        Self {
            category: category.to_string(),
            date,
        }
    }

    /// Parse a file stem such as `Height_20170608` or `SPAD_2017-06-08`.
    ///
    /// The date is taken after the last underscore.
    pub fn parse(stem: &str) -> Result<Self, SourceError> {
        let invalid = || SourceError::InvalidTableKey(stem.to_string());

        let (category, date) = stem.rsplit_once('_').ok_or_else(invalid)?;
        if category.is_empty() {
            return Err(invalid());
        }
        let date = TABLE_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
            .ok_or_else(invalid)?;

        Ok(Self::new(category, date))
    }

    /// Date in the normalized `%Y%m%d` form used in placeholder names
    pub fn date_label(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }
}

impl fmt::Display for AncillaryTableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.category, self.date_label())
    }
}

/// One plot's measurements in an ancillary table
#[derive(Debug, Clone, PartialEq)]
pub struct AncillaryRow {
    plot_id: String,
    fields: FieldRecord,
}

impl AncillaryRow {
    /// Build a row from its plot id and measurement fields
    pub fn new(plot_id: &str, fields: FieldRecord) -> Self {
        Self {
            plot_id: plot_id.to_string(),
            fields,
        }
    }

    /// Plot identifier from the leading column
    pub fn plot_id(&self) -> &str {
        &self.plot_id
    }

    /// Measurement fields keyed by column header; empty cells are absent
    pub fn fields(&self) -> &FieldRecord {
        &self.fields
    }
}

/// A parsed ancillary CSV table.
///
/// The first column holds the plot identity; the remaining headers name the
/// measurement columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AncillaryTable {
    columns: Vec<String>,
    rows: Vec<AncillaryRow>,
}

impl AncillaryTable {
    /// Build a table from measurement column names and rows
    pub fn new(columns: Vec<String>, rows: Vec<AncillaryRow>) -> Self {
        Self { columns, rows }
    }

    /// Parse a headed CSV table
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if headers.len() < 2 {
            return Err(SourceError::InvalidFormat(
                "ancillary table needs a plot column and at least one measurement column".to_string(),
            ));
        }
        let columns: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut rows = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record?;
            let plot_id = record.get(0).unwrap_or_default();
            if plot_id.is_empty() {
                warn!("Ancillary row {} has no plot id, skipping", line + 2);
                continue;
            }

            let fields: FieldRecord = columns
                .iter()
                .zip(record.iter().skip(1))
                .filter_map(|(column, cell)| SourceValue::from_cell(cell).map(|v| (column.clone(), v)))
                .collect();
            rows.push(AncillaryRow::new(plot_id, fields));
        }

        Ok(Self { columns, rows })
    }

    /// Measurement column names in file order, plot column excluded
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in file order
    pub fn rows(&self) -> &[AncillaryRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads every `<Category>_<date>.csv` table below a directory
#[derive(Debug, Clone, Copy, Default)]
pub struct AncillaryDirectory;

impl AncillaryDirectory {
    /// Create a directory reader
    pub fn new() -> Self {
        Self
    }
}

impl AncillarySource for AncillaryDirectory {
    /// Files whose stem is not a valid table key are skipped with a warning;
    /// when two files share a key the first readable one in path order is
    /// kept. Unreadable tables are collected as failures and the walk goes on.
    fn extract_tables(&self, directory: &Path) -> Result<AncillaryExtraction, SourceError> {
        let mut extraction = AncillaryExtraction::default();

        for entry in WalkDir::new(directory).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                // The root itself must be listable
                Err(e) if e.depth() == 0 => return Err(io::Error::from(e).into()),
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| directory.to_path_buf());
                    warn!("Skipping {}: {}", path.display(), e);
                    extraction.failures.push((path, io::Error::from(e).into()));
                    continue;
                }
            };
            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !entry.file_type().is_file() || !is_csv {
                continue;
            }

            let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
            let key = match AncillaryTableKey::parse(&stem) {
                Ok(key) => key,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };

            match extraction.tables.entry(key) {
                Entry::Occupied(existing) => {
                    warn!("Skipping {}: table {} already read", path.display(), existing.key());
                }
                Entry::Vacant(slot) => match read_table(path) {
                    Ok(table) => {
                        debug!("Read {} rows from {}", table.len(), path.display());
                        slot.insert(table);
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        extraction.failures.push((path.to_path_buf(), e));
                    }
                },
            }
        }

        Ok(extraction)
    }
}

fn read_table(path: &Path) -> Result<AncillaryTable, SourceError> {
    AncillaryTable::from_reader(BufReader::new(File::open(path)?))
}
