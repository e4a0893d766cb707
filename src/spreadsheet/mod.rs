/*!
 * Spreadsheet codecs.
 *
 * Decoding turns an uploaded byte stream into a [`Table`]; encoding turns the
 * processed table back into a downloadable byte buffer. Both directions use
 * the same codec so that a produced file can be read back unchanged, apart
 * from the type coercions of the format itself.
 *
 * - `xlsx`: Office Open XML workbooks (`calamine` / `rust_xlsxwriter`)
 * - `csv`: comma separated values
 */

use bytes::Bytes;
use std::path::Path;

use crate::errors::{EncodingError, IngestError};
use crate::table::Table;

pub mod csv;
pub mod xlsx;

/// File name offered for the processed download
pub const DOWNLOAD_FILE_NAME: &str = "Processed_File.xlsx";

/// MIME type of macro-free Office Open XML workbooks
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// MIME type of CSV files
pub const CSV_MIME_TYPE: &str = "text/csv";

/// Supported tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadsheetFormat {
    #[default]
    Xlsx,
    Csv,
}

impl SpreadsheetFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Xlsx),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Xlsx => XLSX_MIME_TYPE,
            Self::Csv => CSV_MIME_TYPE,
        }
    }
}

/// Decode an uploaded spreadsheet into a table (first row = headers)
pub fn decode(bytes: &[u8], format: SpreadsheetFormat) -> Result<Table, IngestError> {
    match format {
        SpreadsheetFormat::Xlsx => xlsx::read_table(bytes),
        SpreadsheetFormat::Csv => csv::read_table(bytes),
    }
}

/// Encode a table into a byte buffer with a header row and no index column
pub fn encode(table: &Table, format: SpreadsheetFormat) -> Result<Bytes, EncodingError> {
    let buffer = match format {
        SpreadsheetFormat::Xlsx => xlsx::write_table(table)?,
        SpreadsheetFormat::Csv => csv::write_table(table)?,
    };
    Ok(Bytes::from(buffer))
}

/// Header name used for a blank header cell at `index`
pub(crate) fn unnamed_column(index: usize) -> String {
    format!("Unnamed: {}", index)
}
