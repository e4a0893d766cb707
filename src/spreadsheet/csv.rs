/*!
 * CSV codec. Cells are inferred as integer, float or text on read.
 */

use ::csv::{ReaderBuilder, Writer};

use crate::errors::{EncodingError, IngestError};
use crate::table::{CellValue, Table};

use super::unnamed_column;

fn infer_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return CellValue::Int(i);
    }
    // f64 parsing also accepts words like "inf" and "NaN"; keep those as text
    let numeric_chars = raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if numeric_chars && raw.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(f) = raw.parse::<f64>() {
            return CellValue::Float(f);
        }
    }
    CellValue::String(raw.to_string())
}

pub fn read_table(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| if h.is_empty() { unnamed_column(i) } else { h.to_string() })
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(infer_cell).collect());
    }
    Ok(table)
}

pub fn write_table(table: &Table) -> Result<Vec<u8>, EncodingError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.into_inner().map_err(|e| EncodingError::Io(e.into_error()))
}
