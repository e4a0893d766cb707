/*!
 * Office Open XML workbook codec.
 */

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use log::debug;
use rust_xlsxwriter::{Format, Workbook};
use std::io::Cursor;

use crate::errors::{EncodingError, IngestError};
use crate::table::{CellValue, Table};

use super::unnamed_column;

/// Maximum rows in a worksheet, header included
const MAX_ROWS: usize = 1_048_576;

/// Maximum columns in a worksheet
const MAX_COLUMNS: usize = 16_384;

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        // Formula errors such as #N/A carry no value
        Data::Error(_) => CellValue::Empty,
    }
}

/// Read the first worksheet of a workbook
pub fn read_table(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => unnamed_column(i),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(to_cell).collect());
    }

    debug!(
        "Read worksheet with {} columns and {} rows",
        table.columns().len(),
        table.row_count()
    );
    Ok(table)
}

/// Write a table into a single-sheet workbook
pub fn write_table(table: &Table) -> Result<Vec<u8>, EncodingError> {
    if table.row_count() + 1 > MAX_ROWS {
        return Err(EncodingError::OutOfRange(format!(
            "{} rows exceed the worksheet limit of {}",
            table.row_count(),
            MAX_ROWS - 1
        )));
    }
    if table.columns().len() > MAX_COLUMNS {
        return Err(EncodingError::OutOfRange(format!(
            "{} columns exceed the worksheet limit of {}",
            table.columns().len(),
            MAX_COLUMNS
        )));
    }

    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                // Blank and empty-text cells are both left unwritten
                CellValue::Empty => {}
                CellValue::String(s) if s.is_empty() => {}
                CellValue::String(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                CellValue::Int(i) => {
                    worksheet.write_number(row_num, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row_num, col, *f)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col, *b)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet.write_number_with_format(row_num, col, *serial, &datetime_format)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
