/*!
 * Column normalization: schema check, ordering by the record-creation-time
 * key, and the derived brand identity column.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ColumnConfig;
use crate::errors::SchemaError;
use crate::table::{CellValue, Table};

/// Separator between brand fields in the identity column
pub const IDENTITY_SEPARATOR: char = ';';

static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(";+").expect("valid separator regex"));

/// Check that every required column is present.
///
/// Reports all missing columns, in the order given, not just the first one.
pub fn validate_columns(table: &Table, required: &[&str]) -> Result<(), SchemaError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}

/// Stable ascending sort of the rows by one key column.
///
/// Rows with equal keys keep their relative order; empty keys go last.
pub fn sort_by_key(table: &mut Table, key: &str) -> Result<(), SchemaError> {
    let idx = table.column_index(key).ok_or_else(|| SchemaError {
        missing: vec![key.to_string()],
    })?;

    let mut order: Vec<usize> = (0..table.row_count()).collect();
    let rows = table.rows();
    // slice::sort_by is stable
    order.sort_by(|&a, &b| rows[a][idx].sort_cmp(&rows[b][idx]));
    table.reorder(&order);
    Ok(())
}

/// Join brand fields into one identity string.
///
/// Missing fields count as empty text; runs of separators collapse to one
/// and separators at either end are dropped, so an all-empty row yields an
/// empty string and a single field comes back unchanged.
pub fn concatenate_identity(fields: &[&CellValue]) -> String {
    let joined = fields
        .iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(";");
    SEPARATOR_RUN
        .replace_all(&joined, ";")
        .trim_matches(IDENTITY_SEPARATOR)
        .to_string()
}

/// Append (or overwrite) the identity column built from `fields`
pub fn add_identity_column(table: &mut Table, fields: &[&str], name: &str) -> Result<(), SchemaError> {
    validate_columns(table, fields)?;
    let indices: Vec<usize> = fields
        .iter()
        .filter_map(|field| table.column_index(field))
        .collect();

    let values: Vec<CellValue> = table
        .rows()
        .iter()
        .map(|row| {
            let cells: Vec<&CellValue> = indices.iter().map(|&i| &row[i]).collect();
            CellValue::String(concatenate_identity(&cells))
        })
        .collect();

    table.set_column(name, values);
    Ok(())
}

/// Validate, sort and add the identity column in one pass
pub fn normalize(mut table: Table, columns: &ColumnConfig) -> Result<Table, SchemaError> {
    validate_columns(&table, &columns.required())?;
    sort_by_key(&mut table, &columns.record_time)?;
    add_identity_column(&mut table, &columns.brand_fields(), &columns.concatenated)?;
    Ok(table)
}
