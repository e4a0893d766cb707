/*!
 * Tests for the in-memory table model
 */

use codexcel::table::{CellValue, Table};
use std::cmp::Ordering;

use crate::common::{self, text};

#[test]
fn test_from_rows_withShortRow_shouldPadWithEmptyCells() {
    let table = Table::from_rows(
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        vec![vec![CellValue::Int(1)]],
    );

    assert_eq!(table.rows()[0].len(), 3);
    assert_eq!(table.cell(0, "c"), Some(&CellValue::Empty));
}

#[test]
fn test_set_column_withNewName_shouldAppendColumn() {
    let mut table = common::sample_product_table();
    let values = vec![text("x"); table.row_count()];

    table.set_column("Extra", values);

    assert_eq!(table.columns().last().map(String::as_str), Some("Extra"));
    assert_eq!(table.columns().len(), 6);
    assert_eq!(common::column_text(&table, "Extra"), vec!["x"; 4]);
}

#[test]
fn test_set_column_withExistingName_shouldOverwriteInPlace() {
    let mut table = common::sample_product_table();
    let values = vec![text("same"); table.row_count()];

    table.set_column("BRAND_1", values);

    assert_eq!(table.columns().len(), 5);
    assert_eq!(table.column_index("BRAND_1"), Some(2));
    assert_eq!(common::column_text(&table, "BRAND_1"), vec!["same"; 4]);
}

#[test]
fn test_reorder_withPermutation_shouldMoveWholeRows() {
    let mut table = common::sample_product_table();
    table.reorder(&[3, 2, 1, 0]);

    assert_eq!(common::column_text(&table, "RCT"), vec!["10", "20", "10", "30"]);
    assert_eq!(common::column_text(&table, "BRAND_1"), vec!["Fizz", "Solo", "Crunch", "Crunch"]);
}

#[test]
fn test_sort_cmp_withMixedCells_shouldOrderNumbersTextThenEmpty() {
    assert_eq!(CellValue::Int(2).sort_cmp(&CellValue::Float(2.5)), Ordering::Less);
    assert_eq!(CellValue::Float(3.0).sort_cmp(&text("1")), Ordering::Less);
    assert_eq!(text("b").sort_cmp(&text("a")), Ordering::Greater);
    assert_eq!(text("z").sort_cmp(&CellValue::Empty), Ordering::Less);
    assert_eq!(CellValue::Empty.sort_cmp(&CellValue::Empty), Ordering::Equal);
}

#[test]
fn test_display_withNumericAndDateCells_shouldRenderSpreadsheetText() {
    assert_eq!(CellValue::Float(42.0).to_string(), "42");
    assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
    assert_eq!(CellValue::Bool(true).to_string(), "TRUE");
    assert_eq!(CellValue::Empty.to_string(), "");
    // 45000.5 is 2023-03-15 at noon
    assert_eq!(CellValue::DateTime(45000.5).to_string(), "2023-03-15 12:00:00");
}

#[test]
fn test_head_withMoreRowsThanLimit_shouldKeepFirstRows() {
    let table = common::sample_product_table();
    let head = table.head(2);

    assert_eq!(head.row_count(), 2);
    assert_eq!(head.columns(), table.columns());
    assert_eq!(head.rows(), &table.rows()[..2]);
}

#[test]
fn test_to_text_grid_withRows_shouldRenderHeaderAndOneLinePerRow() {
    let table = Table::from_rows(
        vec!["id".to_string(), "name".to_string()],
        vec![
            vec![CellValue::Int(1), text("alpha")],
            vec![CellValue::Int(22), text("b")],
        ],
    );

    let grid = table.to_text_grid();
    let lines: Vec<&str> = grid.lines().collect();

    assert_eq!(lines, vec!["id | name", "1  | alpha", "22 | b"]);
}
