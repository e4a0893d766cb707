/*!
 * Tests for schema validation, sorting and the identity column
 */

use codexcel::app_config::ColumnConfig;
use codexcel::normalizer::{self, concatenate_identity};
use codexcel::table::{CellValue, Table};

use crate::common::{self, product_row, text};

#[test]
fn test_validate_columns_withAllColumns_shouldSucceed() {
    let table = common::sample_product_table();
    let columns = ColumnConfig::default();

    assert!(normalizer::validate_columns(&table, &columns.required()).is_ok());
}

#[test]
fn test_validate_columns_withMissingColumns_shouldListEveryMissingName() {
    let table = Table::new(vec!["RCT".to_string(), "BRAND_1".to_string()]);
    let columns = ColumnConfig::default();

    let err = normalizer::validate_columns(&table, &columns.required()).unwrap_err();

    assert_eq!(err.missing, vec!["BRAND_OWNER", "BRAND_EXTENSION", "PRODUCT_DESCRIPTION"]);
    assert_eq!(
        err.to_string(),
        "Missing columns: BRAND_OWNER, BRAND_EXTENSION, PRODUCT_DESCRIPTION"
    );
}

#[test]
fn test_validate_columns_withDifferentCase_shouldTreatAsMissing() {
    let table = Table::new(vec!["rct".to_string()]);

    let err = normalizer::validate_columns(&table, &["RCT"]).unwrap_err();

    assert_eq!(err.missing, vec!["RCT"]);
}

#[test]
fn test_sort_by_key_withEqualKeys_shouldKeepRelativeOrder() {
    let mut table = common::sample_product_table();

    normalizer::sort_by_key(&mut table, "RCT").unwrap();

    assert_eq!(common::column_text(&table, "RCT"), vec!["10", "10", "20", "30"]);
    // Both RCT=10 rows keep their input order: Acme before Globex
    assert_eq!(common::column_text(&table, "BRAND_OWNER"), vec!["Acme", "Globex", "", "Acme"]);
}

#[test]
fn test_sort_by_key_withEmptyKeys_shouldPlaceThemLast() {
    let mut table = common::product_table(vec![
        vec![CellValue::Empty, text("first-empty")],
        vec![CellValue::Int(5), text("five")],
        vec![CellValue::Empty, text("second-empty")],
        vec![CellValue::Int(1), text("one")],
    ]);

    normalizer::sort_by_key(&mut table, "RCT").unwrap();

    assert_eq!(
        common::column_text(&table, "BRAND_OWNER"),
        vec!["one", "five", "first-empty", "second-empty"]
    );
}

#[test]
fn test_sort_by_key_withMissingKey_shouldFail() {
    let mut table = Table::new(vec!["A".to_string()]);

    let err = normalizer::sort_by_key(&mut table, "RCT").unwrap_err();

    assert_eq!(err.missing, vec!["RCT"]);
}

#[test]
fn test_concatenate_identity_withEmptyMiddleField_shouldCollapseSeparators() {
    assert_eq!(concatenate_identity(&[&text("A"), &text(""), &text("B")]), "A;B");
}

#[test]
fn test_concatenate_identity_withAllFields_shouldJoinInOrder() {
    assert_eq!(concatenate_identity(&[&text("A"), &text("B"), &text("C")]), "A;B;C");
}

#[test]
fn test_concatenate_identity_withAllEmpty_shouldReturnEmptyString() {
    assert_eq!(concatenate_identity(&[&text(""), &text(""), &text("")]), "");
    assert_eq!(
        concatenate_identity(&[&CellValue::Empty, &CellValue::Empty, &CellValue::Empty]),
        ""
    );
}

#[test]
fn test_concatenate_identity_withNullsAroundValue_shouldReturnValueOnly() {
    assert_eq!(
        concatenate_identity(&[&CellValue::Empty, &text("X"), &CellValue::Empty]),
        "X"
    );
}

#[test]
fn test_concatenate_identity_withNumericField_shouldUseDisplayText() {
    assert_eq!(
        concatenate_identity(&[&text("Acme"), &CellValue::Float(7.0), &CellValue::Int(3)]),
        "Acme;7;3"
    );
}

#[test]
fn test_normalize_withSampleTable_shouldSortAndAppendIdentity() {
    let columns = ColumnConfig::default();
    let table = normalizer::normalize(common::sample_product_table(), &columns).unwrap();

    assert_eq!(table.columns().last().map(String::as_str), Some("Concatenated"));
    assert_eq!(
        common::column_text(&table, "Concatenated"),
        vec!["Acme;Crunch;Mini", "Globex;Fizz;Zero", "Solo", "Acme;Crunch"]
    );
}

#[test]
fn test_normalize_withExistingIdentityColumn_shouldOverwriteIt() {
    let columns = ColumnConfig::default();
    let mut table = common::product_table(vec![product_row(1, "A", "B", "C", Some("x"))]);
    table.set_column("Concatenated", vec![text("stale")]);

    let table = normalizer::normalize(table, &columns).unwrap();

    assert_eq!(table.columns().len(), 6);
    assert_eq!(common::column_text(&table, "Concatenated"), vec!["A;B;C"]);
}

#[test]
fn test_normalize_withZeroRows_shouldKeepHeaders() {
    let columns = ColumnConfig::default();
    let table = normalizer::normalize(common::product_table(Vec::new()), &columns).unwrap();

    assert_eq!(table.row_count(), 0);
    assert!(table.columns().iter().any(|c| c == "Concatenated"));
}
