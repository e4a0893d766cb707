/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use codexcel::app_config::{Config, TranslationProvider};
use codexcel::app_controller::{Controller, RunOutcome, PREVIEW_ROWS};
use codexcel::progress::RecordingProgress;
use codexcel::providers::mock::MockTranslator;
use codexcel::spreadsheet::{SpreadsheetFormat, DOWNLOAD_FILE_NAME};
use codexcel::table::{CellValue, Table};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{self, product_row};

fn mock_controller(backend: &MockTranslator) -> Controller {
    Controller::with_translator(Config::default(), Arc::new(backend.clone()))
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;

    assert_eq!(controller.config().translation.provider, TranslationProvider::Google);
    Ok(())
}

#[test]
fn test_controller_initialization_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.processing.batch_size = 0;

    assert!(Controller::with_config(config).is_err());
}

#[test]
fn test_run_withXlsxInput_shouldWriteProcessedFileNextToInput() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::write_table_file(
        temp_dir.path(),
        "products.xlsx",
        &common::sample_product_table(),
        SpreadsheetFormat::Xlsx,
    )?;
    let backend = MockTranslator::working();
    let controller = mock_controller(&backend);

    let outcome = tokio_test::block_on(controller.run(input, None, false))?;

    let expected_output = temp_dir.path().join(DOWNLOAD_FILE_NAME);
    assert_eq!(outcome.output(), expected_output.as_path());
    assert!(matches!(outcome, RunOutcome::Processed { .. }));

    let written = common::read_table_file(&expected_output)?;
    assert_eq!(written.row_count(), 4);
    assert_eq!(
        common::column_text(&written, "Concatenated"),
        vec!["Acme;Crunch;Mini", "Globex;Fizz;Zero", "Solo", "Acme;Crunch"]
    );
    assert_eq!(backend.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::write_table_file(
        temp_dir.path(),
        "products.csv",
        &common::sample_product_table(),
        SpreadsheetFormat::Csv,
    )?;
    let output = temp_dir.path().join("result.csv");
    fs::write(&output, "placeholder")?;
    let backend = MockTranslator::working();
    let controller = mock_controller(&backend);

    let skipped = controller.run(input.clone(), Some(output.clone()), false).await?;
    assert!(matches!(skipped, RunOutcome::Skipped { .. }));
    assert_eq!(fs::read_to_string(&output)?, "placeholder");
    assert_eq!(backend.call_count(), 0);

    let forced = controller.run(input, Some(output.clone()), true).await?;
    assert!(matches!(forced, RunOutcome::Processed { .. }));
    let written = common::read_table_file(&output)?;
    assert_eq!(written.columns().len(), 7);
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingColumns_shouldFailWithoutWritingOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = Table::from_rows(
        vec!["RCT".to_string(), "BRAND_1".to_string()],
        vec![vec![CellValue::Int(1), common::text("Solo")]],
    );
    let input = common::write_table_file(temp_dir.path(), "broken.xlsx", &broken, SpreadsheetFormat::Xlsx)?;
    let backend = MockTranslator::working();
    let controller = mock_controller(&backend);

    let err = controller.run(input, None, false).await.unwrap_err();

    assert!(format!("{:#}", err).contains("Missing columns: BRAND_OWNER, BRAND_EXTENSION, PRODUCT_DESCRIPTION"));
    assert!(!temp_dir.path().join(DOWNLOAD_FILE_NAME).exists());
    assert_eq!(backend.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() {
    let controller = mock_controller(&MockTranslator::working());

    let result = controller.run("/no/such/products.xlsx".into(), None, false).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_folder_withMixedFiles_shouldProcessEachIndependently() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::write_table_file(root, "january.xlsx", &common::sample_product_table(), SpreadsheetFormat::Xlsx)?;
    common::write_table_file(root, "february.csv", &common::sample_product_table(), SpreadsheetFormat::Csv)?;
    fs::write(root.join("corrupt.xlsx"), b"not a workbook")?;
    let backend = MockTranslator::working();
    let controller = mock_controller(&backend);

    let summary = controller.run_folder(root.to_path_buf(), false).await?;

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 0);
    assert!(root.join("january_Processed.xlsx").exists());
    assert!(root.join("february_Processed.csv").exists());
    // Each file gets its own cache: the repeated text is sent once per file
    assert_eq!(backend.calls_for("Schokoladenkekse"), 2);

    // A second run leaves existing outputs alone and never picks them up as inputs
    let again = controller.run_folder(root.to_path_buf(), false).await?;
    assert_eq!(again.skipped, 2);
    assert_eq!(again.processed, 0);
    Ok(())
}

#[tokio::test]
async fn test_run_folder_withNoSpreadsheets_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    fs::write(temp_dir.path().join("readme.txt"), "nothing here")?;
    let controller = mock_controller(&MockTranslator::working());

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_process_bytes_withCsvUpload_shouldReturnCsvDownload() -> Result<()> {
    let backend = MockTranslator::working();
    let controller = mock_controller(&backend);
    let upload = b"RCT,BRAND_OWNER,BRAND_1,BRAND_EXTENSION,PRODUCT_DESCRIPTION\n2,Acme,Fizz,,Apfelsaft\n1,Acme,Fizz,Zero,\n";
    let progress = RecordingProgress::new();

    let (output, processed) = controller.process_bytes(upload, SpreadsheetFormat::Csv, &progress).await?;
    let text = String::from_utf8(output.to_vec())?;

    assert_eq!(
        text,
        "RCT,BRAND_OWNER,BRAND_1,BRAND_EXTENSION,PRODUCT_DESCRIPTION,Concatenated,Translated_Description\n\
         1,Acme,Fizz,Zero,,Acme;Fizz;Zero,\n\
         2,Acme,Fizz,,Apfelsaft,Acme;Fizz,[EN] Apfelsaft\n"
    );
    assert_eq!(processed.report.rows, 2);
    assert_eq!(progress.percents().last(), Some(&100));
    Ok(())
}

#[test]
fn test_preview_withManyRows_shouldShowFirstRowsOnly() {
    let rows = (0..25).map(|i| product_row(i, "Owner", "Brand", "", Some("text"))).collect();
    let table = common::product_table(rows);

    let preview = Controller::preview(&table);

    // Header line plus the preview rows
    assert_eq!(preview.lines().count(), PREVIEW_ROWS + 1);
    assert!(preview.starts_with("RCT"));
}

#[test]
fn test_format_duration_withVariousLengths_shouldBeHumanReadable() {
    assert_eq!(Controller::format_duration(Duration::from_millis(1_250)), "1.250s");
    assert_eq!(Controller::format_duration(Duration::from_secs(125)), "2m 5s");
    assert_eq!(Controller::format_duration(Duration::from_secs(3_725)), "1h 2m 5s");
}
