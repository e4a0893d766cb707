/*!
 * End-to-end tests for the processing pipeline against the mock backend
 */

use codexcel::app_config::{ColumnConfig, Config};
use codexcel::errors::ProcessError;
use codexcel::pipeline::{Pipeline, RunStage};
use codexcel::progress::{ProgressBand, RecordingProgress};
use codexcel::providers::mock::MockTranslator;
use codexcel::spreadsheet::{self, SpreadsheetFormat};
use codexcel::table::{CellValue, Table};
use codexcel::translation::{BatchOptions, TRANSLATION_FAILED};
use std::sync::Arc;

use crate::common::{self, product_row};

fn pipeline_with(backend: &MockTranslator) -> Pipeline {
    Pipeline::new(
        Arc::new(backend.clone()),
        ColumnConfig::default(),
        BatchOptions::default(),
    )
}

#[tokio::test]
async fn test_process_withSampleTable_shouldSortConcatenateAndTranslate() {
    common::init_logger();
    let backend = MockTranslator::working();
    let mut pipeline = pipeline_with(&backend);
    let progress = RecordingProgress::new();

    let processed = pipeline.process(common::sample_product_table(), &progress).await.unwrap();
    let table = &processed.table;

    assert_eq!(pipeline.stage(), RunStage::Done);
    assert_eq!(table.row_count(), 4);
    assert_eq!(&table.columns()[5..], &["Concatenated".to_string(), "Translated_Description".to_string()]);
    assert_eq!(common::column_text(table, "RCT"), vec!["10", "10", "20", "30"]);
    assert_eq!(
        common::column_text(table, "Translated_Description"),
        vec![
            "[EN] Gesalzene Erdnüsse",
            "[EN] Schokoladenkekse",
            "",
            "[EN] Schokoladenkekse",
        ]
    );

    // The repeated description reaches the backend once
    assert_eq!(backend.calls_for("Schokoladenkekse"), 1);
    assert_eq!(processed.report.backend_calls, 2);
    assert_eq!(processed.report.cache_hits, 1);
    assert_eq!(processed.report.empty_rows, 1);
    assert_eq!(processed.report.failed_rows, 0);
}

#[tokio::test]
async fn test_process_withSampleTable_shouldEmitStageProgressInOrder() {
    let backend = MockTranslator::working();
    let mut pipeline = pipeline_with(&backend);
    let progress = RecordingProgress::new();

    pipeline.process(common::sample_product_table(), &progress).await.unwrap();

    assert_eq!(progress.percents(), vec![10, 30, 30, 80, 100]);
    let statuses = progress.statuses();
    assert_eq!(&statuses[..4], &[
        "Sorting file... done",
        "Creating concatenated column... done",
        "Translating descriptions...",
        "Translating... 1/4 rows processed",
    ]);
    assert_eq!(statuses[4], "Translation completed!");
    assert!(statuses[5].starts_with("Processing complete in "));
    assert!(statuses[5].ends_with(" seconds!"));
}

#[tokio::test]
async fn test_process_withMissingColumns_shouldFailBeforeAnyBackendCall() {
    let backend = MockTranslator::working();
    let mut pipeline = pipeline_with(&backend);
    let progress = RecordingProgress::new();
    let table = Table::from_rows(
        vec!["RCT".to_string(), "PRODUCT_DESCRIPTION".to_string()],
        vec![vec![CellValue::Int(1), common::text("Brot")]],
    );

    let result = pipeline.process(table, &progress).await;

    match result {
        Err(ProcessError::Schema(e)) => {
            assert_eq!(e.missing, vec!["BRAND_OWNER", "BRAND_1", "BRAND_EXTENSION"]);
        }
        other => panic!("expected a schema error, got {:?}", other.map(|p| p.report)),
    }
    assert_eq!(pipeline.stage(), RunStage::Failed);
    assert_eq!(backend.call_count(), 0);
    assert!(progress.events().is_empty());
}

#[tokio::test]
async fn test_process_with250Rows_shouldDegradeFailedRowsAndReportInBand() {
    let rows: Vec<Vec<CellValue>> = (0..250)
        .map(|i| {
            let description = match i {
                7 => None,
                42 => Some("kaputt".to_string()),
                _ => Some(format!("Produkt {}", i % 20)),
            };
            // Descending keys so the sort reverses the input
            product_row(1000 - i as i64, "Owner", "Brand", "", description.as_deref())
        })
        .collect();
    let backend = MockTranslator::failing_on(["kaputt"]);
    let mut pipeline = pipeline_with(&backend);
    let progress = RecordingProgress::new();

    let processed = pipeline.process(common::product_table(rows), &progress).await.unwrap();
    let translated = common::column_text(&processed.table, "Translated_Description");

    assert_eq!(processed.table.row_count(), 250);
    // Input row i lands at output position 249 - i
    assert_eq!(translated[249 - 7], "");
    assert_eq!(translated[249 - 42], TRANSLATION_FAILED);
    assert_eq!(translated.iter().filter(|t| *t == TRANSLATION_FAILED).count(), 1);
    assert_eq!(processed.report.failed_rows, 1);
    assert_eq!(processed.report.empty_rows, 1);

    let band_percents: Vec<u8> = progress
        .percents()
        .into_iter()
        .filter(|p| (30..80).contains(p))
        .collect();
    // Low bound reached after concatenation, then rows 0, 100 and 200
    assert_eq!(band_percents, vec![30, 30, 50, 70]);
}

#[tokio::test]
async fn test_process_withZeroRows_shouldProduceHeadersOnly() {
    let backend = MockTranslator::working();
    let mut pipeline = pipeline_with(&backend);
    let progress = RecordingProgress::new();

    let processed = pipeline.process(common::product_table(Vec::new()), &progress).await.unwrap();

    assert_eq!(processed.table.row_count(), 0);
    assert_eq!(processed.table.columns().len(), 7);
    assert!(!progress.statuses().iter().any(|s| s.starts_with("Translating...")));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_process_bytes_withXlsxUpload_shouldReturnDecodableWorkbook() {
    let backend = MockTranslator::working();
    let mut pipeline = pipeline_with(&backend);
    let progress = RecordingProgress::new();
    let upload = spreadsheet::encode(&common::sample_product_table(), SpreadsheetFormat::Xlsx).unwrap();

    let (output, processed) = pipeline
        .process_bytes(&upload, SpreadsheetFormat::Xlsx, &progress)
        .await
        .unwrap();
    let downloaded = spreadsheet::decode(&output, SpreadsheetFormat::Xlsx).unwrap();

    assert_eq!(downloaded.columns(), processed.table.columns());
    assert_eq!(downloaded.row_count(), 4);
    assert_eq!(
        common::column_text(&downloaded, "Concatenated"),
        common::column_text(&processed.table, "Concatenated")
    );
    assert_eq!(
        common::column_text(&downloaded, "Translated_Description"),
        common::column_text(&processed.table, "Translated_Description")
    );
}

#[tokio::test]
async fn test_process_withReusedPipeline_shouldStartEachRunWithEmptyCache() {
    let backend = MockTranslator::working();
    let mut pipeline = pipeline_with(&backend);

    pipeline.process(common::sample_product_table(), &RecordingProgress::new()).await.unwrap();
    pipeline.process(common::sample_product_table(), &RecordingProgress::new()).await.unwrap();

    assert_eq!(backend.calls_for("Schokoladenkekse"), 2);
}

#[tokio::test]
async fn test_from_config_withNarrowBand_shouldCapSortPercentAtLowBound() {
    let mut config = Config::default();
    config.processing.progress_low = 5;
    config.processing.progress_high = 95;
    let mut pipeline = Pipeline::from_config(&config, Arc::new(MockTranslator::working()));
    let progress = RecordingProgress::new();

    pipeline.process(common::sample_product_table(), &progress).await.unwrap();

    let percents = progress.percents();
    assert_eq!(percents[0], 5);
    assert_eq!(ProgressBand::new(5, 95), config.processing.band());
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
}
