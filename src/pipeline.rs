/*!
 * The batch pipeline: validate → sort → concatenate → translate → finalize.
 *
 * A run moves through [`RunStage`]s in order. The only failure exit is a
 * schema error while validating; row-level translation failures are
 * absorbed into the output column.
 */

use bytes::Bytes;
use log::{debug, info};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{ColumnConfig, Config};
use crate::errors::ProcessError;
use crate::normalizer;
use crate::progress::{emit_percent, emit_status, ProgressSink};
use crate::providers::Translator;
use crate::spreadsheet::{self, SpreadsheetFormat};
use crate::table::{CellValue, Table};
use crate::translation::{BatchOptions, BatchTranslator, RowTranslation, TranslationCache};

/// Percentage reported once rows are sorted, capped at the band's low bound
const SORTED_PERCENT: u8 = 10;

/// Stages of a processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Idle,
    Validating,
    Sorting,
    Concatenating,
    Translating,
    Finalizing,
    Done,
    /// Terminal state after a schema error
    Failed,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Sorting => "sorting",
            Self::Concatenating => "concatenating",
            Self::Translating => "translating",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    /// Rows in the output, always equal to the input row count
    pub rows: usize,
    /// Remote translation calls made
    pub backend_calls: usize,
    /// Rows answered from the cache
    pub cache_hits: usize,
    /// Rows whose translation failed
    pub failed_rows: usize,
    /// Rows without a description
    pub empty_rows: usize,
    pub elapsed: Duration,
}

/// Output of a successful run
#[derive(Debug, Clone)]
pub struct ProcessedTable {
    pub table: Table,
    pub report: ProcessReport,
}

/// Source text of a description cell; `None` for blank cells
fn source_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Empty => None,
        CellValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// One pipeline, reusable across runs; each run gets its own cache
pub struct Pipeline {
    backend: Arc<dyn Translator>,
    columns: ColumnConfig,
    options: BatchOptions,
    call_timeout: Option<Duration>,
    stage: RunStage,
}

impl Pipeline {
    pub fn new(backend: Arc<dyn Translator>, columns: ColumnConfig, options: BatchOptions) -> Self {
        Self {
            backend,
            columns,
            options,
            call_timeout: None,
            stage: RunStage::Idle,
        }
    }

    /// Build a pipeline from the application configuration
    pub fn from_config(config: &Config, backend: Arc<dyn Translator>) -> Self {
        let options = BatchOptions {
            batch_size: config.processing.batch_size,
            band: config.processing.band(),
            target_language: config.target_language.clone(),
        };
        Self::new(backend, config.processing.columns.clone(), options)
            .with_call_timeout(Duration::from_secs(config.translation.get_timeout_secs()))
    }

    /// Bound every remote translation call
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Stage of the current or last run
    pub fn stage(&self) -> RunStage {
        self.stage
    }

    pub fn columns(&self) -> &ColumnConfig {
        &self.columns
    }

    fn enter(&mut self, stage: RunStage) {
        debug!("Pipeline stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Run the full pipeline over a decoded table
    pub async fn process(
        &mut self,
        table: Table,
        progress: &dyn ProgressSink,
    ) -> Result<ProcessedTable, ProcessError> {
        let start = Instant::now();
        let band = self.options.band;
        self.stage = RunStage::Idle;

        self.enter(RunStage::Validating);
        let validation = normalizer::validate_columns(&table, &self.columns.required());
        if let Err(e) = validation {
            self.enter(RunStage::Failed);
            return Err(e.into());
        }
        let mut table = table;

        self.enter(RunStage::Sorting);
        normalizer::sort_by_key(&mut table, &self.columns.record_time)?;
        emit_percent(progress, SORTED_PERCENT.min(band.low));
        emit_status(progress, "Sorting file... done");

        self.enter(RunStage::Concatenating);
        normalizer::add_identity_column(&mut table, &self.columns.brand_fields(), &self.columns.concatenated)?;
        emit_percent(progress, band.low);
        emit_status(progress, "Creating concatenated column... done");

        self.enter(RunStage::Translating);
        emit_status(progress, "Translating descriptions...");
        let descriptions: Vec<Option<String>> = table
            .column(&self.columns.description)
            .unwrap_or_default()
            .into_iter()
            .map(source_text)
            .collect();

        let cache = match self.call_timeout {
            Some(timeout) => TranslationCache::with_timeout(timeout),
            None => TranslationCache::new(),
        };
        let mut translator = BatchTranslator::with_cache(self.backend.clone(), cache, self.options.clone());
        let translated = translator.translate_column(&descriptions, progress).await;

        self.enter(RunStage::Finalizing);
        let failed_rows = translated.iter().filter(|t| t.is_failed()).count();
        let empty_rows = translated.iter().filter(|t| matches!(t, RowTranslation::Empty)).count();
        let values: Vec<CellValue> = translated.into_iter().map(RowTranslation::into_cell).collect();
        table.set_column(&self.columns.translated, values);
        emit_percent(progress, band.high);
        emit_status(progress, "Translation completed!");

        let (cache_hits, backend_calls, _) = translator.cache().stats();
        let elapsed = start.elapsed();
        self.enter(RunStage::Done);
        emit_percent(progress, 100);
        emit_status(
            progress,
            &format!("Processing complete in {:.2} seconds!", elapsed.as_secs_f64()),
        );

        let report = ProcessReport {
            rows: table.row_count(),
            backend_calls,
            cache_hits,
            failed_rows,
            empty_rows,
            elapsed,
        };
        info!(
            "Processed {} rows in {:.2}s ({} failed translations)",
            report.rows,
            elapsed.as_secs_f64(),
            failed_rows
        );

        Ok(ProcessedTable { table, report })
    }

    /// Upload-to-download boundary: decode, process, encode
    pub async fn process_bytes(
        &mut self,
        input: &[u8],
        format: SpreadsheetFormat,
        progress: &dyn ProgressSink,
    ) -> Result<(Bytes, ProcessedTable), ProcessError> {
        let table = spreadsheet::decode(input, format)?;
        let processed = self.process(table, progress).await?;
        let output = spreadsheet::encode(&processed.table, format)?;
        Ok((output, processed))
    }
}
