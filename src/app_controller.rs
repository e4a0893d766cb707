use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::pipeline::{Pipeline, ProcessedTable};
use crate::progress::{ProgressSink, TerminalProgress};
use crate::providers::{self, Translator};
use crate::spreadsheet::{self, SpreadsheetFormat};
use crate::table::Table;

// @module: Application controller for spreadsheet processing

/// Rows shown by [`Controller::preview`]
pub const PREVIEW_ROWS: usize = 10;

/// Result of processing one file
#[derive(Debug)]
pub enum RunOutcome {
    /// The file was processed and written to `output`
    Processed {
        output: PathBuf,
        processed: ProcessedTable,
    },
    /// The output already existed and overwriting was not forced
    Skipped { output: PathBuf },
}

impl RunOutcome {
    pub fn output(&self) -> &Path {
        match self {
            Self::Processed { output, .. } | Self::Skipped { output } => output,
        }
    }
}

/// Counts of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation backend shared by every run
    backend: Arc<dyn Translator>,
}

impl Controller {
    // @method: Create a new controller with the backend selected in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let backend = providers::from_config(&config.translation);
        Ok(Self { config, backend })
    }

    // @method: Create a controller around an existing backend
    pub fn with_translator(config: Config, backend: Arc<dyn Translator>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check that the translation backend answers
    pub async fn test_connection(&self) -> Result<()> {
        self.backend
            .test_connection()
            .await
            .map_err(|e| anyhow!("{} is not reachable: {}", self.backend.name(), e))
    }

    /// Upload-to-download boundary: input bytes in, output bytes out
    pub async fn process_bytes(
        &self,
        input: &[u8],
        format: SpreadsheetFormat,
        progress: &dyn ProgressSink,
    ) -> Result<(Bytes, ProcessedTable)> {
        let mut pipeline = Pipeline::from_config(&self.config, self.backend.clone());
        let result = pipeline.process_bytes(input, format, progress).await?;
        Ok(result)
    }

    /// Process one file; the default output is `Processed_File.xlsx` next to the input
    pub async fn run(&self, input_file: PathBuf, output_file: Option<PathBuf>, force_overwrite: bool) -> Result<RunOutcome> {
        let output_file = output_file.unwrap_or_else(|| FileManager::default_output_path(&input_file));
        let progress = TerminalProgress::new();
        let outcome = self.run_with_progress(&input_file, output_file, &progress, force_overwrite).await;
        progress.clear();

        if let Ok(RunOutcome::Processed { output, processed }) = &outcome {
            info!(
                "Success: {} ({} rows in {})",
                output.display(),
                processed.report.rows,
                Self::format_duration(processed.report.elapsed)
            );
        }
        outcome
    }

    /// Run the controller with the given progress sink
    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_file: PathBuf,
        progress: &dyn ProgressSink,
        force_overwrite: bool,
    ) -> Result<RunOutcome> {
        // Check if the input file exists
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if output_file.exists() && !force_overwrite {
            warn!(
                "Skipping file, {} already exists (use -f to force overwrite)",
                output_file.display()
            );
            return Ok(RunOutcome::Skipped { output: output_file });
        }

        let input_format = SpreadsheetFormat::from_path(input_file)
            .ok_or_else(|| anyhow!("Unsupported spreadsheet format: {:?}", input_file))?;
        let output_format = SpreadsheetFormat::from_path(&output_file)
            .ok_or_else(|| anyhow!("Unsupported output format: {:?}", output_file))?;

        let input = FileManager::read_bytes(input_file)?;
        let table = spreadsheet::decode(&input, input_format)
            .with_context(|| format!("Failed to read spreadsheet {:?}", input_file))?;
        info!("Loaded {} rows from {}", table.row_count(), input_file.display());

        let mut pipeline = Pipeline::from_config(&self.config, self.backend.clone());
        let processed = pipeline.process(table, progress).await?;

        let output = spreadsheet::encode(&processed.table, output_format)?;
        FileManager::write_bytes(&output_file, &output)?;

        Ok(RunOutcome::Processed {
            output: output_file,
            processed,
        })
    }

    /// Process every spreadsheet in a directory tree; each file is an independent run
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_spreadsheets(&input_dir)?;
        if files.is_empty() {
            return Err(anyhow!("No spreadsheet files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let file_progress = TerminalProgress::with_bar(multi_progress.add(ProgressBar::new(100)));
            let output_file = FileManager::processed_output_path(file);

            match self.run_with_progress(file, output_file, &file_progress, force_overwrite).await {
                Ok(RunOutcome::Processed { .. }) => summary.processed += 1,
                Ok(RunOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            file_progress.clear();
            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    /// Render the first rows of a table as text
    pub fn preview(table: &Table) -> String {
        table.head(PREVIEW_ROWS).to_text_grid()
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
