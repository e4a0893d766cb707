/*!
 * # codexcel - product record spreadsheet processing
 *
 * A Rust library for normalizing product record spreadsheets and translating
 * their descriptions.
 *
 * ## Features
 *
 * - Read and write `.xlsx` workbooks and `.csv` files
 * - Validate the required columns and report every missing one
 * - Stable sort of the records by their creation-time key (`RCT`)
 * - Derived `Concatenated` brand identity column
 * - `Translated_Description` column through a per-run translation cache:
 *   - Google web translation endpoint
 *   - Ollama (local LLM)
 * - Progress reporting through a pluggable sink
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `table`: In-memory table of cells
 * - `spreadsheet`: Byte codecs for xlsx and csv
 * - `normalizer`: Schema check, sorting and the identity column
 * - `translation`: Per-run cache and the batch translator
 * - `providers`: Translation backends behind the `Translator` trait
 * - `progress`: Progress sink capability and its adapters
 * - `pipeline`: The staged processing run
 * - `app_controller`: File and folder processing
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod normalizer;
pub mod pipeline;
pub mod progress;
pub mod providers;
pub mod spreadsheet;
pub mod table;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{EncodingError, IngestError, ProcessError, ProviderError, SchemaError};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use pipeline::{Pipeline, ProcessReport, ProcessedTable, RunStage};
pub use progress::{ProgressBand, ProgressSink};
pub use providers::Translator;
pub use spreadsheet::SpreadsheetFormat;
pub use table::{CellValue, Table};
pub use translation::{BatchTranslator, RowTranslation, TranslationCache};
