/*!
 * Error types for the codexcel application.
 *
 * Run-level failures (schema, ingestion, encoding) are fatal and abort a run
 * before any output is produced. Provider failures are per-row: they are
 * absorbed into the translated column and never abort the batch.
 */

use thiserror::Error;

/// Errors that can occur when calling a translation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting or quota exhaustion
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The backend did not answer within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// One or more required columns are absent from the input table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing columns: {}", missing.join(", "))]
pub struct SchemaError {
    /// Every missing column, in the order they were required
    pub missing: Vec<String>,
}

/// Errors that can occur while decoding an input spreadsheet
#[derive(Error, Debug)]
pub enum IngestError {
    /// The workbook could not be opened or parsed
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// The workbook has no worksheet to read
    #[error("Workbook contains no worksheet")]
    NoWorksheet,

    /// The CSV payload could not be parsed
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl From<calamine::XlsxError> for IngestError {
    fn from(error: calamine::XlsxError) -> Self {
        Self::Workbook(error.to_string())
    }
}

/// Errors that can occur while serializing the output spreadsheet
#[derive(Error, Debug)]
pub enum EncodingError {
    /// The workbook writer rejected a cell or failed to assemble the file
    #[error("Failed to write workbook: {0}")]
    Workbook(String),

    /// The table does not fit into a worksheet
    #[error("Table exceeds worksheet limits: {0}")]
    OutOfRange(String),

    /// The CSV writer failed
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the CSV buffer failed
    #[error("I/O error while encoding: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rust_xlsxwriter::XlsxError> for EncodingError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(error.to_string())
    }
}

/// A progress sink could not deliver an update
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Progress sink error: {0}")]
pub struct ProgressError(pub String);

/// Fatal errors of a processing run
#[derive(Error, Debug)]
pub enum ProcessError {
    /// Required columns are missing
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The input could not be decoded
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// The output could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
}
