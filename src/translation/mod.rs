/*!
 * Description translation for the batch pipeline.
 *
 * - `cache`: per-run memoization of the remote translation call
 * - `batch`: sequential scan over a column with progress reporting
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOptions, BatchTranslator};
pub use self::cache::{RowTranslation, TranslationCache, TRANSLATION_FAILED};

// Submodules
pub mod batch;
pub mod cache;
