/*!
 * Batch translation processing.
 *
 * Rows are translated strictly in order, one cache lookup per row, which is
 * what keeps the cache's one-call-per-text guarantee without any locking.
 * Progress is reported every `batch_size` rows inside the translation band.
 */

use log::info;
use std::sync::Arc;

use crate::progress::{emit_percent, emit_status, ProgressBand, ProgressSink};
use crate::providers::Translator;

use super::cache::{RowTranslation, TranslationCache};

/// Settings for one batch translation run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Report progress after every row whose index is a multiple of this
    pub batch_size: usize,
    /// Percentage band covered by the scan
    pub band: ProgressBand,
    /// ISO 639 code of the language to translate to
    pub target_language: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            band: ProgressBand::default(),
            target_language: "en".to_string(),
        }
    }
}

/// Batch translator owning the cache of a single run
pub struct BatchTranslator {
    /// The translation backend to use
    backend: Arc<dyn Translator>,

    /// Cache scoped to this translator, never shared between runs
    cache: TranslationCache,

    options: BatchOptions,
}

impl BatchTranslator {
    /// Create a new batch translator with an empty cache
    pub fn new(backend: Arc<dyn Translator>, options: BatchOptions) -> Self {
        Self::with_cache(backend, TranslationCache::new(), options)
    }

    /// Create a batch translator around a prepared cache, e.g. one with a call timeout
    pub fn with_cache(backend: Arc<dyn Translator>, cache: TranslationCache, options: BatchOptions) -> Self {
        Self {
            backend,
            cache,
            options: BatchOptions {
                batch_size: options.batch_size.max(1),
                ..options
            },
        }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Translate a column of descriptions.
    ///
    /// The result has one entry per input row, in input order. A failed row
    /// degrades to `RowTranslation::Failed` and the scan continues.
    pub async fn translate_column(
        &mut self,
        descriptions: &[Option<String>],
        progress: &dyn ProgressSink,
    ) -> Vec<RowTranslation> {
        let total_rows = descriptions.len();
        let mut translated = Vec::with_capacity(total_rows);

        for (index, description) in descriptions.iter().enumerate() {
            let outcome = self
                .cache
                .lookup(description.as_deref(), self.backend.as_ref(), &self.options.target_language)
                .await;
            translated.push(outcome);

            if index % self.options.batch_size == 0 {
                emit_percent(progress, self.options.band.percent_at(index, total_rows));
                emit_status(
                    progress,
                    &format!("Translating... {}/{} rows processed", index + 1, total_rows),
                );
            }
        }

        if total_rows > 0 {
            let (hits, misses, hit_rate) = self.cache.stats();
            info!(
                "Translated {} rows: {} backend calls, {} cache hits ({:.0}% hit rate)",
                total_rows,
                misses,
                hits,
                hit_rate * 100.0
            );
        }

        translated
    }
}
