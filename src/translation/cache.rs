/*!
 * Translation caching functionality.
 *
 * The cache memoizes the remote translation call for the lifetime of one
 * run: every distinct source text reaches the backend at most once. Failed
 * translations are cached as well, so a text that keeps failing is not
 * retried within the same run.
 */

use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Translator;
use crate::table::CellValue;

/// Cell text written for a row whose translation failed
pub const TRANSLATION_FAILED: &str = "Translation Error";

/// Outcome of translating one row
#[derive(Debug, Clone, PartialEq)]
pub enum RowTranslation {
    /// No source text; nothing was translated
    Empty,
    /// The backend returned a translation
    Translated(String),
    /// The backend failed for this text
    Failed(ProviderError),
}

impl RowTranslation {
    /// Text written to the translated column
    pub fn cell_text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Translated(text) => text,
            Self::Failed(_) => TRANSLATION_FAILED,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn into_cell(self) -> CellValue {
        match self {
            Self::Translated(text) => CellValue::String(text),
            other => CellValue::String(other.cell_text().to_string()),
        }
    }
}

/// Per-run translation cache keyed by the exact source text
#[derive(Debug, Default)]
pub struct TranslationCache {
    /// Stored outcomes; never `RowTranslation::Empty`
    entries: HashMap<String, RowTranslation>,

    /// Cache hit counter
    hits: usize,

    /// Cache miss counter, equal to the number of remote calls
    misses: usize,

    /// Upper bound for a single remote call
    call_timeout: Option<Duration>,
}

impl TranslationCache {
    /// Create an empty cache without a call timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache bounding every remote call by `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            call_timeout: Some(timeout),
            ..Self::default()
        }
    }

    /// Get a stored outcome without calling the backend
    pub fn get(&self, source_text: &str) -> Option<&RowTranslation> {
        self.entries.get(source_text)
    }

    /// Translate `source_text`, consulting the cache before the backend.
    ///
    /// Missing or empty text yields `RowTranslation::Empty` without touching
    /// the cache or the backend.
    pub async fn lookup(
        &mut self,
        source_text: Option<&str>,
        backend: &dyn Translator,
        target_language: &str,
    ) -> RowTranslation {
        let text = match source_text {
            Some(text) if !text.is_empty() => text,
            _ => return RowTranslation::Empty,
        };

        if let Some(hit) = self.entries.get(text) {
            self.hits += 1;
            debug!("Cache hit for '{}'", truncate_text(text, 30));
            return hit.clone();
        }

        self.misses += 1;
        debug!("Cache miss for '{}', calling {}", truncate_text(text, 30), backend.name());

        let result = match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, backend.translate(text, target_language))
                .await
                .unwrap_or(Err(ProviderError::Timeout(limit.as_secs()))),
            None => backend.translate(text, target_language).await,
        };

        let outcome = match result {
            Ok(translated) => RowTranslation::Translated(translated),
            Err(e) => {
                warn!("Translation failed for '{}': {}", truncate_text(text, 30), e);
                RowTranslation::Failed(e)
            }
        };

        self.entries.insert(text.to_string(), outcome.clone());
        outcome
    }

    /// Get cache statistics: hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let total = self.hits + self.misses;
        let hit_rate = if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        };
        (self.hits, self.misses, hit_rate)
    }

    /// Number of remote calls made through this cache
    pub fn remote_calls(&self) -> usize {
        self.misses
    }

    /// Number of distinct texts whose translation failed
    pub fn failed_entries(&self) -> usize {
        self.entries.values().filter(|o| o.is_failed()).count()
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
