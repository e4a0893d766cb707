/*!
 * Translation backends.
 *
 * Every backend implements [`Translator`], a single remote call that turns a
 * source text into the target language:
 * - `google`: Google web translation endpoint (default)
 * - `ollama`: local LLM served by Ollama
 * - `mock`: deterministic in-process backend for tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// Common trait for all translation backends
///
/// Implementations are opaque remote dependencies with their own failure
/// modes; callers treat every `Err` as a failed translation of that text.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate `text` into `target_language`
    ///
    /// # Arguments
    /// * `text` - The source text, in any language
    /// * `target_language` - ISO 639 code of the language to translate to
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;

    /// Check that the backend is reachable
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short backend name for logs
    fn name(&self) -> &str;
}

/// Build the backend selected in the configuration
pub fn from_config(config: &TranslationConfig) -> Arc<dyn Translator> {
    let timeout = Duration::from_secs(config.get_timeout_secs());
    match config.provider {
        TranslationProvider::Google => {
            Arc::new(google::GoogleTranslate::new(config.get_endpoint(), timeout))
        }
        TranslationProvider::Ollama => Arc::new(
            ollama::Ollama::from_url(config.get_endpoint(), timeout)
                .with_model(config.get_model())
                .with_system_prompt(config.common.system_prompt.clone())
                .with_temperature(config.common.temperature),
        ),
    }
}

pub mod google;
pub mod mock;
pub mod ollama;
