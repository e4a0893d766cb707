/*!
 * Mock translation backend for tests and benchmarks.
 *
 * - `MockTranslator::working()` - always succeeds with `[EN] <text>`
 * - `MockTranslator::failing()` - always fails
 * - `MockTranslator::failing_on(..)` - fails only for the listed texts
 * - `MockTranslator::intermittent(n)` - every nth call fails
 * - `MockTranslator::slow(ms)` - succeeds after a delay
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an API error
    Failing,
    /// Fails for exactly these source texts
    FailingOn(HashSet<String>),
    /// Fails on every nth call (1-based)
    Intermittent { fail_every: usize },
    /// Succeeds after sleeping
    Slow { delay_ms: u64 },
}

/// Mock backend recording every call it receives
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    /// Total calls, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Calls per source text, shared between clones
    calls_by_text: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            calls_by_text: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn failing_on<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::FailingOn(texts.into_iter().map(Into::into).collect()))
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// The translation a working mock returns for `text`
    pub fn expected_translation(text: &str) -> String {
        format!("[EN] {}", text)
    }

    /// Total number of remote calls received
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Number of remote calls received for one source text
    pub fn calls_for(&self, text: &str) -> usize {
        self.calls_by_text.lock().get(text).copied().unwrap_or(0)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        *self.calls_by_text.lock().entry(text.to_string()).or_insert(0) += 1;

        let fail = match &self.behavior {
            MockBehavior::Working => false,
            MockBehavior::Failing => true,
            MockBehavior::FailingOn(texts) => texts.contains(text),
            MockBehavior::Intermittent { fail_every } => count % fail_every == 0,
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                false
            }
        };

        if fail {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated failure translating to {}", target_language),
            });
        }
        Ok(Self::expected_translation(text))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated connection failure".to_string())),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
