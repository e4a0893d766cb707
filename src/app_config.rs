use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

use crate::progress::ProgressBand;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Target language code (ISO) for the translated description column
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Pipeline settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google web translation endpoint
    #[default]
    Google,
    // @provider: Ollama (local LLM)
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (unused by Google)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds for a single translation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                endpoint: default_google_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Settings shared by the LLM-backed providers
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholder: {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
        }
    }
}

/// Names of the input columns the pipeline reads and the columns it adds
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColumnConfig {
    /// Record-creation-time key used for ordering
    #[serde(default = "default_record_time_column")]
    pub record_time: String,

    #[serde(default = "default_brand_owner_column")]
    pub brand_owner: String,

    #[serde(default = "default_brand_column")]
    pub brand: String,

    #[serde(default = "default_brand_extension_column")]
    pub brand_extension: String,

    /// Free-text description to translate
    #[serde(default = "default_description_column")]
    pub description: String,

    /// Derived identity column
    #[serde(default = "default_concatenated_column")]
    pub concatenated: String,

    /// Derived translation column
    #[serde(default = "default_translated_column")]
    pub translated: String,
}

impl ColumnConfig {
    /// Columns that must be present in every input, in reporting order
    pub fn required(&self) -> Vec<&str> {
        vec![
            self.record_time.as_str(),
            self.brand_owner.as_str(),
            self.brand.as_str(),
            self.brand_extension.as_str(),
            self.description.as_str(),
        ]
    }

    /// Brand fields joined into the identity column, in join order
    pub fn brand_fields(&self) -> [&str; 3] {
        [self.brand_owner.as_str(), self.brand.as_str(), self.brand_extension.as_str()]
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            record_time: default_record_time_column(),
            brand_owner: default_brand_owner_column(),
            brand: default_brand_column(),
            brand_extension: default_brand_extension_column(),
            description: default_description_column(),
            concatenated: default_concatenated_column(),
            translated: default_translated_column(),
        }
    }
}

/// Batch pipeline settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProcessingConfig {
    /// Emit a progress update every `batch_size` rows
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Lower bound of the percentage band reserved for translation
    #[serde(default = "default_progress_low")]
    pub progress_low: u8,

    /// Upper bound of the percentage band reserved for translation
    #[serde(default = "default_progress_high")]
    pub progress_high: u8,

    /// Column names
    #[serde(default)]
    pub columns: ColumnConfig,
}

impl ProcessingConfig {
    /// Translation progress band
    pub fn band(&self) -> ProgressBand {
        ProgressBand::new(self.progress_low, self.progress_high)
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            progress_low: default_progress_low(),
            progress_high: default_progress_high(),
            columns: ColumnConfig::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_ollama_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

fn default_batch_size() -> usize {
    100
}

fn default_progress_low() -> u8 {
    30
}

fn default_progress_high() -> u8 {
    80
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator of retail product descriptions. Translate the user's text to {target_language}. Reply with the translation only, without quotes or commentary.".to_string()
}

fn default_record_time_column() -> String {
    "RCT".to_string()
}

fn default_brand_owner_column() -> String {
    "BRAND_OWNER".to_string()
}

fn default_brand_column() -> String {
    "BRAND_1".to_string()
}

fn default_brand_extension_column() -> String {
    "BRAND_EXTENSION".to_string()
}

fn default_description_column() -> String {
    "PRODUCT_DESCRIPTION".to_string()
}

fn default_concatenated_column() -> String {
    "Concatenated".to_string()
}

fn default_translated_column() -> String {
    "Translated_Description".to_string()
}

impl Config {
    /// Load a configuration file, or write the defaults there if it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path, e))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config to JSON: {}", e))?;
        std::fs::write(path, config_json)
            .map_err(|e| anyhow!("Failed to write default config to file {:?}: {}", path, e))?;
        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        let processing = &self.processing;
        if processing.batch_size == 0 {
            return Err(anyhow!("processing.batch_size must be greater than zero"));
        }
        if processing.progress_low > processing.progress_high || processing.progress_high > 100 {
            return Err(anyhow!(
                "Invalid progress band {}-{}: expected low <= high <= 100",
                processing.progress_low,
                processing.progress_high
            ));
        }

        let columns = &processing.columns;
        let mut names = columns.required();
        names.push(columns.concatenated.as_str());
        names.push(columns.translated.as_str());
        if names.iter().any(|name| name.trim().is_empty()) {
            return Err(anyhow!("Column names must not be empty"));
        }

        let blank_model = self
            .translation
            .get_active_provider_config()
            .map(|p| p.model.trim().is_empty())
            .unwrap_or(false);
        if self.translation.provider == TranslationProvider::Ollama && blank_model {
            return Err(anyhow!("A model name is required for the Ollama provider"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            processing: ProcessingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, inserting the defaults if absent
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(position) => position,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => String::new(),
            TranslationProvider::Ollama => default_ollama_model(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
        }
    }

    /// Get the per-call timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => match self.provider {
                TranslationProvider::Google => default_timeout_secs(),
                TranslationProvider::Ollama => default_ollama_timeout_secs(),
            },
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
