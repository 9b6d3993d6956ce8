use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::augment::ai_model::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiBackend};
use crate::locator::synthesizer::{
    DEFAULT_MAX_LOCATOR_LENGTH, DEFAULT_MAX_TEXT_LENGTH, IdPolicy, SynthesisOptions,
};
use crate::selection::selection_model::{DEFAULT_HIGHLIGHT_DURATION_MS, SelectionOptions};

pub const DEFAULT_CONFIG_PATH: &str = "element-locator.yaml";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "element-locator",
    version,
    about = "Synthesize stable XPath locators for elements of a DOM snapshot"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: element-locator.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append a JSON-lines trace of each synthesis to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a locator for the selected element of a snapshot
    Locate {
        /// Path to a page snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Document-order element index (default: the element marked "selected")
        #[arg(long)]
        index: Option<usize>,

        /// Locate every input, button, link, select and textarea instead
        #[arg(long, default_value_t = false)]
        interactive: bool,

        /// Report a usable id as a bare identifier instead of an XPath
        #[arg(long, default_value_t = false)]
        prefer_identifier: bool,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the structural context of the selected element as JSON
    Context {
        /// Path to a page snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Document-order element index (default: the element marked "selected")
        #[arg(long)]
        index: Option<usize>,
    },

    /// Ask the text model for an id or locator, falling back to synthesis
    Suggest {
        /// Path to a page snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Document-order element index (default: the element marked "selected")
        #[arg(long)]
        index: Option<usize>,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `element-locator.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    #[serde(default = "default_highlight_duration")]
    pub highlight_duration_ms: u64,

    #[serde(default = "default_max_locator_length")]
    pub max_locator_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            highlight_duration_ms: DEFAULT_HIGHLIGHT_DURATION_MS,
            max_locator_length: DEFAULT_MAX_LOCATOR_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Treat ids ending in a digit as generated and skip them.
    #[serde(default)]
    pub reject_dynamic_ids: bool,

    #[serde(default = "default_generic_classes")]
    pub generic_classes: Vec<String>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reject_dynamic_ids: false,
            generic_classes: default_generic_classes(),
        }
    }
}

// Serde default helpers
fn default_model() -> String { DEFAULT_MODEL.to_string() }
fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }
fn default_max_text_length() -> usize { DEFAULT_MAX_TEXT_LENGTH }
fn default_highlight_duration() -> u64 { DEFAULT_HIGHLIGHT_DURATION_MS }
fn default_max_locator_length() -> usize { DEFAULT_MAX_LOCATOR_LENGTH }
fn default_generic_classes() -> Vec<String> { SynthesisOptions::default().generic_classes }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders
// ============================================================================

impl AppConfig {
    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            max_text_length: self.limits.max_text_length,
            max_locator_length: self.limits.max_locator_length,
            id_policy: if self.policy.reject_dynamic_ids {
                IdPolicy::RejectTrailingDigits
            } else {
                IdPolicy::TrustAll
            },
            generic_classes: self.policy.generic_classes.clone(),
        }
    }

    pub fn selection_options(&self, prefer_identifier: bool) -> SelectionOptions {
        SelectionOptions {
            synthesis: self.synthesis_options(),
            prefer_identifier,
            highlight_duration_ms: self.limits.highlight_duration_ms,
            ..SelectionOptions::default()
        }
    }

    /// API key from the config file, else from `GEMINI_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.ai
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }

    pub fn gemini_backend(&self) -> GeminiBackend {
        GeminiBackend::new(
            &self.ai.base_url,
            &self.ai.model,
            &self.api_key().unwrap_or_default(),
        )
    }
}
