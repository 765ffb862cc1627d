use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

fn default_days() -> Vec<String> {
    ["Søndag", "Mandag", "Tirsdag", "Onsdag", "Torsdag"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn default_household() -> Vec<String> {
    ["Thor", "Line", "Vigga", "Harry", "Yrsa"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_cooking_time() -> u32 {
    30
}

/// User-editable settings, stored as config.json in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_household")]
    pub household: Vec<String>,
    #[serde(default = "default_days")]
    pub days: Vec<String>,
    #[serde(default = "default_cooking_time")]
    pub default_cooking_time: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            model: default_model(),
            household: default_household(),
            days: default_days(),
            default_cooking_time: default_cooking_time(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub settings: Settings,
}

impl Config {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("madplan")
        });

        std::fs::create_dir_all(&data_dir)
            .context("Failed to create data directory")?;

        let settings_file = data_dir.join("config.json");
        let settings = if settings_file.exists() {
            let content = std::fs::read_to_string(&settings_file)
                .context("Failed to read config.json")?;
            serde_json::from_str(&content).context("Invalid config.json")?
        } else {
            Settings::default()
        };

        Ok(Config { data_dir, settings })
    }

    pub fn documents_file(&self) -> PathBuf {
        self.data_dir.join("documents.json")
    }

    pub fn last_plan_file(&self) -> PathBuf {
        self.data_dir.join("last_plan.md")
    }

    /// The Gemini credential, supplied out of band. Missing key is fatal
    /// before any request is attempted.
    pub fn api_key(&self) -> Result<String> {
        std::env::var("GEMINI_API_KEY").map_err(|_| {
            anyhow!("GEMINI_API_KEY er ikke sat. Sæt miljøvariablen og prøv igen.")
        })
    }
}
