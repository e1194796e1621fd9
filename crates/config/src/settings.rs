//! Application settings.
//! Loaded from `<config dir>/adsmith/settings.json`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Model identifier passed to the generation endpoint
    #[serde(rename = "ai.model")]
    pub model: String,

    /// Optional prompt-template override; the built-in template is used
    /// when unset
    #[serde(rename = "ai.promptTemplate", skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<PathBuf>,

    /// Default ad tone when the caller does not specify one
    #[serde(rename = "ads.tone")]
    pub tone: String,

    /// Default maximum ad length in characters
    #[serde(rename = "ads.maxLength")]
    pub max_length: u32,

    /// Default target platform
    #[serde(rename = "ads.platform")]
    pub platform: String,

    /// Override for the Gemini API base URL (proxies, testing)
    #[serde(rename = "endpoints.geminiApiBase", skip_serializing_if = "Option::is_none")]
    pub gemini_api_base: Option<String>,

    /// Override for the Sheets API base URL (proxies, testing)
    #[serde(rename = "endpoints.sheetsApiBase", skip_serializing_if = "Option::is_none")]
    pub sheets_api_base: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash-latest".to_string(),
            prompt_template: None,
            tone: "Professional".to_string(),
            max_length: 150,
            platform: "Facebook".to_string(),
            gemini_api_base: None,
            sheets_api_base: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("adsmith")
            .join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from an explicit path, falling back to defaults
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        eprintln!("Error parsing {}: {}", path.display(), e);
                        eprintln!("Using default settings");
                        Self::default()
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, json).map_err(|e| e.to_string())
    }
}
