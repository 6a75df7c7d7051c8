use serde::{Deserialize, Serialize};
use sitekit_editor::EditorConfig;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "sitekit.config.json";

/// Sitekit configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one `<slug>.json` file per site
    #[serde(default = "default_site_dir")]
    pub site_dir: String,

    /// Where rendered pages are written
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Language for sites created by `init`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,

    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_site_dir() -> String {
    "sites".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.editor.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_site_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.site_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_dir: default_site_dir(),
            out_dir: default_out_dir(),
            default_language: None,
            editor: EditorConfig::default(),
        }
    }
}
