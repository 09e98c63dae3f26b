use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBTITLE_API_URL: &str = "https://yt-subtitle-api.herokuapp.com/subtitles";
pub const DEFAULT_TRANSLATE_API_URL: &str = "https://translate.argosopentech.com/translate";
pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub subtitle_api_url: String,
    pub translate_api_url: String,
    pub youtube_api_url: String,
    pub youtube_api_key: Option<String>,
    pub default_lang: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            subtitle_api_url: DEFAULT_SUBTITLE_API_URL.to_string(),
            translate_api_url: DEFAULT_TRANSLATE_API_URL.to_string(),
            youtube_api_url: DEFAULT_YOUTUBE_API_URL.to_string(),
            youtube_api_key: None,
            default_lang: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load config from ~/.config/subtrans/config.toml if it exists.
    ///
    /// A missing YouTube API key falls back to the YOUTUBE_API_KEY
    /// environment variable.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            toml::from_str::<Config>(&content)?
        } else {
            debug!("No config file found at {}", path.display());
            Config::default()
        };

        if config.youtube_api_key.is_none() {
            config.youtube_api_key = std::env::var("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty());
        }

        Ok(config)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("subtrans")
        .join("config.toml")
}
