// Runtime configuration: where uploads go and where CSV exports land.
//
// Resolved once at startup. Later sources win:
//   built-in default < config.json < STATEMENT_API_URL < command line.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::selection::Variant;

pub const DEFAULT_API_URL: &str = "https://statement-analyzer-h0x1.onrender.com";
pub const API_URL_ENV: &str = "STATEMENT_API_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the statement service; the variant path is appended.
    pub api_url: String,
    /// Full endpoint URL, used as-is when set.
    pub endpoint: Option<String>,
    pub download_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            endpoint: None,
            download_dir: None,
        }
    }
}

impl Config {
    /// `<config_dir>/statement-uploader/config.json`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("statement-uploader").join("config.json"))
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    /// Load the default file, then apply the environment override.
    pub fn from_env() -> Result<Self> {
        let cfg = match Self::default_path() {
            Some(p) => Self::load_from(&p)?,
            None => Config::default(),
        };
        Ok(cfg.with_api_url(std::env::var(API_URL_ENV).ok()))
    }

    /// Replace the base URL when `url` is a non-blank value.
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn with_download_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.download_dir = dir;
        }
        self
    }

    /// URL the given variant posts to.
    pub fn endpoint_for(&self, variant: Variant) -> String {
        match &self.endpoint {
            Some(url) => url.clone(),
            None => format!(
                "{}{}",
                self.api_url.trim_end_matches('/'),
                variant.endpoint_path()
            ),
        }
    }

    /// Directory CSV exports are written to.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
