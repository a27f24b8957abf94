use anyhow::Context;
use directories::BaseDirs;
use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};
use suggest_core::{RateLimitPolicy, WidgetConfig};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TmdbFileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub suggestions_limit: Option<usize>,
    pub rate_limit: Option<RateLimitPolicy>,
}

#[derive(Clone, Debug)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub suggestions_limit: usize,
    pub rate_limit: RateLimitPolicy,
}

impl TmdbConfig {
    pub fn from_env_and_file() -> anyhow::Result<Self> {
        let mut file_cfg = None;
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(text) = fs::read_to_string(&path) {
                    match toml::from_str::<TmdbFileConfig>(&text) {
                        Ok(c) => file_cfg = Some(c),
                        Err(e) => {
                            warn!(target: "providers::tmdb", "ignoring {}: {}", path.display(), e)
                        }
                    }
                }
            }
        }
        let proxy = env::var("HTTPS_PROXY")
            .ok()
            .or_else(|| env::var("HTTP_PROXY").ok());
        Self::from_parts(
            env::var("TMDB_API_KEY").ok(),
            env::var("TMDB_BASE_URL").ok(),
            proxy,
            file_cfg.unwrap_or_default(),
        )
    }

    /// Environment values win over the file; the file wins over defaults.
    pub fn from_parts(
        env_api_key: Option<String>,
        env_base_url: Option<String>,
        proxy: Option<String>,
        file: TmdbFileConfig,
    ) -> anyhow::Result<Self> {
        let api_key = env_api_key
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("TMDB_API_KEY not set"))?;
        let base_url = env_base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url).with_context(|| format!("invalid base url: {}", base_url))?;

        Ok(TmdbConfig {
            api_key,
            base_url,
            timeout: Duration::from_millis(file.timeout_ms.unwrap_or(10_000)),
            proxy,
            suggestions_limit: file.suggestions_limit.unwrap_or(5).max(1),
            rate_limit: file.rate_limit.unwrap_or_default(),
        })
    }

    pub fn widget(&self) -> WidgetConfig {
        WidgetConfig {
            suggestions_limit: self.suggestions_limit,
            rate_limit: self.rate_limit,
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        let p = if cfg!(target_os = "windows") {
            base.home_dir().join(".moviesuggest").join("config.toml")
        } else {
            base.config_dir().join("moviesuggest").join("config.toml")
        };
        Some(p)
    }
}
