//! Runtime configuration, read once from the environment.
//!
//! | variable             | default                       |
//! |----------------------|-------------------------------|
//! | `API_BASE_URL`       | `http://localhost:8000`       |
//! | `PIPER_DOWNLOAD_DIR` | the user's download directory |

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend base URL, without a trailing slash.
    pub api_base_url: String,
    /// Where generated audio is saved by the download button.
    pub download_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            download_dir: default_download_dir(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get("API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let download_dir = get("PIPER_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);

        Self {
            api_base_url,
            download_dir,
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.download_dir, default_download_dir());
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let config = AppConfig::from_lookup(lookup(&[("API_BASE_URL", "http://tts:8000/")]));
        assert_eq!(config.api_base_url, "http://tts:8000");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "  "),
            ("PIPER_DOWNLOAD_DIR", "/tmp/piper-audio"),
        ]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.download_dir, PathBuf::from("/tmp/piper-audio"));
    }
}
