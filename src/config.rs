use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MODE_FILE: &str = ".cinedrome-mode";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub image_base: String,
    pub timeout: Duration,
    pub mode_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            mode_file: PathBuf::from(DEFAULT_MODE_FILE),
        }
    }
}

impl Config {
    /// Reads `CINEDROME_*` variables, falling back to the defaults above.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let timeout = match get("CINEDROME_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("CINEDROME_TIMEOUT_SECS is not a number: {raw}"))?;
                if secs == 0 {
                    anyhow::bail!("CINEDROME_TIMEOUT_SECS must be at least 1 second");
                }
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };

        Ok(Self {
            api_url: get("CINEDROME_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            image_base: get("CINEDROME_IMAGE_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.image_base),
            timeout,
            mode_file: get("CINEDROME_MODE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.mode_file),
        })
    }
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
    fn falls_back_to_defaults() {
        let cfg = Config::from_lookup(lookup(&[])).expect("defaults load");
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.image_base, DEFAULT_IMAGE_BASE);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert_eq!(cfg.mode_file, PathBuf::from(DEFAULT_MODE_FILE));
    }

    #[test]
    fn trims_trailing_slashes_and_ignores_blank_values() {
        let cfg = Config::from_lookup(lookup(&[
            ("CINEDROME_API_URL", "http://films.local/api/"),
            ("CINEDROME_IMAGE_BASE", "  "),
            ("CINEDROME_TIMEOUT_SECS", "3"),
        ]))
        .expect("config loads");
        assert_eq!(cfg.api_url, "http://films.local/api");
        assert_eq!(cfg.image_base, DEFAULT_IMAGE_BASE);
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err = Config::from_lookup(lookup(&[("CINEDROME_TIMEOUT_SECS", "soon")]))
            .expect_err("timeout must be numeric");
        assert!(err.to_string().contains("CINEDROME_TIMEOUT_SECS"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_lookup(lookup(&[("CINEDROME_TIMEOUT_SECS", "0")]))
            .expect_err("zero would time out every request");
        assert!(err.to_string().contains("at least 1 second"));
    }
}
