use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "heistkit.toml";
pub const DEFAULT_SOURCE_DIR: &str = "locales";
pub const DEFAULT_OUTPUT_DIR: &str = "public/locales";
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8000/graphql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable that overrides `api.bearer_token`.
pub const API_TOKEN_ENV: &str = "HEISTKIT_API_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HeistkitConfig {
    pub api: Option<ApiCfg>,
    pub locales: Option<LocalesCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCfg {
    pub endpoint: Option<String>,
    pub bearer_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalesCfg {
    pub source_dir: Option<String>,
    pub output_dir: Option<String>,
    pub prune: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl HeistkitConfig {
    pub fn api_endpoint(&self) -> String {
        self.api
            .as_ref()
            .and_then(|a| a.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string())
    }

    pub fn api_token(&self) -> Option<String> {
        std::env::var(API_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api.as_ref().and_then(|a| a.bearer_token.clone()))
    }

    pub fn api_timeout_secs(&self) -> u64 {
        self.api
            .as_ref()
            .and_then(|a| a.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn source_dir(&self) -> PathBuf {
        PathBuf::from(
            self.locales
                .as_ref()
                .and_then(|l| l.source_dir.clone())
                .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string()),
        )
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(
            self.locales
                .as_ref()
                .and_then(|l| l.output_dir.clone())
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        )
    }

    pub fn prune(&self) -> bool {
        self.locales.as_ref().and_then(|l| l.prune).unwrap_or(true)
    }
}

/// Read and parse a single config file. A missing file yields `Ok(None)`.
pub fn load_config_file(path: &Path) -> Result<Option<HeistkitConfig>, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str::<HeistkitConfig>(&text)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Search order: CWD/heistkit.toml, $CONFIG/heistkit/heistkit.toml.
/// Earlier files win field by field; broken files are skipped with a warning.
pub fn load_config() -> HeistkitConfig {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(CONFIG_FILE_NAME));
    }
    if let Some(base) = dirs::config_dir() {
        candidates.push(base.join("heistkit").join(CONFIG_FILE_NAME));
    }
    load_config_from(&candidates)
}

pub fn load_config_from(candidates: &[PathBuf]) -> HeistkitConfig {
    let mut merged = HeistkitConfig::default();
    for path in candidates {
        match load_config_file(path) {
            Ok(Some(cfg)) => {
                tracing::debug!(event = "config_loaded", path = %path.display());
                merged = merge(merged, cfg);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(event = "config_skipped", error = %e),
        }
    }
    merged
}

fn merge(mut a: HeistkitConfig, b: HeistkitConfig) -> HeistkitConfig {
    a.api = merge_opt(a.api, b.api, merge_api);
    a.locales = merge_opt(a.locales, b.locales, merge_locales);
    a
}

fn merge_opt<T>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_api(mut a: ApiCfg, b: ApiCfg) -> ApiCfg {
    if a.endpoint.is_none() {
        a.endpoint = b.endpoint;
    }
    if a.bearer_token.is_none() {
        a.bearer_token = b.bearer_token;
    }
    if a.timeout_secs.is_none() {
        a.timeout_secs = b.timeout_secs;
    }
    a
}

fn merge_locales(mut a: LocalesCfg, b: LocalesCfg) -> LocalesCfg {
    if a.source_dir.is_none() {
        a.source_dir = b.source_dir;
    }
    if a.output_dir.is_none() {
        a.output_dir = b.output_dir;
    }
    if a.prune.is_none() {
        a.prune = b.prune;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_fixed_layout() {
        let cfg = HeistkitConfig::default();
        assert_eq!(cfg.source_dir(), PathBuf::from("locales"));
        assert_eq!(cfg.output_dir(), PathBuf::from("public/locales"));
        assert!(cfg.prune());
        assert_eq!(cfg.api_timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.api_endpoint(), DEFAULT_API_ENDPOINT);
    }

    #[test]
    fn first_file_wins_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("local.toml");
        let global = dir.path().join("global.toml");
        fs::write(
            &local,
            "[locales]\nsource_dir = \"i18n\"\n\n[api]\nendpoint = \"http://api.test/graphql\"\n",
        )
        .unwrap();
        fs::write(
            &global,
            "[locales]\nsource_dir = \"ignored\"\noutput_dir = \"static/i18n\"\nprune = false\n\n[api]\ntimeout_secs = 5\n",
        )
        .unwrap();

        let cfg = load_config_from(&[local, global]);
        assert_eq!(cfg.source_dir(), PathBuf::from("i18n"));
        assert_eq!(cfg.output_dir(), PathBuf::from("static/i18n"));
        assert!(!cfg.prune());
        assert_eq!(cfg.api_endpoint(), "http://api.test/graphql");
        assert_eq!(cfg.api_timeout_secs(), 5);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_config_file(&dir.path().join("nope.toml")).unwrap();
        assert!(res.is_none());
    }

    #[test]
    fn broken_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "[locales\nsource_dir = ").unwrap();
        assert!(matches!(
            load_config_file(&broken),
            Err(ConfigError::Parse { .. })
        ));

        let cfg = load_config_from(&[broken]);
        assert!(cfg.locales.is_none());
    }
}
