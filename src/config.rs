use anyhow::Result;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const CHART_FILE_NAME: &str = "visualization.svg";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    /// Default credential for new sessions. Empty values count as absent.
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

// Keeps the key out of start-up logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<set>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub output_dir: PathBuf,
}

impl ChartConfig {
    /// Fixed location of the visualization artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(CHART_FILE_NAME)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "8501").parse()?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: var("ALLOWED_ORIGINS", "http://localhost:8501")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            llm: LLMConfig {
                gemini_api_key: lookup("GEMINI_API_KEY")
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty()),
                model: var("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                api_base: var("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                request_timeout_secs: var("LLM_REQUEST_TIMEOUT_SECS", "60").parse()?,
                connect_timeout_secs: var("LLM_CONNECT_TIMEOUT_SECS", "10").parse()?,
            },
            charts: ChartConfig {
                output_dir: PathBuf::from(var("CHART_DIR", "charts")),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.llm.gemini_api_key.is_none());
        assert_eq!(config.llm.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.llm.api_base, DEFAULT_GEMINI_API_BASE);
        assert_eq!(config.llm.request_timeout_secs, 60);
        assert_eq!(config.charts.artifact_path(), PathBuf::from("charts").join(CHART_FILE_NAME));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("GEMINI_API_KEY", "  abc123 "),
            ("GEMINI_API_BASE", "http://127.0.0.1:1234/"),
            ("LLM_REQUEST_TIMEOUT_SECS", "5"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test,"),
            ("CHART_DIR", "/tmp/luna"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.gemini_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.llm.api_base, "http://127.0.0.1:1234");
        assert_eq!(config.llm.request_timeout_secs, 5);
        assert_eq!(config.server.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.charts.output_dir, PathBuf::from("/tmp/luna"));
    }

    #[test]
    fn test_blank_key_is_absent() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(config.llm.gemini_api_key.is_none());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_debug_masks_key() {
        let llm = LLMConfig {
            gemini_api_key: Some("super-secret".to_string()),
            ..LLMConfig::default()
        };
        let rendered = format!("{:?}", llm);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<set>"));
    }
}
