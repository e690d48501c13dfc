use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {}: {}", path.display(), source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("config is missing the `{0}` section")]
    MissingSection(&'static str),
    #[error("openai type `azure` requires `azure_endpoint` and `azure_apiversion`")]
    IncompleteAzure,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub kubernetes: KubernetesConfig,
    pub email: Option<EmailConfig>,
    pub slack: Option<SlackConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// Provider kind: `azure` selects the regional endpoint, anything else
    /// the standard hosted one.
    #[serde(rename = "type")]
    pub kind: String,
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub azure_endpoint: Option<String>,
    #[serde(default)]
    pub azure_apiversion: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KubernetesConfig {
    pub kubeconfig: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub from_email: String,
    pub to_email: String,
    pub subject: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    pub webhook_url: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    openai: Option<OpenAiConfig>,
    #[serde(default)]
    kubernetes: Option<KubernetesConfig>,
    #[serde(default)]
    email: Option<EmailConfig>,
    #[serde(default)]
    slack: Option<SlackConfig>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawConfig = serde_yaml::from_str(&data)?;

        Ok(Config {
            openai: raw.openai.ok_or(ConfigError::MissingSection("openai"))?,
            kubernetes: raw
                .kubernetes
                .ok_or(ConfigError::MissingSection("kubernetes"))?,
            email: raw.email,
            slack: raw.slack,
        })
    }
}
