//! Configuration management

pub mod credentials;

pub use credentials::{Credentials, SecretString};

use crate::error::{HcxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable holding the CLOVA Studio API key
pub const API_KEY_ENV: &str = "NCP_CLOVASTUDIO_API_KEY";

/// Environment variable holding the API gateway key
pub const APIGW_KEY_ENV: &str = "NCP_APIGW_API_KEY";

/// Environment variable holding the embedding application id
pub const APP_ID_ENV: &str = "NCP_EMB_APP_ID";

/// Public CLOVA Studio gateway
pub const DEFAULT_API_BASE: &str = "https://clovastudio.apigw.ntruss.com";

/// Embedding models served by the CLOVA Studio embedding tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmbeddingModel {
    #[default]
    #[serde(rename = "clir-emb-dolphin")]
    ClirEmbDolphin,
    #[serde(rename = "clir-sts-dolphin")]
    ClirStsDolphin,
}

impl EmbeddingModel {
    pub const ALL: [EmbeddingModel; 2] = [Self::ClirEmbDolphin, Self::ClirStsDolphin];

    /// Name used in the request path
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClirEmbDolphin => "clir-emb-dolphin",
            Self::ClirStsDolphin => "clir-sts-dolphin",
        }
    }

    /// Vector length produced by the model
    pub fn dimensions(&self) -> usize {
        match self {
            Self::ClirEmbDolphin | Self::ClirStsDolphin => 1024,
        }
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingModel {
    type Err = HcxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| {
                let choices: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                HcxError::Config(format!(
                    "invalid model '{}', choose from: {}",
                    s,
                    choices.join(", ")
                ))
            })
    }
}

/// Which published form of the CLOVA Studio app to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStage {
    #[default]
    Test,
    Service,
}

impl AppStage {
    /// Leading path segment for this stage
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Test => "testapp",
            Self::Service => "serviceapp",
        }
    }
}

/// Embedding client configuration
///
/// Credentials left unset here are read from the environment when a client
/// is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Embedding model
    #[serde(default)]
    pub model: EmbeddingModel,

    /// Scheme and host of the API gateway
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Test or service app
    #[serde(default)]
    pub app_stage: AppStage,

    /// CLOVA Studio API key (falls back to `NCP_CLOVASTUDIO_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// API gateway key (falls back to `NCP_APIGW_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apigw_key: Option<SecretString>,

    /// Embedding app id (falls back to `NCP_EMB_APP_ID`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<SecretString>,

    /// Expected vector length, overriding the model default
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Upper bound on in-flight requests during a batch call
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    1
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: EmbeddingModel::default(),
            api_base: default_api_base(),
            app_stage: AppStage::default(),
            api_key: None,
            apigw_key: None,
            app_id: None,
            embedding_dimensions: None,
            timeout_secs: default_timeout(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl EmbeddingsConfig {
    /// Defaults with credentials taken from the environment
    pub fn from_env() -> Self {
        let env = |name: &str| std::env::var(name).ok().map(SecretString::from);
        Self {
            api_key: env(API_KEY_ENV),
            apigw_key: env(APIGW_KEY_ENV),
            app_id: env(APP_ID_ENV),
            ..Self::default()
        }
    }

    /// Load config from default path
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EmbeddingsConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config as YAML. Credentials are written only if set explicitly.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    pub fn with_model(mut self, model: EmbeddingModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_app_stage(mut self, stage: AppStage) -> Self {
        self.app_stage = stage;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key));
        self
    }

    pub fn with_apigw_key(mut self, key: impl Into<String>) -> Self {
        self.apigw_key = Some(SecretString::new(key));
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(SecretString::new(app_id));
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    pub fn with_embedding_dimensions(mut self, dims: usize) -> Self {
        self.embedding_dimensions = Some(dims);
        self
    }

    /// Vector length every response must have
    pub fn dimensions(&self) -> usize {
        self.embedding_dimensions
            .unwrap_or_else(|| self.model.dimensions())
    }

    /// Resolve credentials, falling back to the process environment
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    /// Resolve credentials with a custom lookup for unset values
    pub fn credentials_with<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |explicit: &Option<SecretString>, env: &str| {
            explicit
                .clone()
                .or_else(|| lookup(env).map(SecretString::from))
        };

        Credentials::new(
            resolve(&self.api_key, API_KEY_ENV),
            resolve(&self.apigw_key, APIGW_KEY_ENV),
            resolve(&self.app_id, APP_ID_ENV),
        )
    }

    /// Full embedding URL for the given app id
    pub fn embedding_url(&self, app_id: &str) -> String {
        format!(
            "{}/{}/v1/api-tools/embedding/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.app_stage.path_segment(),
            self.model,
            app_id
        )
    }

    /// Check settings that do not depend on credentials
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(HcxError::Config("timeout_secs must be positive".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(HcxError::Config(
                "max_concurrency must be positive".to_string(),
            ));
        }
        if self.embedding_dimensions == Some(0) {
            return Err(HcxError::Config(
                "embedding_dimensions must be positive".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.api_base)
            .map_err(|e| HcxError::Config(format!("invalid api_base '{}': {}", self.api_base, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HcxError::Config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn full_env() -> impl Fn(&str) -> Option<String> {
        env_of(&[
            (API_KEY_ENV, "k1"),
            (APIGW_KEY_ENV, "k2"),
            (APP_ID_ENV, "a1"),
        ])
    }

    #[test]
    fn test_model_parsing() {
        assert_eq!(
            "clir-emb-dolphin".parse::<EmbeddingModel>().unwrap(),
            EmbeddingModel::ClirEmbDolphin
        );
        assert_eq!(
            "clir-sts-dolphin".parse::<EmbeddingModel>().unwrap(),
            EmbeddingModel::ClirStsDolphin
        );

        let err = "text-embedding-3-small".parse::<EmbeddingModel>().unwrap_err();
        assert!(matches!(err, HcxError::Config(_)));
        assert!(err.to_string().contains("clir-emb-dolphin"));
    }

    #[test]
    fn test_credentials_from_env_lookup() {
        let creds = EmbeddingsConfig::default()
            .credentials_with(full_env())
            .unwrap();
        assert_eq!(creds.api_key(), "k1");
        assert_eq!(creds.apigw_key(), "k2");
        assert_eq!(creds.app_id(), "a1");
    }

    #[test]
    fn test_explicit_credentials_win_over_env() {
        let creds = EmbeddingsConfig::default()
            .with_api_key("explicit")
            .credentials_with(full_env())
            .unwrap();
        assert_eq!(creds.api_key(), "explicit");
        assert_eq!(creds.apigw_key(), "k2");
    }

    #[test]
    fn test_each_missing_credential_is_config_error() {
        for missing in [API_KEY_ENV, APIGW_KEY_ENV, APP_ID_ENV] {
            let mut pairs = vec![(API_KEY_ENV, "k1"), (APIGW_KEY_ENV, "k2"), (APP_ID_ENV, "a1")];
            pairs.retain(|(k, _)| *k != missing);

            let err = EmbeddingsConfig::default()
                .credentials_with(env_of(&pairs))
                .unwrap_err();
            assert!(matches!(err, HcxError::Config(_)));
            assert!(err.to_string().contains(missing), "{} not named in {}", missing, err);
        }
    }

    #[test]
    fn test_empty_credential_is_config_error() {
        let err = EmbeddingsConfig::default()
            .credentials_with(env_of(&[
                (API_KEY_ENV, "k1"),
                (APIGW_KEY_ENV, ""),
                (APP_ID_ENV, "a1"),
            ]))
            .unwrap_err();
        assert!(matches!(err, HcxError::Config(_)));
    }

    #[test]
    fn test_embedding_url() {
        let config = EmbeddingsConfig::default();
        assert_eq!(
            config.embedding_url("a1"),
            "https://clovastudio.apigw.ntruss.com/testapp/v1/api-tools/embedding/clir-emb-dolphin/a1"
        );

        let config = EmbeddingsConfig::default()
            .with_api_base("http://localhost:8080/")
            .with_app_stage(AppStage::Service)
            .with_model(EmbeddingModel::ClirStsDolphin);
        assert_eq!(
            config.embedding_url("app"),
            "http://localhost:8080/serviceapp/v1/api-tools/embedding/clir-sts-dolphin/app"
        );
    }

    #[test]
    fn test_dimensions_override() {
        let config = EmbeddingsConfig::default();
        assert_eq!(config.dimensions(), 1024);
        assert_eq!(config.with_embedding_dimensions(4).dimensions(), 4);
    }

    #[test]
    fn test_validate() {
        assert!(EmbeddingsConfig::default().validate().is_ok());
        assert!(EmbeddingsConfig::default().with_timeout_secs(0).validate().is_err());
        assert!(EmbeddingsConfig::default().with_max_concurrency(0).validate().is_err());
        assert!(EmbeddingsConfig::default()
            .with_embedding_dimensions(0)
            .validate()
            .is_err());
        assert!(EmbeddingsConfig::default()
            .with_api_base("not a url")
            .validate()
            .is_err());
        assert!(EmbeddingsConfig::default()
            .with_api_base("ftp://example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn test_yaml_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");

        let config = EmbeddingsConfig::default()
            .with_model(EmbeddingModel::ClirStsDolphin)
            .with_app_stage(AppStage::Service)
            .with_app_id("a1")
            .with_timeout_secs(5);
        config.save_to(&path).unwrap();

        let loaded = EmbeddingsConfig::load_from(&path).unwrap();
        assert_eq!(loaded.model, EmbeddingModel::ClirStsDolphin);
        assert_eq!(loaded.app_stage, AppStage::Service);
        assert_eq!(loaded.timeout_secs, 5);
        assert_eq!(loaded.app_id.as_ref().map(|s| s.expose()), Some("a1"));
        assert!(loaded.api_key.is_none());
    }

    #[test]
    fn test_yaml_defaults_and_bad_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        std::fs::write(&path, "app_stage: service\n").unwrap();
        let loaded = EmbeddingsConfig::load_from(&path).unwrap();
        assert_eq!(loaded.model, EmbeddingModel::ClirEmbDolphin);
        assert_eq!(loaded.api_base, DEFAULT_API_BASE);
        assert_eq!(loaded.max_concurrency, 1);

        std::fs::write(&path, "model: gpt-embed\n").unwrap();
        let err = EmbeddingsConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, HcxError::Yaml(_)));
    }
}
