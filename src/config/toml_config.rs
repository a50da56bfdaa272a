use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AvailabilityError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LOOKUP_URL: &str =
    "http://fparcel.net:59/WebServiceExterne/tracking_position_STG";
pub const DEFAULT_UPDATE_URL: &str =
    "http://fparcel.net:59/WebServiceExterne/update_availability_STG";
pub const DEFAULT_NOT_FOUND_SENTINEL: &str = "inexistant";
pub const DEFAULT_SUCCESS_SENTINEL: &str = "success";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
    #[serde(default = "default_update_url")]
    pub update_url: String,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub sentinels: SentinelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    #[serde(default = "default_not_found")]
    pub not_found: String,
    #[serde(default = "default_success")]
    pub success: String,
    /// When set, lookup bodies must equal this value to count as a match.
    pub exists: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_lookup_url() -> String {
    DEFAULT_LOOKUP_URL.to_string()
}

fn default_update_url() -> String {
    DEFAULT_UPDATE_URL.to_string()
}

fn default_not_found() -> String {
    DEFAULT_NOT_FOUND_SENTINEL.to_string()
}

fn default_success() -> String {
    DEFAULT_SUCCESS_SENTINEL.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            lookup_url: default_lookup_url(),
            update_url: default_update_url(),
            timeout_seconds: None,
            sentinels: SentinelConfig::default(),
        }
    }
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            not_found: default_not_found(),
            success: default_success(),
            exists: None,
        }
    }
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AvailabilityError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AvailabilityError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("service.lookup_url", &self.service.lookup_url)?;
        validation::validate_url("service.update_url", &self.service.update_url)?;

        if let Some(timeout) = self.service.timeout_seconds {
            validation::validate_positive_number("service.timeout_seconds", timeout, 1)?;
        }

        let sentinels = &self.service.sentinels;
        validation::validate_non_empty_string("service.sentinels.not_found", &sentinels.not_found)?;
        validation::validate_non_empty_string("service.sentinels.success", &sentinels.success)?;
        if let Some(exists) = &sentinels.exists {
            validation::validate_non_empty_string("service.sentinels.exists", exists)?;
            if *exists == sentinels.not_found {
                return Err(AvailabilityError::InvalidConfigValueError {
                    field: "service.sentinels.exists".to_string(),
                    value: exists.clone(),
                    reason: "Must differ from service.sentinels.not_found".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn lookup_url(&self) -> &str {
        &self.service.lookup_url
    }

    fn update_url(&self) -> &str {
        &self.service.update_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.service.timeout_seconds.map(Duration::from_secs)
    }

    fn not_found_sentinel(&self) -> &str {
        &self.service.sentinels.not_found
    }

    fn success_sentinel(&self) -> &str {
        &self.service.sentinels.success
    }

    fn exists_sentinel(&self) -> Option<&str> {
        self.service.sentinels.exists.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
