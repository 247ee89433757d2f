use serde::Deserialize;

use crate::domain::partner::Policy;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub partners: PartnersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings of the in-memory partner services
#[derive(Debug, Clone, Deserialize)]
pub struct PartnersConfig {
    /// Prefix of issued partner API keys
    #[serde(default = "default_api_key_prefix")]
    pub api_key_prefix: String,
    /// Days an approved partner API key stays valid
    #[serde(default = "default_api_key_validity_days")]
    pub api_key_validity_days: i64,
    /// Policies available at startup
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicyConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub policy_group: String,
}

impl From<&PolicyConfig> for Policy {
    fn from(config: &PolicyConfig) -> Self {
        Policy::new(&config.id, &config.name, &config.policy_group)
            .with_description(&config.description)
    }
}

fn default_api_key_prefix() -> String {
    "pk_live_".to_string()
}

fn default_api_key_validity_days() -> i64 {
    180
}

fn default_policies() -> Vec<PolicyConfig> {
    vec![
        PolicyConfig {
            id: "mpolicy-default-auth".to_string(),
            name: "Authentication Policy".to_string(),
            description: "Authentication and OTP requests".to_string(),
            policy_group: "default".to_string(),
        },
        PolicyConfig {
            id: "mpolicy-default-ekyc".to_string(),
            name: "eKYC Policy".to_string(),
            description: "Demographic eKYC requests".to_string(),
            policy_group: "default".to_string(),
        },
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for PartnersConfig {
    fn default() -> Self {
        Self {
            api_key_prefix: default_api_key_prefix(),
            api_key_validity_days: default_api_key_validity_days(),
            policies: default_policies(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(source: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.metrics.enabled);
        assert_eq!(config.partners.api_key_prefix, "pk_live_");
        assert_eq!(config.partners.policies.len(), 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [logging]
            level = "debug"
            format = "json"
            "#,
        );

        assert_eq!(config.server.port, 9090);
        assert!(matches!(config.logging.format, LogFormat::Json));
        assert_eq!(config.partners.api_key_validity_days, 180);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_policies_from_file() {
        let config = from_toml(
            r#"
            [partners]
            api_key_prefix = "pk_test_"
            api_key_validity_days = 30

            [[partners.policies]]
            id = "p-1"
            name = "Auth"
            policy_group = "banking"
            "#,
        );

        assert_eq!(config.partners.api_key_prefix, "pk_test_");
        assert_eq!(config.partners.policies.len(), 1);

        let policy = Policy::from(&config.partners.policies[0]);
        assert_eq!(policy.id, "p-1");
        assert_eq!(policy.policy_group, "banking");
        assert!(policy.description.is_empty());
    }
}
