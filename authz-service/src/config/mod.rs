use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthzConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub token: TokenConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    /// Signing secret. Rotating it invalidates every outstanding token.
    pub secret: String,
    pub access_token_expiration_ms: i64,
    pub refresh_token_expiration_ms: i64,
    pub issuer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Upper bound on membership/role/grant resolution per authorize call.
    pub resolution_timeout_ms: u64,
}

impl AuthzConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AuthzConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("authz-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            token: TokenConfig {
                // No default: the secret must always be provided explicitly.
                secret: get_env("TOKEN_SECRET", None, is_prod)?,
                access_token_expiration_ms: get_env(
                    "TOKEN_ACCESS_EXPIRATION_MS",
                    Some("3600000"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
                refresh_token_expiration_ms: get_env(
                    "TOKEN_REFRESH_EXPIRATION_MS",
                    Some("86400000"),
                    is_prod,
                )?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
                issuer: get_env("TOKEN_ISSUER", Some("atlas-platform"), is_prod)?,
            },
            resolver: ResolverConfig {
                resolution_timeout_ms: get_env("RESOLUTION_TIMEOUT_MS", Some("2000"), is_prod)?
                    .parse()
                    .map_err(|e: std::num::ParseIntError| {
                        AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                    })?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.token.secret.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_SECRET must not be empty"
            )));
        }

        if self.token.access_token_expiration_ms <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_ACCESS_EXPIRATION_MS must be positive"
            )));
        }

        if self.token.refresh_token_expiration_ms <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_REFRESH_EXPIRATION_MS must be positive"
            )));
        }

        if self.resolver.resolution_timeout_ms == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "RESOLUTION_TIMEOUT_MS must be positive"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AuthzConfig {
        AuthzConfig {
            common: core_config::Config {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            environment: Environment::Dev,
            service_name: "authz-service".to_string(),
            service_version: "0.1.0".to_string(),
            log_level: "info".to_string(),
            token: TokenConfig {
                secret: "test-secret".to_string(),
                access_token_expiration_ms: 3_600_000,
                refresh_token_expiration_ms: 86_400_000,
                issuer: "atlas-platform".to_string(),
            },
            resolver: ResolverConfig {
                resolution_timeout_ms: 2_000,
            },
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = base_config();
        config.token.secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_access_expiration_rejected() {
        let mut config = base_config();
        config.token.access_token_expiration_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_refresh_expiration_rejected() {
        let mut config = base_config();
        config.token.refresh_token_expiration_ms = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_resolution_timeout_rejected() {
        let mut config = base_config();
        config.resolver.resolution_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
