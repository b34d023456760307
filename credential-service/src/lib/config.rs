use std::env;
use std::fmt;
use std::path::PathBuf;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON document holding the user records
    pub path: PathBuf,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub expiration_seconds: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"***")
            .field("expiration_seconds", &self.expiration_seconds)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// Argon2 time cost
    pub work_factor: u32,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `JWT_SECRET`
    /// 2. Environment variables (APP__SERVER__HTTP_PORT, APP__STORAGE__PATH, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    /// 5. Built-in defaults
    ///
    /// # Errors
    /// Fails when a source cannot be parsed or when `validate` rejects the result,
    /// in particular when no signing secret is configured.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 3000)?
            .set_default("storage.path", "data/db.json")?
            .set_default("jwt.expiration_seconds", 3600)?
            .set_default("password.work_factor", 10)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: APP__STORAGE__PATH=/var/lib/app/db.json overrides storage.path
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("jwt.secret", env::var("JWT_SECRET").ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations that cannot issue tokens safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "JWT signing secret is not set (set JWT_SECRET)".to_string(),
            ));
        }
        if self.jwt.expiration_seconds <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_seconds must be positive, got {}",
                self.jwt.expiration_seconds
            )));
        }
        if self.password.work_factor == 0 {
            return Err(ConfigError::Message(
                "password.work_factor must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: [(&str, Option<&str>); 4] = [
        ("RUN_MODE", Some("test")),
        ("APP__JWT__SECRET", None),
        ("APP__JWT__EXPIRATION_SECONDS", None),
        ("APP__PASSWORD__WORK_FACTOR", None),
    ];

    fn with_env<R>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
        let mut all: Vec<(&str, Option<&str>)> = CLEAR.to_vec();
        all.extend_from_slice(vars);
        temp_env::with_vars(all, f)
    }

    #[test]
    fn test_load_with_secret_from_environment() {
        let config = with_env(&[("JWT_SECRET", Some("env-secret"))], Config::load)
            .expect("Failed to load config");

        assert_eq!(config.jwt.secret, "env-secret");
        assert_eq!(config.jwt.expiration_seconds, 3600);
        assert_eq!(config.password.work_factor, 10);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = with_env(&[("JWT_SECRET", None)], Config::load);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let result = with_env(&[("JWT_SECRET", Some("  "))], Config::load);
        assert!(result.is_err());
    }

    #[test]
    fn test_nested_environment_override() {
        let config = with_env(
            &[
                ("JWT_SECRET", Some("env-secret")),
                ("APP__PASSWORD__WORK_FACTOR", Some("3")),
            ],
            Config::load,
        )
        .expect("Failed to load config");

        assert_eq!(config.password.work_factor, 3);
    }

    #[test]
    fn test_unprefixed_variables_are_ignored() {
        let config = with_env(
            &[
                ("JWT_SECRET", Some("env-secret")),
                ("PASSWORD", Some("hunter2")),
                ("JWT", Some("unrelated")),
                ("PASSWORD__WORK_FACTOR", Some("7")),
                ("SERVER__HTTP_PORT", Some("9999")),
            ],
            Config::load,
        )
        .expect("Failed to load config");

        assert_eq!(config.password.work_factor, 10);
        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.jwt.secret, "env-secret");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let jwt = JwtConfig {
            secret: "hunter2".to_string(),
            expiration_seconds: 3600,
        };
        assert!(!format!("{:?}", jwt).contains("hunter2"));
    }
}
