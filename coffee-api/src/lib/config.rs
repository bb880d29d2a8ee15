use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
    pub max_connections: u32,
    /// Apply pending migrations at startup. Defaults to off in production.
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.username)
            .password(&self.password)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of issued tokens. Unset means tokens carry no `exp` claim.
    #[serde(default)]
    pub expiration_hours: Option<i64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// Require a bearer token on `POST /auth/login` as well.
    pub guard_login: bool,
    /// Reject tokens whose subject no longer exists in the user directory.
    pub verify_subject_exists: bool,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (COFFEE_DATABASE__HOST, COFFEE_JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::build(&run_mode, Self::environment())
    }

    /// Environment variable source used by [`Config::load`].
    pub fn environment() -> Environment {
        Environment::with_prefix("COFFEE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn build(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 3000_i64)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432_i64)?
            .set_default("database.name", "coffeeapp")?
            .set_default("database.username", "coffeeapp")?
            .set_default("database.password", "localpassword")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("database.run_migrations", run_mode != "production")?
            .set_default("auth.guard_login", false)?
            .set_default("auth.verify_subject_exists", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .build()?;

        configuration.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::Map;

    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::environment().source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = Config::build("development", environment(&[])).expect("config");

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "coffeeapp");
        assert!(config.database.run_migrations);
        assert!(config.jwt.expiration_hours.is_none());
        assert!(!config.auth.guard_login);
        assert!(!config.auth.verify_subject_exists);
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::build(
            "development",
            environment(&[
                ("COFFEE_DATABASE__HOST", "db.internal"),
                ("COFFEE_DATABASE__PORT", "6543"),
                ("COFFEE_JWT__SECRET", "from-the-environment-at-least-32-bytes"),
                ("COFFEE_AUTH__GUARD_LOGIN", "true"),
            ]),
        )
        .expect("config");

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.jwt.secret, "from-the-environment-at-least-32-bytes");
        assert!(config.auth.guard_login);
    }

    #[test]
    fn test_production_disables_migrations_by_default() {
        let config = Config::build(
            "production",
            environment(&[("COFFEE_JWT__SECRET", "production-secret-at-least-32-bytes!")]),
        )
        .expect("config");

        assert!(!config.database.run_migrations);
    }

    #[test]
    fn test_production_requires_jwt_secret() {
        let result = Config::build("production", environment(&[]));

        assert!(result.is_err());
    }

    #[test]
    fn test_development_secret_is_not_a_default() {
        let config = Config::build("staging", environment(&[]));

        assert!(config.is_err());
    }
}
