use axum_helpers::{CorsConfig, JwtConfig};
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;
use domain_notifications::SmtpConfig;
use domain_users::OtpConfig;

pub use core_config::Environment;

/// Everything the binary reads from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub smtp: SmtpConfig,
    pub otp: OtpConfig,
    /// `RUN_MIGRATIONS`, on by default
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            jwt: JwtConfig::from_env()?,
            cors: CorsConfig::from_env()?,
            smtp: SmtpConfig::from_env()?,
            otp: OtpConfig::from_env()?,
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 4] = [
        ("DATABASE_URL", Some("postgresql://localhost/pharmacy")),
        ("REDIS_URL", Some("redis://localhost:6379")),
        ("JWT_SECRET", Some("pharmacy-config-test-secret-0123456789")),
        ("CORS_ALLOWED_ORIGIN", Some("http://localhost:3000")),
    ];

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars(REQUIRED, || {
            temp_env::with_vars_unset(["RUN_MIGRATIONS", "OTP_TTL_SECS", "APP_ENV"], || {
                let config = Config::from_env().unwrap();
                assert!(config.run_migrations);
                assert_eq!(config.otp.ttl_secs, 300);
                assert_eq!(config.environment, Environment::Development);
                assert_eq!(config.app.name, "pharmacy_api");
            });
        });
    }

    #[test]
    fn test_migrations_can_be_disabled() {
        temp_env::with_vars(REQUIRED, || {
            temp_env::with_var("RUN_MIGRATIONS", Some("false"), || {
                assert!(!Config::from_env().unwrap().run_migrations);
            });
        });
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        temp_env::with_vars(REQUIRED, || {
            temp_env::with_var_unset("JWT_SECRET", || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            });
        });
    }
}
