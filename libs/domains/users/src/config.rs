use chrono::Duration;
use core_config::{ConfigError, FromEnv, env_parse};

pub const DEFAULT_OTP_TTL_SECS: u64 = 300;

/// How long a one-time code stays valid after it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpConfig {
    pub ttl_secs: u64,
}

impl OtpConfig {
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_secs as i64)
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_OTP_TTL_SECS,
        }
    }
}

impl FromEnv for OtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            ttl_secs: env_parse("OTP_TTL_SECS", &DEFAULT_OTP_TTL_SECS.to_string())?,
        })
    }
}
