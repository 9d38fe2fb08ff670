use crate::workflows::coverage::CoverageConfig;
use crate::workflows::household::ReviewSettings;
use crate::workflows::vetting::CompliancePolicy;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the service and the compliance thresholds it applies.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub review: ReviewSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let format = match env::var("APP_LOG_FORMAT") {
            Ok(value) => LogFormat::parse(&value).ok_or(ConfigError::InvalidLogFormat { value })?,
            Err(_) => LogFormat::Compact,
        };

        let defaults = ReviewSettings::default();
        let policy = CompliancePolicy {
            expiring_soon_days: numeric_var(
                "VETTING_EXPIRING_SOON_DAYS",
                defaults.policy.expiring_soon_days,
            )?,
            overdue_after_days: numeric_var(
                "VETTING_OVERDUE_AFTER_DAYS",
                defaults.policy.overdue_after_days,
            )?,
            minimum_age: numeric_var("VETTING_MINIMUM_AGE", defaults.policy.minimum_age)?,
            certificate_validity_years: numeric_var(
                "VETTING_CERTIFICATE_VALIDITY_YEARS",
                defaults.policy.certificate_validity_years,
            )?,
        };

        let window_years: u32 =
            numeric_var("COVERAGE_WINDOW_YEARS", defaults.coverage.window_years)?;
        if window_years == 0 {
            return Err(ConfigError::InvalidNumber {
                key: "COVERAGE_WINDOW_YEARS",
                value: "0".to_string(),
            });
        }
        let full_coverage_ratio: f64 =
            numeric_var("COVERAGE_FULL_RATIO", defaults.coverage.full_coverage_ratio)?;
        if !(full_coverage_ratio > 0.0 && full_coverage_ratio <= 1.0) {
            return Err(ConfigError::InvalidNumber {
                key: "COVERAGE_FULL_RATIO",
                value: full_coverage_ratio.to_string(),
            });
        }

        let horizon_days = numeric_var("REVIEW_HORIZON_DAYS", defaults.horizon_days)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            review: ReviewSettings {
                policy,
                coverage: CoverageConfig::new(window_years, full_coverage_ratio),
                horizon_days,
            },
        })
    }
}

fn numeric_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" | "" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat { value: String },
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat { value } => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (got '{value}')")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} is out of range or not a number (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat { .. }
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const KEYS: [&str; 12] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_LOG_FORMAT",
        "VETTING_EXPIRING_SOON_DAYS",
        "VETTING_OVERDUE_AFTER_DAYS",
        "VETTING_MINIMUM_AGE",
        "VETTING_CERTIFICATE_VALIDITY_YEARS",
        "COVERAGE_WINDOW_YEARS",
        "COVERAGE_FULL_RATIO",
        "REVIEW_HORIZON_DAYS",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.format, LogFormat::Compact);
        assert_eq!(config.review, ReviewSettings::default());
    }

    #[test]
    fn thresholds_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VETTING_OVERDUE_AFTER_DAYS", "21");
        env::set_var("COVERAGE_WINDOW_YEARS", "3");
        env::set_var("COVERAGE_FULL_RATIO", "1.0");
        env::set_var("APP_LOG_FORMAT", "json");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.review.policy.overdue_after_days, 21);
        assert_eq!(config.review.policy.expiring_soon_days, 90);
        assert_eq!(config.review.coverage.window_years, 3);
        assert_eq!(config.review.coverage.full_coverage_ratio, 1.0);
        assert_eq!(config.telemetry.format, LogFormat::Json);
        reset_env();
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COVERAGE_FULL_RATIO", "1.5");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { key, .. }) => assert_eq!(key, "COVERAGE_FULL_RATIO"),
            other => panic!("expected invalid ratio, got {other:?}"),
        }

        reset_env();
        env::set_var("VETTING_MINIMUM_AGE", "sixteen");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                key: "VETTING_MINIMUM_AGE",
                ..
            })
        ));
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }
}
