use std::env;
use std::path::PathBuf;
use std::time::Duration;
use log::info;

use crate::delay_manager::Pacing;
use crate::errors::ConfigError;

pub const DEFAULT_INPUT_PATH: &str = "company_names.txt";
pub const DEFAULT_OUTPUT_PATH: &str = "company_sizes.csv";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything the binary needs, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only needed when some company still has to be looked up.
    pub credentials: Option<Credentials>,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pacing: Pacing,
    pub timeout: Duration,
}

impl Config {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let non_empty = |name: &'static str| lookup(name).filter(|v| !v.is_empty());
        let username = non_empty("LINKEDIN_USERNAME");
        let password = non_empty("LINKEDIN_PASSWORD");
        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (Some(_), None) => return Err(ConfigError::Missing("LINKEDIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("LINKEDIN_USERNAME")),
            (None, None) => None,
        };

        let pacing = match lookup("LINKEDIN_PACING_SECS") {
            Some(value) if !value.trim().is_empty() => parse_pacing(&value)?,
            _ => Pacing::disabled(),
        };

        let timeout_secs = match lookup("LINKEDIN_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "LINKEDIN_TIMEOUT_SECS",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            credentials,
            input_path: lookup("COMPANY_NAMES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
            output_path: lookup("COMPANY_SIZES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            pacing,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn require_credentials(&self) -> Result<Credentials, ConfigError> {
        self.credentials
            .clone()
            .ok_or(ConfigError::Missing("LINKEDIN_USERNAME"))
    }
}

/// Accepts `N` or `MIN-MAX` seconds.
fn parse_pacing(value: &str) -> Result<Pacing, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "LINKEDIN_PACING_SECS",
        value: value.to_string(),
        reason,
    };
    let secs = |s: &str| s.trim().parse::<u64>().map_err(|e| invalid(e.to_string()));

    match value.split_once('-') {
        Some((min, max)) => {
            let (min, max) = (secs(min)?, secs(max)?);
            if min > max {
                return Err(invalid("minimum is larger than maximum".to_string()));
            }
            Ok(Pacing::between(min, max))
        }
        None => {
            let n = secs(value)?;
            Ok(Pacing::between(n, n))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&'static str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    const CREDS: [(&str, &str); 2] = [
        ("LINKEDIN_USERNAME", "me@example.com"),
        ("LINKEDIN_PASSWORD", "hunter2"),
    ];

    #[test]
    fn test_defaults() {
        let config = config_from(&CREDS).unwrap();
        assert_eq!(config.input_path, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert!(!config.pacing.is_enabled());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_half_configured_credentials() {
        let err = config_from(&[("LINKEDIN_USERNAME", "me@example.com")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("LINKEDIN_PASSWORD")));
        let err = config_from(&[("LINKEDIN_PASSWORD", "hunter2")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("LINKEDIN_USERNAME")));
    }

    #[test]
    fn test_credentials_optional_until_required() {
        let config = config_from(&[]).unwrap();
        assert!(config.credentials.is_none());
        assert!(matches!(
            config.require_credentials(),
            Err(ConfigError::Missing("LINKEDIN_USERNAME"))
        ));

        let config = config_from(&CREDS).unwrap();
        assert_eq!(config.require_credentials().unwrap().username, "me@example.com");
    }

    #[test]
    fn test_bad_timeout() {
        let mut vars = CREDS.to_vec();
        vars.push(("LINKEDIN_TIMEOUT_SECS", "abc"));
        assert!(matches!(
            config_from(&vars),
            Err(ConfigError::Invalid { name: "LINKEDIN_TIMEOUT_SECS", .. })
        ));

        let mut vars = CREDS.to_vec();
        vars.push(("LINKEDIN_TIMEOUT_SECS", " 5 "));
        assert_eq!(config_from(&vars).unwrap().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_pacing_and_paths() {
        let mut vars = CREDS.to_vec();
        vars.push(("LINKEDIN_PACING_SECS", "2-5"));
        vars.push(("COMPANY_SIZES_PATH", "/tmp/out.csv"));
        let config = config_from(&vars).unwrap();
        assert_eq!(config.pacing, Pacing::between(2, 5));
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn test_bad_pacing() {
        for bad in ["5-2", "fast", "1-x"] {
            let mut vars = CREDS.to_vec();
            vars.push(("LINKEDIN_PACING_SECS", bad));
            assert!(matches!(config_from(&vars), Err(ConfigError::Invalid { .. })), "{bad}");
        }
    }

    #[test]
    fn test_password_not_in_debug() {
        let config = config_from(&CREDS).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
