//! services/portal/src/config.rs
//!
//! Defines the portal's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;
use tutor_portal_core::RemoteFailurePolicy;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// URLs of the remote sheet endpoints, one per resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub teacher: String,
    pub subject: String,
    pub availability: String,
    pub allocation: String,
    pub session: String,
    pub student_log: String,
    pub student: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub endpoints: Endpoints,
    pub state_path: PathBuf,
    pub log_level: Level,
    pub failure_policy: RemoteFailurePolicy,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Remote Endpoints ---
        let endpoints = Endpoints {
            teacher: required("TEACHER_API_URL")?,
            subject: required("SUBJECT_API_URL")?,
            availability: required("AVAILABILITY_API_URL")?,
            allocation: required("ALLOCATION_API_URL")?,
            session: required("SESSION_API_URL")?,
            student_log: required("STUDENT_LOG_API_URL")?,
            student: required("STUDENT_API_URL")?,
        };

        // --- Local State and Logging ---
        let state_path = std::env::var("PORTAL_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./portal_state.json"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Sync Behaviour ---
        let failure_policy = match std::env::var("REMOTE_FAILURE_POLICY") {
            Ok(raw) => raw.parse::<RemoteFailurePolicy>().map_err(|e| {
                ConfigError::InvalidValue("REMOTE_FAILURE_POLICY".to_string(), e)
            })?,
            Err(_) => RemoteFailurePolicy::default(),
        };

        Ok(Self {
            endpoints,
            state_path,
            log_level,
            failure_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL_VARS: [&str; 7] = [
        "TEACHER_API_URL",
        "SUBJECT_API_URL",
        "AVAILABILITY_API_URL",
        "ALLOCATION_API_URL",
        "SESSION_API_URL",
        "STUDENT_LOG_API_URL",
        "STUDENT_API_URL",
    ];

    // Environment variables are process-wide, so every scenario runs in one test.
    #[test]
    fn loads_from_the_environment() {
        for var in URL_VARS {
            std::env::remove_var(var);
        }
        std::env::remove_var("REMOTE_FAILURE_POLICY");
        std::env::remove_var("PORTAL_STATE_PATH");
        std::env::remove_var("RUST_LOG");

        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingVar(ref v)) if v == "TEACHER_API_URL"
        ));

        for var in URL_VARS {
            std::env::set_var(var, format!("https://script.example.com/{}", var.to_lowercase()));
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.endpoints.student, "https://script.example.com/student_api_url");
        assert_eq!(config.state_path, PathBuf::from("./portal_state.json"));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.failure_policy, RemoteFailurePolicy::KeepLocal);

        std::env::set_var("REMOTE_FAILURE_POLICY", "revert");
        assert_eq!(
            Config::from_env().unwrap().failure_policy,
            RemoteFailurePolicy::RevertLocal
        );

        std::env::set_var("REMOTE_FAILURE_POLICY", "never");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue(ref v, _)) if v == "REMOTE_FAILURE_POLICY"
        ));
        std::env::remove_var("REMOTE_FAILURE_POLICY");
    }
}
