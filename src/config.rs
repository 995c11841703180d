//! Environment configuration

use crate::reveal::DEFAULT_SPEED;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the companion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionConfig {
    pub db_path: PathBuf,
    /// Unset means the offline canned responder
    pub inference_url: Option<String>,
    pub inference_timeout: Duration,
    pub reveal_speed: Duration,
    /// Local identity; `None` signs in anonymously
    pub user: Option<String>,
}

impl CompanionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = var("COMPANION_DB_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".health-companion").join("companion.db")
            },
            PathBuf::from,
        );

        let inference_timeout = var("COMPANION_INFERENCE_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse().ok())
            .map_or(DEFAULT_INFERENCE_TIMEOUT, Duration::from_secs);

        let reveal_speed = var("COMPANION_REVEAL_SPEED_MS")
            .and_then(|s| s.trim().parse().ok())
            .map_or(DEFAULT_SPEED, Duration::from_millis);

        Self {
            db_path,
            inference_url: var("COMPANION_INFERENCE_URL").filter(|s| !s.trim().is_empty()),
            inference_timeout,
            reveal_speed,
            user: var("COMPANION_USER")
                .or_else(|| var("USER"))
                .filter(|s| !s.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> CompanionConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CompanionConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[("HOME", "/home/hiro")]);
        assert_eq!(
            config.db_path,
            PathBuf::from("/home/hiro/.health-companion/companion.db")
        );
        assert_eq!(config.inference_url, None);
        assert_eq!(config.inference_timeout, Duration::from_secs(60));
        assert_eq!(config.reveal_speed, Duration::from_millis(2));
        assert_eq!(config.user, None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("COMPANION_DB_PATH", "/var/lib/companion.db"),
            ("COMPANION_INFERENCE_URL", "http://localhost:9000/chat"),
            ("COMPANION_INFERENCE_TIMEOUT_SECS", "5"),
            ("COMPANION_REVEAL_SPEED_MS", "20"),
            ("USER", "tadashi"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/var/lib/companion.db"));
        assert_eq!(
            config.inference_url.as_deref(),
            Some("http://localhost:9000/chat")
        );
        assert_eq!(config.inference_timeout, Duration::from_secs(5));
        assert_eq!(config.reveal_speed, Duration::from_millis(20));
        assert_eq!(config.user.as_deref(), Some("tadashi"));
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = config(&[
            ("COMPANION_INFERENCE_TIMEOUT_SECS", "soon"),
            ("COMPANION_REVEAL_SPEED_MS", "-1"),
            ("COMPANION_INFERENCE_URL", "  "),
        ]);
        assert_eq!(config.inference_timeout, DEFAULT_INFERENCE_TIMEOUT);
        assert_eq!(config.reveal_speed, DEFAULT_SPEED);
        assert_eq!(config.inference_url, None);
    }
}
