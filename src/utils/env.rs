// src/utils/env.rs
use log::{debug, info, warn};
use std::env;
use std::path::Path;
use std::str::FromStr;

const ENV_PATHS: [&str; 3] = [".env", ".env.local", "../.env"];

/// Loads the first `.env` file found. Variables already set in the process win.
pub fn load_env() {
    for path in ENV_PATHS.iter() {
        if !Path::new(path).exists() {
            continue;
        }
        match dotenv::from_path(path) {
            Ok(()) => {
                info!("Loaded environment variables from {}", path);
                return;
            }
            Err(e) => warn!("Failed to load environment from {}: {}", path, e),
        }
    }
    info!("No .env file found, using environment variables from system");
}

/// Reads and parses `key`, falling back to `default` when unset or unparsable.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring unparsable value for {}: {:?}", key, raw);
                default
            }
        },
        Err(_) => {
            debug!("{} not set, using default", key);
            default
        }
    }
}

/// Comma-separated list, trimmed, empty entries dropped.
pub fn env_list(key: &str) -> Vec<String> {
    env::var(key)
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_helpers() {
        env::set_var("UNIFICATION_TEST_NUMBER", " 12 ");
        env::set_var("UNIFICATION_TEST_BAD_BOOL", "maybe");
        env::set_var("UNIFICATION_TEST_LIST", "greenmotion, usave,,");

        assert_eq!(env_or("UNIFICATION_TEST_NUMBER", 3usize), 12);
        assert!(env_or("UNIFICATION_TEST_BAD_BOOL", true));
        assert!(!env_or("UNIFICATION_TEST_UNSET_FLAG", false));
        assert_eq!(env_list("UNIFICATION_TEST_LIST"), vec!["greenmotion", "usave"]);
        assert!(env_list("UNIFICATION_TEST_UNSET_LIST").is_empty());

        env::remove_var("UNIFICATION_TEST_NUMBER");
        env::remove_var("UNIFICATION_TEST_BAD_BOOL");
        env::remove_var("UNIFICATION_TEST_LIST");
    }
}
