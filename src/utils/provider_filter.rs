//! Provider-based filtering for the aggregation pipeline
//! Restricts a run to listings from an allow-list of suppliers

use log::{debug, info};

use crate::models::location::RawLocation;
use crate::utils::env::{env_list, env_or};

#[derive(Debug, Clone)]
pub struct ProviderFilterConfig {
    pub enabled: bool,
    pub allowed_providers: Vec<String>,
    /// Keep the internal catalog even when it is not named in `allowed_providers`.
    pub include_internal: bool,
}

impl Default for ProviderFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_providers: Vec::new(),
            include_internal: true,
        }
    }
}

impl ProviderFilterConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let enabled = env_or("PROVIDER_FILTER_ENABLED", false);
        let allowed_providers = if enabled {
            env_list("ALLOWED_PROVIDERS")
        } else {
            Vec::new()
        };
        let include_internal = env_or("PROVIDER_FILTER_INCLUDE_INTERNAL", true);

        debug!(
            "Provider filter config: enabled={}, providers={:?}, include_internal={}",
            enabled, allowed_providers, include_internal
        );

        Self {
            enabled,
            allowed_providers,
            include_internal,
        }
    }

    pub fn is_active(&self) -> bool {
        self.enabled && !self.allowed_providers.is_empty()
    }

    pub fn allows(&self, location: &RawLocation) -> bool {
        if !self.is_active() {
            return true;
        }
        if location.is_internal() && self.include_internal {
            return true;
        }
        self.allowed_providers
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&location.source))
    }

    /// Returns the kept records (input order preserved) and how many were dropped.
    pub fn apply(&self, locations: Vec<RawLocation>) -> (Vec<RawLocation>, usize) {
        if !self.is_active() {
            return (locations, 0);
        }
        let before = locations.len();
        let kept: Vec<RawLocation> = locations.into_iter().filter(|l| self.allows(l)).collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        if self.is_active() {
            info!("🔍 Provider filtering ENABLED");
            info!("   Allowed providers: {:?}", self.allowed_providers);
            info!("   Internal catalog included: {}", self.include_internal);
        } else {
            info!("🔍 Provider filtering DISABLED - unifying listings from every source");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn sample() -> Vec<RawLocation> {
        vec![
            RawLocation::new("internal_1", "internal", "Rome"),
            RawLocation::new("greenmotion_1", "greenmotion", "Fiumicino Airport"),
            RawLocation::new("usave_1", "usave", "Rome Fiumicino Airport"),
            RawLocation::new("locauto_1", "locauto", "Roma Fiumicino"),
        ]
    }

    #[test]
    fn test_config_from_env() {
        env::remove_var("PROVIDER_FILTER_ENABLED");
        env::remove_var("ALLOWED_PROVIDERS");
        env::remove_var("PROVIDER_FILTER_INCLUDE_INTERNAL");

        let config = ProviderFilterConfig::from_env();
        assert!(!config.enabled);
        assert!(config.allowed_providers.is_empty());
        assert!(config.include_internal);

        env::set_var("PROVIDER_FILTER_ENABLED", "true");
        env::set_var("ALLOWED_PROVIDERS", "greenmotion, usave");
        env::set_var("PROVIDER_FILTER_INCLUDE_INTERNAL", "false");

        let config = ProviderFilterConfig::from_env();
        assert!(config.is_active());
        assert_eq!(config.allowed_providers, vec!["greenmotion", "usave"]);
        assert!(!config.include_internal);

        // Cleanup
        env::remove_var("PROVIDER_FILTER_ENABLED");
        env::remove_var("ALLOWED_PROVIDERS");
        env::remove_var("PROVIDER_FILTER_INCLUDE_INTERNAL");
    }

    #[test]
    fn test_inactive_filter_keeps_everything() {
        let config = ProviderFilterConfig {
            enabled: true,
            allowed_providers: vec![],
            include_internal: false,
        };
        let (kept, dropped) = config.apply(sample());
        assert_eq!(kept.len(), 4);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_filter_keeps_allowed_and_internal() {
        let config = ProviderFilterConfig {
            enabled: true,
            allowed_providers: vec!["GreenMotion".to_string()],
            include_internal: true,
        };
        let (kept, dropped) = config.apply(sample());
        let ids: Vec<&str> = kept.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["internal_1", "greenmotion_1"]);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_filter_can_exclude_internal() {
        let config = ProviderFilterConfig {
            enabled: true,
            allowed_providers: vec!["usave".to_string()],
            include_internal: false,
        };
        let (kept, _) = config.apply(sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, "usave");
    }
}
