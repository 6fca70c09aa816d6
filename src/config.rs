use crate::error::{DispatchError, Result};
use std::collections::HashMap;

/// Runtime configuration for a dispatch system instance.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchConfig {
    /// Deployment environment label (drives log verbosity and format).
    pub environment: String,
    /// Capacity of the notification broadcast channel.
    pub event_channel_capacity: usize,
    /// Populate the registries with the demo fleet at startup.
    pub seed_demo_fleet: bool,
    pub custom_settings: HashMap<String, String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            event_channel_capacity: 256,
            seed_demo_fleet: false,
            custom_settings: HashMap::new(),
        }
    }
}

impl DispatchConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(environment) = std::env::var("DISPATCH_ENV") {
            config.environment = environment;
        }

        if let Ok(capacity) = std::env::var("DISPATCH_EVENT_CAPACITY") {
            config.event_channel_capacity = capacity.parse().map_err(|e| {
                DispatchError::Configuration(format!("Invalid event_channel_capacity: {e}"))
            })?;
        }

        if let Ok(seed) = std::env::var("DISPATCH_SEED_DEMO_FLEET") {
            config.seed_demo_fleet = match seed.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(DispatchError::Configuration(format!(
                        "Invalid seed_demo_fleet: {other}"
                    )))
                }
            };
        }

        Ok(config)
    }
}
