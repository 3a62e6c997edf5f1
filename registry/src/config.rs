//! Configuration for the security registry

use serde::{Deserialize, Serialize};

/// Registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Organization allowed to submit calendar entries
    pub operator_org: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            operator_org: "depository".to_string(),
        }
    }
}

impl Config {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(org) = std::env::var("REGISTRY_OPERATOR_ORG") {
            config.operator_org = org;
        }

        config
    }
}
