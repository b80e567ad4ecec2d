//! # Tree Configuration
//!
//! Settings shared by tree construction and document export. Values come from a YAML or
//! JSON file, from environment variables, or both (environment wins).
//!
//! ## Environment Variables
//!
//! - `ROUTETREE_BASE_PATH`: prefix of the root node, e.g. `/api/v1` (default: empty)
//! - `ROUTETREE_API_TITLE`: `info.title` of exported documents (default: `API`)
//! - `ROUTETREE_API_VERSION`: `info.version` of exported documents (default: `0.1.0`)
//!
//! ## Usage
//!
//! ```rust
//! use routetree::config::TreeConfig;
//!
//! let config = TreeConfig::from_env();
//! println!("base path: {:?}", config.base_path);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Prefix of the root node.
    pub base_path: String,
    pub api_title: String,
    pub api_version: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            api_title: "API".to_string(),
            api_version: "0.1.0".to_string(),
        }
    }
}

impl TreeConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load from a `.yaml`/`.yml`/`.json` file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TreeConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config {}", path.display()))?,
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config {}", path.display()))?,
        };
        Ok(config.with_env_overrides())
    }

    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("ROUTETREE_BASE_PATH") {
            self.base_path = val;
        }
        if let Ok(val) = env::var("ROUTETREE_API_TITLE") {
            self.api_title = val;
        }
        if let Ok(val) = env::var("ROUTETREE_API_VERSION") {
            self.api_version = val;
        }
        self
    }
}
