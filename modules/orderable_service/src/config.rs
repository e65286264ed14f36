//! Configuration for the orderable service module

use serde::Deserialize;

/// Orderable service configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Check that a partition is dense before moving inside it
    #[serde(default = "default_true")]
    pub verify_density: bool,

    /// Maximum number of entities a single partition may hold
    #[serde(default = "default_max_partition_size")]
    pub max_partition_size: usize,

    /// Maximum content name length in characters
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

impl Config {
    /// Parse the module's YAML configuration section
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verify_density: true,
            max_partition_size: default_max_partition_size(),
            max_name_length: default_max_name_length(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_partition_size() -> usize {
    10_000
}

fn default_max_name_length() -> usize {
    255
}
