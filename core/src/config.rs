use crate::collection::CollectionStrategy;
use crate::fragmenter::FragmentPolicy;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_array_len")]
    pub array_len: usize,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
    #[serde(default)]
    pub strategy: CollectionStrategy,
    #[serde(default)]
    pub policy: FragmentPolicy,
    /// Fixed shuffle seed; omit for a nondeterministic assignment.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_array_len() -> usize {
    25
}

fn default_num_workers() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            array_len: default_array_len(),
            num_workers: default_num_workers(),
            strategy: CollectionStrategy::default(),
            policy: FragmentPolicy::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }
}
