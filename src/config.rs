use std::{fs, path::Path};

use log::warn;
use serde::Deserialize;

use crate::{
    assign::MappingKind,
    controller::Controller,
    error::{LoadError, SimError},
    replace::ReplaceKind,
};

/// Run configuration, read from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub capacity: usize,
    #[serde(default)]
    pub trace: Option<String>,
    pub mapping: MappingKind,
    #[serde(default)]
    pub replace: ReplaceKind,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_json(text: &str) -> Result<Config, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Config, LoadError> {
        Config::from_json(&fs::read_to_string(path)?)
    }

    /// Capacity rounded up to a power of two, never below 2.
    pub fn cache_size(&self) -> usize {
        let size = normalize_capacity(self.capacity);
        if size != self.capacity {
            warn!("cache capacity {} rounded up to {}", self.capacity, size);
        }
        size
    }

    /// Algorithm for `mapping`; direct mapping never gets one.
    pub fn replace_for(&self, mapping: MappingKind) -> Option<ReplaceKind> {
        mapping.needs_replacement().then_some(self.replace)
    }

    pub fn to_controller(&self) -> Result<Controller, SimError> {
        Controller::new(
            self.cache_size(),
            self.mapping,
            self.replace_for(self.mapping),
            self.seed,
        )
    }
}

pub fn normalize_capacity(capacity: usize) -> usize {
    capacity.max(2).next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let config = Config::from_json(
            r#"{"capacity": 6, "trace": "pages.txt", "mapping": "set_associative", "replace": "lru", "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(config.cache_size(), 8);
        assert_eq!(config.trace.as_deref(), Some("pages.txt"));
        assert_eq!(config.mapping, MappingKind::SetAssociative);
        assert_eq!(config.replace, ReplaceKind::Lru);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn replacement_defaults_to_fifo_and_is_dropped_for_direct() {
        let config = Config::from_json(r#"{"capacity": 4, "mapping": "direct"}"#).unwrap();
        assert_eq!(config.replace, ReplaceKind::Fifo);
        assert_eq!(config.replace_for(MappingKind::Direct), None);
        assert_eq!(config.replace_for(MappingKind::Associative), Some(ReplaceKind::Fifo));
        let ctrl = config.to_controller().unwrap();
        assert_eq!(ctrl.replacement(), None);
    }

    #[test]
    fn unknown_mapping_is_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"capacity": 4, "mapping": "skewed"}"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn capacities_round_up() {
        let rounded: Vec<_> = [0, 1, 2, 3, 5, 8, 9].map(normalize_capacity).to_vec();
        assert_eq!(rounded, vec![2, 2, 2, 4, 8, 8, 16]);
    }
}
