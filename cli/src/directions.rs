//! JSON file backed direction store

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use market_model::{Direction, DirectionStore, InMemoryDirectionStore};

use crate::config::PreviewConfig;

/// Store read from `{ "<market address>": "above" | "below" }`
#[derive(Debug, Clone)]
pub struct JsonDirectionStore {
    entries: InMemoryDirectionStore,
}

impl JsonDirectionStore {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read direction store: {}", path.display()))?;
        let entries: HashMap<String, Direction> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse direction store: {}", path.display()))?;

        log::debug!("loaded {} market directions from {}", entries.len(), path.display());
        Ok(Self {
            entries: entries.into(),
        })
    }
}

impl DirectionStore for JsonDirectionStore {
    fn get(&self, market_address: &str) -> Option<Direction> {
        self.entries.get(market_address)
    }
}

/// The configured store, or an empty one so every lookup falls back
pub fn open_store(config: &PreviewConfig) -> Result<Box<dyn DirectionStore>> {
    match &config.direction_store {
        Some(path) => Ok(Box::new(JsonDirectionStore::load(path)?)),
        None => Ok(Box::new(InMemoryDirectionStore::new())),
    }
}
