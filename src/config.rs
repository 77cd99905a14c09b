//! Session configuration
//!
//! Describes every pool and its placement rules. Loaded from JSON and
//! validated before any pool is built.

use std::path::Path;

use glam::Quat;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::entity::Category;
use crate::error::ConfigError;
use crate::placement::{Bounds, PlacementSampler};
use crate::pool::Selection;

/// One pool and how its members are placed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub category: Category,
    /// Variant names; each handle gets one at random
    pub variants: Vec<String>,
    /// Fixed number of handles
    pub capacity: usize,
    /// Y coordinate new spawns are placed at
    pub spawn_height: f32,
    pub placement: PlacementSampler,
    pub selection: Selection,
    /// Orientation restored when a handle is released
    pub rest_rotation: Quat,
    /// Seconds between scheduled spawns (None = host spawns on its own)
    pub spawn_interval_secs: Option<f32>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::enemies()
    }
}

impl PoolConfig {
    /// Enemy pool matching the stock arena
    pub fn enemies() -> Self {
        Self {
            category: Category::Enemy,
            variants: vec!["roller".into(), "heavy".into()],
            capacity: DEFAULT_ENEMY_CAPACITY,
            spawn_height: SPAWN_HEIGHT,
            placement: PlacementSampler::new(
                Bounds::new(ENEMY_HALF_EXTENTS.0, ENEMY_HALF_EXTENTS.1),
                DEFAULT_MIN_DISTANCE,
            ),
            selection: Selection::FreeList,
            rest_rotation: Quat::IDENTITY,
            spawn_interval_secs: Some(ENEMY_SPAWN_INTERVAL_SECS),
        }
    }

    /// Powerup pool matching the stock arena
    pub fn powerups() -> Self {
        Self {
            category: Category::Powerup,
            variants: vec!["strength".into(), "speed".into(), "shield".into()],
            capacity: DEFAULT_POWERUP_CAPACITY,
            spawn_interval_secs: Some(POWERUP_SPAWN_INTERVAL_SECS),
            ..Self::enemies()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.placement;
        if !p.bounds.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "{} bounds must be finite, non-negative and samplable, got {:?}",
                self.category, p.bounds
            )));
        }
        if !p.min_distance.is_finite() || p.min_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{} min_distance must be finite and non-negative, got {}",
                self.category, p.min_distance
            )));
        }
        if !self.spawn_height.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "{} spawn_height must be finite",
                self.category
            )));
        }
        if let Some(secs) = self.spawn_interval_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} spawn interval must be positive, got {}",
                    self.category, secs
                )));
            }
        }
        Ok(())
    }
}

/// Whole-session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// RNG seed for variants, selection and placement
    pub seed: u64,
    pub pools: Vec<PoolConfig>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            pools: vec![PoolConfig::enemies(), PoolConfig::powerups()],
        }
    }
}

impl SpawnConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded spawn config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Config for the given category, if any
    pub fn pool(&self, category: Category) -> Option<&PoolConfig> {
        self.pools.iter().find(|p| p.category == category)
    }

    /// Structural checks. Empty pools are reported when the pool is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pools.is_empty() {
            return Err(ConfigError::Invalid("no pools configured".into()));
        }
        let mut seen = [false; Category::COUNT];
        for pool in &self.pools {
            let slot = &mut seen[pool.category.index()];
            if *slot {
                return Err(ConfigError::Invalid(format!(
                    "{} pool configured twice",
                    pool.category
                )));
            }
            *slot = true;
            pool.validate()?;
        }
        Ok(())
    }
}
