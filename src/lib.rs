//! Spawn Pool - pooled enemy/powerup spawning for a small arena
//!
//! Core modules:
//! - `entity`: Pooled handles (identity, variant, transform, physics state)
//! - `pool`: Fixed-capacity pools with randomized reuse
//! - `placement`: Rejection-sampled spawn points
//! - `coordinator`: Spawn/release orchestration and notifications
//! - `despawn`: Per-entity despawn conditions
//! - `schedule`: Fixed-interval spawn timers
//! - `config`: Data-driven pool and placement settings

pub mod config;
pub mod coordinator;
pub mod despawn;
pub mod entity;
pub mod error;
pub mod events;
pub mod placement;
pub mod pool;
pub mod schedule;

pub use config::{PoolConfig, SpawnConfig};
pub use coordinator::{PlayerPosition, SpawnCoordinator};
pub use despawn::{BelowHeight, DespawnCondition, OnlyCategory, OutsideBounds};
pub use entity::{Category, EntityHandle, HandleId, VariantId};
pub use error::{ConfigError, SpawnError};
pub use events::{EventBus, SpawnEvent, SubscriptionId};
pub use placement::{Bounds, Exclusion, PlacementSampler};
pub use pool::{RandomizedPool, Selection};
pub use schedule::SpawnTimer;

/// Arena and spawning defaults
pub mod consts {
    /// Fixed simulation timestep (50 Hz physics)
    pub const SIM_DT: f32 = 1.0 / 50.0;

    /// Spawn rectangle half extents (x, z) around the platform centre
    pub const ENEMY_HALF_EXTENTS: (f32, f32) = (8.0, 5.0);
    /// Spawns sit just above the platform
    pub const SPAWN_HEIGHT: f32 = 0.1;
    /// Minimum per-axis clearance from anything already occupied
    pub const DEFAULT_MIN_DISTANCE: f32 = 2.0;
    /// Rejection sampling budget per spawn
    pub const DEFAULT_MAX_TRIES: u32 = 1000;

    pub const DEFAULT_ENEMY_CAPACITY: usize = 10;
    pub const DEFAULT_POWERUP_CAPACITY: usize = 3;

    /// Seconds between enemy spawns
    pub const ENEMY_SPAWN_INTERVAL_SECS: f32 = 3.0;
    /// Seconds between powerup spawns
    pub const POWERUP_SPAWN_INTERVAL_SECS: f32 = 7.0;
    /// Most spawns a timer reports from one advance
    pub const MAX_SPAWNS_PER_ADVANCE: u32 = 16;

    /// Anything below this height has fallen off the platform
    pub const FALL_THRESHOLD: f32 = -25.0;
}
