//! Pooled entity handles
//!
//! A handle is one reusable slot: identity, variant, transform and the
//! transient physics state that gets cleared whenever it goes back to its pool.

use std::fmt;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Coarse classification of a pool's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Enemy,
    Powerup,
}

impl Category {
    /// Every category, in table order
    pub const ALL: [Category; 2] = [Category::Enemy, Category::Powerup];

    /// Number of categories (size of per-category tables)
    pub const COUNT: usize = Self::ALL.len();

    /// Slot in per-category tables
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Category::Enemy => 0,
            Category::Powerup => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Enemy => "Enemy",
            Category::Powerup => "Powerup",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "enemy" => Some(Category::Enemy),
            "powerup" | "power-up" => Some(Category::Powerup),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index into a pool's variant table
pub type VariantId = u16;

/// Stable identity of a pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId {
    pub category: Category,
    pub index: u32,
}

impl HandleId {
    pub fn new(category: Category, index: u32) -> Self {
        Self { category, index }
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.category, self.index)
    }
}

/// One pooled object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityHandle {
    pub id: HandleId,
    pub variant: VariantId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub rotation: Quat,
    /// Inactive handles are free for reuse and never occupy space
    pub active: bool,
}

impl EntityHandle {
    pub fn new(id: HandleId, variant: VariantId, rotation: Quat) -> Self {
        Self {
            id,
            variant,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            rotation,
            active: false,
        }
    }

    /// Ground-plane footprint used by placement checks (y is ignored)
    #[inline]
    pub fn footprint(&self) -> Vec2 {
        ground_point(self.position)
    }

    /// Zero velocities and restore the given resting orientation
    pub fn reset_physical_state(&mut self, rotation: Quat) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.rotation = rotation;
    }
}

/// Project a world position onto the x/z play surface
#[inline]
pub fn ground_point(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}
