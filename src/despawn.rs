//! Per-entity despawn conditions
//!
//! Pools only recycle; deciding *when* an entity is done lives here. The
//! coordinator's `sweep` asks a condition about every active handle and
//! releases the ones it flags.

use crate::entity::{Category, EntityHandle};
use crate::placement::Bounds;

/// Decides whether an active entity should go back to its pool
pub trait DespawnCondition {
    fn should_despawn(&self, handle: &EntityHandle) -> bool;
}

impl<F> DespawnCondition for F
where
    F: Fn(&EntityHandle) -> bool,
{
    fn should_despawn(&self, handle: &EntityHandle) -> bool {
        self(handle)
    }
}

/// Fell off the platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BelowHeight {
    pub threshold: f32,
}

impl DespawnCondition for BelowHeight {
    fn should_despawn(&self, handle: &EntityHandle) -> bool {
        handle.position.y < self.threshold
    }
}

/// Wandered outside a rectangle on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutsideBounds(pub Bounds);

impl DespawnCondition for OutsideBounds {
    fn should_despawn(&self, handle: &EntityHandle) -> bool {
        !self.0.contains(handle.footprint())
    }
}

/// Restrict another condition to a single category
#[derive(Debug, Clone, Copy)]
pub struct OnlyCategory<C> {
    pub category: Category,
    pub condition: C,
}

impl<C: DespawnCondition> DespawnCondition for OnlyCategory<C> {
    fn should_despawn(&self, handle: &EntityHandle) -> bool {
        handle.id.category == self.category && self.condition.should_despawn(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::HandleId;
    use glam::{Quat, Vec3};

    fn handle_at(category: Category, position: Vec3) -> EntityHandle {
        let mut handle = EntityHandle::new(HandleId::new(category, 0), 0, Quat::IDENTITY);
        handle.position = position;
        handle.active = true;
        handle
    }

    #[test]
    fn test_below_height() {
        let cond = BelowHeight { threshold: -10.0 };
        assert!(!cond.should_despawn(&handle_at(Category::Enemy, Vec3::new(0.0, 0.1, 0.0))));
        assert!(cond.should_despawn(&handle_at(Category::Enemy, Vec3::new(0.0, -12.0, 0.0))));
    }

    #[test]
    fn test_outside_bounds_ignores_height() {
        let cond = OutsideBounds(Bounds::new(8.0, 5.0));
        assert!(!cond.should_despawn(&handle_at(Category::Enemy, Vec3::new(7.0, 50.0, -4.0))));
        assert!(cond.should_despawn(&handle_at(Category::Enemy, Vec3::new(9.0, 0.0, 0.0))));
    }

    #[test]
    fn test_only_category_and_closures() {
        let cond = OnlyCategory {
            category: Category::Powerup,
            condition: |_: &EntityHandle| true,
        };
        assert!(cond.should_despawn(&handle_at(Category::Powerup, Vec3::ZERO)));
        assert!(!cond.should_despawn(&handle_at(Category::Enemy, Vec3::ZERO)));
    }
}
