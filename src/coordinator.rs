//! Spawn coordinator
//!
//! Owns one pool per category, the placement rules, the player provider and
//! the listener list. `spawn` builds the occupied set from every active handle
//! plus the player, samples a clear point, activates a free handle there and
//! notifies listeners. Failures that only mean "not this cycle" come back as
//! recoverable errors and leave every pool untouched.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{PoolConfig, SpawnConfig};
use crate::despawn::DespawnCondition;
use crate::entity::{Category, HandleId, ground_point};
use crate::error::SpawnError;
use crate::events::{EventBus, SpawnEvent, SubscriptionId};
use crate::placement::PlacementSampler;
use crate::pool::RandomizedPool;

/// Where the player currently is
pub trait PlayerPosition {
    fn player_position(&self) -> Vec3;
}

/// A player that never moves
impl PlayerPosition for Vec3 {
    fn player_position(&self) -> Vec3 {
        *self
    }
}

/// A position cell the host writes every frame
impl PlayerPosition for Rc<Cell<Vec3>> {
    fn player_position(&self) -> Vec3 {
        self.get()
    }
}

/// Pool plus the rules for placing its members
#[derive(Debug, Clone)]
struct Slot {
    pool: RandomizedPool,
    sampler: PlacementSampler,
    spawn_height: f32,
}

/// Orchestrates pools, placement and notifications
#[derive(Debug)]
pub struct SpawnCoordinator<P> {
    slots: [Option<Slot>; Category::COUNT],
    player: P,
    rng: Pcg32,
    events: EventBus,
}

impl<P: PlayerPosition> SpawnCoordinator<P> {
    /// Build every configured pool. Fails on the first pool that cannot be built.
    pub fn new(config: &SpawnConfig, player: P) -> Result<Self, SpawnError> {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let mut slots: [Option<Slot>; Category::COUNT] = Default::default();

        for pool_config in &config.pools {
            slots[pool_config.category.index()] = Some(Self::build_slot(pool_config, &mut rng)?);
        }

        log::info!(
            "Spawn coordinator ready (seed {}, {} pools)",
            config.seed,
            slots.iter().flatten().count()
        );

        Ok(Self {
            slots,
            player,
            rng,
            events: EventBus::new(),
        })
    }

    fn build_slot(config: &PoolConfig, rng: &mut Pcg32) -> Result<Slot, SpawnError> {
        let pool = RandomizedPool::new(config.category, config.variants.clone(), config.capacity, rng)?
            .with_selection(config.selection)
            .with_rest_rotation(config.rest_rotation);
        Ok(Slot {
            pool,
            sampler: config.placement.clone(),
            spawn_height: config.spawn_height,
        })
    }

    /// Try to bring one entity of `category` into play.
    ///
    /// # Panics
    ///
    /// In debug builds, when no pool is configured for `category`.
    pub fn spawn(&mut self, category: Category) -> Result<HandleId, SpawnError> {
        if self.slots[category.index()].is_none() {
            return Err(self.wiring_fault(category));
        }

        let occupied = self.occupied_footprints();
        let Self { slots, rng, events, .. } = self;
        let Some(slot) = slots[category.index()].as_mut() else {
            return Err(SpawnError::InvalidCategory(category));
        };

        let Some(point) = slot.sampler.sample(rng, &occupied) else {
            let err = SpawnError::PlacementFailed {
                category,
                tries: slot.sampler.max_tries,
            };
            log::info!("Spawn skipped: {}", err);
            return Err(err);
        };

        let Some(id) = slot.pool.acquire_inactive(rng) else {
            let err = SpawnError::PoolExhausted { category };
            log::info!("Spawn skipped: {}", err);
            return Err(err);
        };

        let position = Vec3::new(point.x, slot.spawn_height, point.y);
        let variant = slot.pool.activate(id, position)?.variant;
        let event = SpawnEvent::Spawned {
            id,
            variant,
            position,
        };
        log::debug!(
            "Spawned {} ({}) at ({:.2}, {:.2})",
            id,
            slot.pool.variant_name(variant).unwrap_or("?"),
            point.x,
            point.y
        );

        events.emit(&event);
        Ok(id)
    }

    /// Return a handle to its pool.
    ///
    /// Emits `Despawned` only when the handle was active; a second release of
    /// the same handle returns `Ok(false)` and stays silent.
    pub fn release(&mut self, id: HandleId) -> Result<bool, SpawnError> {
        let Some(slot) = self.slots[id.category.index()].as_mut() else {
            return Err(self.wiring_fault(id.category));
        };
        let released = slot.pool.release(id)?;
        if released {
            log::debug!("Despawned {}", id);
            self.events.emit(&SpawnEvent::Despawned { id });
        }
        Ok(released)
    }

    /// Release every active handle the condition flags. Returns how many went back.
    pub fn sweep<C: DespawnCondition + ?Sized>(&mut self, condition: &C) -> usize {
        let doomed: Vec<HandleId> = self
            .slots
            .iter()
            .flatten()
            .flat_map(|slot| slot.pool.iter_active())
            .filter(|handle| condition.should_despawn(handle))
            .map(|handle| handle.id)
            .collect();

        let mut released = 0;
        for id in doomed {
            if let Ok(true) = self.release(id) {
                released += 1;
            }
        }
        released
    }

    /// Active positions for one category (order unspecified)
    pub fn active_positions(&self, category: Category) -> Result<Vec<(HandleId, Vec3)>, SpawnError> {
        self.pool(category).map(RandomizedPool::active_positions)
    }

    /// Every active entity's position plus the player's
    pub fn occupied_positions(&self) -> Vec<Vec3> {
        let mut occupied: Vec<Vec3> = self
            .slots
            .iter()
            .flatten()
            .flat_map(|slot| slot.pool.iter_active().map(|h| h.position))
            .collect();
        occupied.push(self.player.player_position());
        occupied
    }

    fn occupied_footprints(&self) -> Vec<Vec2> {
        self.occupied_positions().into_iter().map(ground_point).collect()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&SpawnEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn pool(&self, category: Category) -> Result<&RandomizedPool, SpawnError> {
        self.slots[category.index()]
            .as_ref()
            .map(|slot| &slot.pool)
            .ok_or(SpawnError::InvalidCategory(category))
    }

    /// Mutable pool access, for the host's physics step
    pub fn pool_mut(&mut self, category: Category) -> Result<&mut RandomizedPool, SpawnError> {
        self.slots[category.index()]
            .as_mut()
            .map(|slot| &mut slot.pool)
            .ok_or(SpawnError::InvalidCategory(category))
    }

    pub fn sampler(&self, category: Category) -> Result<&PlacementSampler, SpawnError> {
        self.slots[category.index()]
            .as_ref()
            .map(|slot| &slot.sampler)
            .ok_or(SpawnError::InvalidCategory(category))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(|c| self.slots[c.index()].is_some())
    }

    /// Active handles across all pools
    pub fn active_count(&self) -> usize {
        self.slots.iter().flatten().map(|s| s.pool.active_count()).sum()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    fn wiring_fault(&self, category: Category) -> SpawnError {
        let err = SpawnError::InvalidCategory(category);
        log::error!("{}", err);
        if cfg!(debug_assertions) {
            panic!("{err}");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolConfig;
    use crate::despawn::BelowHeight;
    use std::cell::RefCell;

    fn config(capacity: usize) -> SpawnConfig {
        let mut enemies = PoolConfig::enemies();
        enemies.capacity = capacity;
        enemies.placement.min_distance = 0.5;
        SpawnConfig {
            seed: 1234,
            pools: vec![enemies, PoolConfig::powerups()],
        }
    }

    #[test]
    fn test_spawn_places_on_surface() {
        let mut coord = SpawnCoordinator::new(&config(3), Vec3::ZERO).unwrap();
        let id = coord.spawn(Category::Enemy).unwrap();
        let handle = coord.pool(Category::Enemy).unwrap().get(id).unwrap();
        assert!(handle.active);
        assert_eq!(handle.position.y, crate::consts::SPAWN_HEIGHT);
        assert!(handle.position.x.abs() <= 8.0 && handle.position.z.abs() <= 5.0);
    }

    #[test]
    fn test_exhausted_pool_leaves_state_alone() {
        let mut coord = SpawnCoordinator::new(&config(2), Vec3::new(100.0, 0.0, 100.0)).unwrap();
        coord.spawn(Category::Enemy).unwrap();
        coord.spawn(Category::Enemy).unwrap();
        let before = coord.active_positions(Category::Enemy).unwrap();

        let err = coord.spawn(Category::Enemy).unwrap_err();
        assert_eq!(err, SpawnError::PoolExhausted { category: Category::Enemy });
        assert!(err.is_recoverable());
        assert_eq!(coord.active_positions(Category::Enemy).unwrap(), before);
    }

    #[test]
    fn test_occupied_includes_player_and_all_pools() {
        let player = Vec3::new(1.0, 0.5, 1.0);
        let mut coord = SpawnCoordinator::new(&config(3), player).unwrap();
        coord.spawn(Category::Enemy).unwrap();
        coord.spawn(Category::Powerup).unwrap();

        let occupied = coord.occupied_positions();
        assert_eq!(occupied.len(), 3);
        assert!(occupied.contains(&player));
    }

    #[test]
    fn test_placement_failure_touches_nothing() {
        let mut cfg = config(3);
        cfg.pools[0].placement.min_distance = 50.0;
        let mut coord = SpawnCoordinator::new(&cfg, Vec3::ZERO).unwrap();

        let err = coord.spawn(Category::Enemy).unwrap_err();
        assert_eq!(
            err,
            SpawnError::PlacementFailed {
                category: Category::Enemy,
                tries: 1000
            }
        );
        assert_eq!(coord.active_count(), 0);
    }

    #[test]
    fn test_release_notifies_once() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut coord = SpawnCoordinator::new(&config(3), Vec3::ZERO).unwrap();
        let sink = Rc::clone(&events);
        coord.subscribe(move |e| sink.borrow_mut().push(*e));

        let id = coord.spawn(Category::Enemy).unwrap();
        assert_eq!(coord.release(id), Ok(true));
        assert_eq!(coord.release(id), Ok(false));

        let events = events.borrow();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SpawnEvent::Spawned { .. }));
        assert_eq!(events[1], SpawnEvent::Despawned { id });
    }

    #[test]
    fn test_sweep_releases_fallen() {
        let mut coord = SpawnCoordinator::new(&config(3), Vec3::new(100.0, 0.0, 100.0)).unwrap();
        let a = coord.spawn(Category::Enemy).unwrap();
        let b = coord.spawn(Category::Enemy).unwrap();

        coord.pool_mut(Category::Enemy).unwrap().get_mut(a).unwrap().position.y = -20.0;
        assert_eq!(coord.sweep(&BelowHeight { threshold: -10.0 }), 1);
        assert!(!coord.pool(Category::Enemy).unwrap().get(a).unwrap().active);
        assert!(coord.pool(Category::Enemy).unwrap().get(b).unwrap().active);
        assert_eq!(coord.sweep(&BelowHeight { threshold: -10.0 }), 0);
    }

    #[test]
    fn test_shared_player_cell() {
        let player = Rc::new(Cell::new(Vec3::ZERO));
        let coord = SpawnCoordinator::new(&config(1), Rc::clone(&player)).unwrap();
        player.set(Vec3::new(3.0, 0.0, -2.0));
        assert_eq!(coord.occupied_positions(), vec![Vec3::new(3.0, 0.0, -2.0)]);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = || {
            let mut coord = SpawnCoordinator::new(&config(5), Vec3::ZERO).unwrap();
            let mut positions = Vec::new();
            for _ in 0..5 {
                if let Ok(id) = coord.spawn(Category::Enemy) {
                    positions.push(coord.pool(Category::Enemy).unwrap().get(id).unwrap().position);
                }
            }
            positions
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_empty_pool_config_is_fatal() {
        let mut cfg = config(3);
        cfg.pools[1].variants.clear();
        let err = SpawnCoordinator::new(&cfg, Vec3::ZERO).unwrap_err();
        assert!(matches!(
            err,
            SpawnError::EmptyConfiguration {
                category: Category::Powerup,
                ..
            }
        ));
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "no pool configured for category Powerup")]
    fn test_missing_pool_panics_in_debug() {
        let mut cfg = config(3);
        cfg.pools.truncate(1);
        let mut coord = SpawnCoordinator::new(&cfg, Vec3::ZERO).unwrap();
        let _ = coord.spawn(Category::Powerup);
    }

    #[test]
    fn test_missing_pool_query_is_error() {
        let mut cfg = config(3);
        cfg.pools.truncate(1);
        let coord = SpawnCoordinator::new(&cfg, Vec3::ZERO).unwrap();
        assert_eq!(
            coord.active_positions(Category::Powerup).unwrap_err(),
            SpawnError::InvalidCategory(Category::Powerup)
        );
        assert_eq!(coord.categories().collect::<Vec<_>>(), vec![Category::Enemy]);
    }
}
