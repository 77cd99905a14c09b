//! Fixed-capacity pool of reusable entity handles
//!
//! The pool is filled once at startup and never grows. Spawning picks a
//! uniformly random inactive handle so that the variant mix handed out does
//! not depend on where a handle happens to sit in the backing storage.

use glam::{Quat, Vec3};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::entity::{Category, EntityHandle, HandleId, VariantId};
use crate::error::SpawnError;

/// How `acquire_inactive` picks among free handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    /// Random pick from the free-index set, O(1)
    #[default]
    FreeList,
    /// Fresh random permutation per call, first inactive entry wins, O(n)
    ShuffleScan,
}

/// A pool of handles belonging to one category
#[derive(Debug, Clone)]
pub struct RandomizedPool {
    category: Category,
    variants: Vec<String>,
    handles: Vec<EntityHandle>,
    /// Indices of inactive handles (unordered)
    free: Vec<u32>,
    /// Position of each handle inside `free`, None while active
    free_slot: Vec<Option<usize>>,
    rest_rotation: Quat,
    selection: Selection,
}

impl RandomizedPool {
    /// Create `capacity` inactive handles with uniformly random variants
    pub fn new<R: Rng + ?Sized>(
        category: Category,
        variants: Vec<String>,
        capacity: usize,
        rng: &mut R,
    ) -> Result<Self, SpawnError> {
        if capacity == 0 {
            return Err(SpawnError::EmptyConfiguration {
                category,
                reason: "capacity is zero".into(),
            });
        }
        if variants.is_empty() {
            return Err(SpawnError::EmptyConfiguration {
                category,
                reason: "no variants".into(),
            });
        }
        if variants.len() > VariantId::MAX as usize + 1 {
            return Err(SpawnError::EmptyConfiguration {
                category,
                reason: format!("too many variants ({})", variants.len()),
            });
        }
        if u32::try_from(capacity).is_err() {
            return Err(SpawnError::EmptyConfiguration {
                category,
                reason: format!("capacity {capacity} out of range"),
            });
        }

        let rest_rotation = Quat::IDENTITY;
        let handles: Vec<EntityHandle> = (0..capacity as u32)
            .map(|index| {
                let variant = rng.random_range(0..variants.len()) as VariantId;
                EntityHandle::new(HandleId::new(category, index), variant, rest_rotation)
            })
            .collect();

        log::info!("{} pool ready: {} handles, {} variants", category, capacity, variants.len());

        Ok(Self {
            category,
            variants,
            handles,
            free: (0..capacity as u32).collect(),
            free_slot: (0..capacity).map(Some).collect(),
            rest_rotation,
            selection: Selection::default(),
        })
    }

    /// Use a different selection strategy
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Orientation restored on every release
    pub fn with_rest_rotation(mut self, rotation: Quat) -> Self {
        self.rest_rotation = rotation;
        for handle in &mut self.handles {
            if !handle.active {
                handle.rotation = rotation;
            }
        }
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn capacity(&self) -> usize {
        self.handles.len()
    }

    pub fn inactive_count(&self) -> usize {
        self.free.len()
    }

    pub fn active_count(&self) -> usize {
        self.handles.len() - self.free.len()
    }

    /// Variant name for a variant id
    pub fn variant_name(&self, variant: VariantId) -> Option<&str> {
        self.variants.get(variant as usize).map(String::as_str)
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Number of handles per variant, indexed by variant id
    pub fn variant_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.variants.len()];
        for handle in &self.handles {
            counts[handle.variant as usize] += 1;
        }
        counts
    }

    pub fn get(&self, id: HandleId) -> Option<&EntityHandle> {
        self.slot(id).map(|i| &self.handles[i])
    }

    /// Mutable access for the host's physics step (position, velocity)
    pub fn get_mut(&mut self, id: HandleId) -> Option<&mut EntityHandle> {
        self.slot(id).map(|i| &mut self.handles[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityHandle> {
        self.handles.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &EntityHandle> {
        self.handles.iter().filter(|h| h.active)
    }

    /// Active handles with their positions (order unspecified)
    pub fn active_positions(&self) -> Vec<(HandleId, Vec3)> {
        self.iter_active().map(|h| (h.id, h.position)).collect()
    }

    /// Pick a random inactive handle without activating it
    pub fn acquire_inactive<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<HandleId> {
        match self.selection {
            Selection::FreeList => {
                if self.free.is_empty() {
                    return None;
                }
                let pick = self.free[rng.random_range(0..self.free.len())];
                Some(HandleId::new(self.category, pick))
            }
            Selection::ShuffleScan => {
                let mut order: Vec<usize> = (0..self.handles.len()).collect();
                order.shuffle(rng);
                order
                    .into_iter()
                    .find(|&i| !self.handles[i].active)
                    .map(|i| self.handles[i].id)
            }
        }
    }

    /// Place a handle and mark it active
    pub fn activate(&mut self, id: HandleId, position: Vec3) -> Result<&EntityHandle, SpawnError> {
        let index = self.slot(id).ok_or(SpawnError::UnknownHandle(id))?;
        if self.handles[index].active {
            return Err(SpawnError::AlreadyActive(id));
        }

        self.take_free(index);
        let rest = self.rest_rotation;
        let handle = &mut self.handles[index];
        handle.reset_physical_state(rest);
        handle.position = position;
        handle.active = true;
        Ok(&*handle)
    }

    /// Return a handle to the free set.
    ///
    /// Returns `Ok(true)` when the handle was active. Releasing an inactive
    /// handle changes nothing and returns `Ok(false)`.
    pub fn release(&mut self, id: HandleId) -> Result<bool, SpawnError> {
        let index = self.slot(id).ok_or(SpawnError::UnknownHandle(id))?;
        if !self.handles[index].active {
            return Ok(false);
        }

        let rest = self.rest_rotation;
        let handle = &mut self.handles[index];
        handle.active = false;
        handle.reset_physical_state(rest);

        self.free_slot[index] = Some(self.free.len());
        self.free.push(index as u32);
        Ok(true)
    }

    fn slot(&self, id: HandleId) -> Option<usize> {
        let index = id.index as usize;
        (id.category == self.category && index < self.handles.len()).then_some(index)
    }

    fn take_free(&mut self, index: usize) {
        if let Some(pos) = self.free_slot[index].take() {
            self.free.swap_remove(pos);
            if let Some(&moved) = self.free.get(pos) {
                self.free_slot[moved as usize] = Some(pos);
            }
        }
    }
}
