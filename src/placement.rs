//! Spawn point selection by rejection sampling
//!
//! Candidates are drawn uniformly over the play surface and thrown away while
//! they sit too close to anything already occupied. The loop is capped by
//! `max_tries`, so a crowded surface yields `None` instead of spinning.
//!
//! The default exclusion is cross-shaped: an occupied point blocks the whole
//! band `|dx| <= min_distance` *and* the whole band `|dz| <= min_distance`, not
//! just the square where they overlap. Accepted points are therefore clear of
//! every occupied point on both axes at once.

use glam::Vec2;
use rand::Rng;
use rand::distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAX_TRIES, DEFAULT_MIN_DISTANCE, ENEMY_HALF_EXTENTS};

/// Half extents of the spawn rectangle, centred on the origin (x/z plane)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub half_x: f32,
    pub half_z: f32,
}

impl Bounds {
    pub const fn new(half_x: f32, half_z: f32) -> Self {
        Self { half_x, half_z }
    }

    /// Finite, non-negative extents that a uniform draw can span
    pub fn is_valid(&self) -> bool {
        self.ranges().is_some()
    }

    /// Uniform distributions over `[-half_x, half_x]` and `[-half_z, half_z]`.
    /// `None` when either extent is negative, non-finite, or too wide to sample.
    fn ranges(&self) -> Option<(Uniform<f32>, Uniform<f32>)> {
        let span = |half: f32| {
            if !half.is_finite() || half < 0.0 {
                return None;
            }
            Uniform::new_inclusive(-half, half).ok()
        };
        Some((span(self.half_x)?, span(self.half_z)?))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x.abs() <= self.half_x && point.y.abs() <= self.half_z
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(ENEMY_HALF_EXTENTS.0, ENEMY_HALF_EXTENTS.1)
    }
}

/// Shape of the zone an occupied point keeps clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Exclusion {
    /// Reject when either axis is within range
    #[default]
    Cross,
    /// Reject when both axes are within range
    Square,
    /// Reject within a euclidean radius
    Circle,
}

impl Exclusion {
    /// Whether `delta` (candidate minus occupied) falls inside the zone
    #[inline]
    pub fn blocks(self, delta: Vec2, min_distance: f32) -> bool {
        let (dx, dz) = (delta.x.abs(), delta.y.abs());
        match self {
            Exclusion::Cross => dx <= min_distance || dz <= min_distance,
            Exclusion::Square => dx <= min_distance && dz <= min_distance,
            Exclusion::Circle => delta.length_squared() <= min_distance * min_distance,
        }
    }
}

/// Rejection sampler over a bounded rectangle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSampler {
    pub bounds: Bounds,
    pub min_distance: f32,
    pub max_tries: u32,
    pub exclusion: Exclusion,
}

impl Default for PlacementSampler {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            min_distance: DEFAULT_MIN_DISTANCE,
            max_tries: DEFAULT_MAX_TRIES,
            exclusion: Exclusion::Cross,
        }
    }
}

impl PlacementSampler {
    pub fn new(bounds: Bounds, min_distance: f32) -> Self {
        Self {
            bounds,
            min_distance,
            ..Default::default()
        }
    }

    pub fn with_max_tries(mut self, max_tries: u32) -> Self {
        self.max_tries = max_tries;
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusion = exclusion;
        self
    }

    /// Check a candidate against every occupied point
    pub fn is_clear(&self, candidate: Vec2, occupied: &[Vec2]) -> bool {
        !occupied
            .iter()
            .any(|&point| self.exclusion.blocks(candidate - point, self.min_distance))
    }

    /// Draw candidates until one is clear or `max_tries` is spent
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, occupied: &[Vec2]) -> Option<Vec2> {
        let Some((xs, zs)) = self.bounds.ranges() else {
            log::warn!("Placement bounds invalid: {:?}", self.bounds);
            return None;
        };

        for attempt in 0..self.max_tries {
            let candidate = Vec2::new(xs.sample(rng), zs.sample(rng));
            if self.is_clear(candidate, occupied) {
                log::trace!("Placement accepted after {} tries", attempt + 1);
                return Some(candidate);
            }
        }

        log::debug!(
            "Placement gave up after {} tries ({} occupied)",
            self.max_tries,
            occupied.len()
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sampler() -> PlacementSampler {
        PlacementSampler::new(Bounds::new(8.0, 5.0), 2.0)
    }

    #[test]
    fn test_cross_rule_rejects_near_candidate() {
        let occupied = [Vec2::ZERO];
        assert!(!sampler().is_clear(Vec2::new(1.0, 1.0), &occupied));
        assert!(sampler().is_clear(Vec2::new(5.0, 5.0), &occupied));
    }

    #[test]
    fn test_cross_rule_blocks_whole_band() {
        // Far away on x but level on z is still blocked
        let occupied = [Vec2::ZERO];
        assert!(!sampler().is_clear(Vec2::new(7.5, 0.5), &occupied));
        assert!(!sampler().is_clear(Vec2::new(0.5, -4.5), &occupied));
    }

    #[test]
    fn test_boundary_distance_is_rejected() {
        let occupied = [Vec2::ZERO];
        assert!(!sampler().is_clear(Vec2::new(2.0, 3.0), &occupied));
        assert!(sampler().is_clear(Vec2::new(2.01, 3.0), &occupied));
    }

    #[test]
    fn test_other_exclusion_shapes() {
        let occupied = [Vec2::ZERO];
        let square = sampler().with_exclusion(Exclusion::Square);
        assert!(square.is_clear(Vec2::new(7.5, 0.5), &occupied));
        assert!(!square.is_clear(Vec2::new(1.0, 1.0), &occupied));

        let circle = sampler().with_exclusion(Exclusion::Circle);
        assert!(circle.is_clear(Vec2::new(1.5, 1.5), &occupied));
        assert!(!circle.is_clear(Vec2::new(1.0, 1.0), &occupied));
    }

    #[test]
    fn test_empty_surface_accepts_first_draw() {
        let mut rng = Pcg32::seed_from_u64(3);
        let point = sampler().sample(&mut rng, &[]).unwrap();
        assert!(Bounds::new(8.0, 5.0).contains(point));
    }

    #[test]
    fn test_sample_respects_occupied() {
        let mut rng = Pcg32::seed_from_u64(11);
        let occupied = [Vec2::new(0.0, 0.0), Vec2::new(-5.0, 3.0)];
        let s = sampler();
        for _ in 0..50 {
            let point = s.sample(&mut rng, &occupied).unwrap();
            for o in &occupied {
                assert!((point.x - o.x).abs() > 2.0 && (point.y - o.y).abs() > 2.0);
            }
        }
    }

    #[test]
    fn test_blanketed_surface_fails() {
        let mut rng = Pcg32::seed_from_u64(5);
        let s = PlacementSampler::new(Bounds::new(8.0, 5.0), 20.0).with_max_tries(1000);
        assert_eq!(s.sample(&mut rng, &[Vec2::ZERO]), None);
    }

    #[test]
    fn test_zero_tries_never_samples() {
        let mut rng = Pcg32::seed_from_u64(2);
        let s = sampler().with_max_tries(0);
        assert_eq!(s.sample(&mut rng, &[]), None);
    }

    #[test]
    fn test_invalid_bounds_fail_without_panicking() {
        let mut rng = Pcg32::seed_from_u64(1);
        let s = PlacementSampler::new(Bounds::new(-1.0, 5.0), 2.0);
        assert_eq!(s.sample(&mut rng, &[]), None);
    }

    #[test]
    fn test_huge_bounds_are_invalid_and_fail_without_panicking() {
        let huge = Bounds::new(f32::MAX, 5.0);
        assert!(!huge.is_valid());
        assert!(!Bounds::new(f32::INFINITY, 5.0).is_valid());

        let mut rng = Pcg32::seed_from_u64(1);
        let s = PlacementSampler::new(huge, 2.0);
        assert_eq!(s.sample(&mut rng, &[]), None);
    }

    #[test]
    fn test_degenerate_bounds_sample_origin() {
        let mut rng = Pcg32::seed_from_u64(1);
        let s = PlacementSampler::new(Bounds::new(0.0, 0.0), 2.0);
        assert_eq!(s.sample(&mut rng, &[]), Some(Vec2::ZERO));
    }
}
