#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hoverfield engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative enemy population, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that adapters and systems may observe. Rendering and physics collaborators
//! only ever read immutable snapshots such as [`EnemyView`] and
//! [`SensorCollider`].

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hoverfield.";

/// Number of enemies kept alive by the population at all times.
pub const ENEMY_COUNT: usize = 50;

/// Horizontal spawn extent along the x and z axes, centred on the origin.
pub const SPAWN_RANGE_XZ: f32 = 100.0;

/// Vertical spawn extent measured upwards from [`SPAWN_FLOOR_Y`].
pub const SPAWN_RANGE_Y: f32 = 70.0;

/// Lowest height at which an enemy may be anchored.
pub const SPAWN_FLOOR_Y: f32 = -10.0;

/// Amplitude of the per-axis wandering motion in world units.
pub const WANDER_AMPLITUDE: f32 = 5.0;

/// Length of the pop animation played after a collision.
pub const POP_DURATION: Duration = Duration::from_millis(500);

/// Opacity of an enemy that is not popping.
pub const BASE_OPACITY: f32 = 0.7;

/// Additional scale reached at the end of the pop animation.
pub const POP_SCALE_GROWTH: f32 = 0.5;

/// Half extent of the cubic sensor volume attached to every enemy.
pub const SENSOR_HALF_EXTENT: f32 = 0.5;

/// Radius of the sphere drawn for every enemy.
pub const ENEMY_RADIUS: f32 = 0.5;

/// Ring and slice count used when tessellating enemy spheres.
pub const ENEMY_SUBDIVISIONS: u32 = 32;

/// Vertical offset applied to the terrain surface in world space.
pub const TERRAIN_VERTICAL_OFFSET: f32 = -50.0;

/// Commands that express all permissible population mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Replaces the entire population with a freshly randomised set of enemies.
    SpawnAll,
    /// Advances every enemy by one rendered frame.
    Tick {
        /// Clock reading taken when the frame started.
        now: Timestamp,
        /// Time elapsed since the driver's clock started, used to phase motion.
        elapsed: Duration,
    },
    /// Reports that an enemy's sensor volume was entered.
    RegisterCollision {
        /// Identifier of the enemy whose sensor fired.
        enemy: EnemyId,
        /// Clock reading taken when the intersection was delivered.
        at: Timestamp,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Announces that the population was rebuilt from scratch.
    PopulationSpawned {
        /// Number of enemies created.
        count: usize,
    },
    /// Confirms that an enemy was created while rebuilding the population.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Slot used to desynchronise the enemy's motion.
        phase_index: u32,
        /// Anchor point of the enemy's wandering motion.
        base_position: Vec3,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Clock reading recorded by the tick.
        now: Timestamp,
        /// Driver time used to phase motion.
        elapsed: Duration,
    },
    /// Confirms that a collision started an enemy's pop animation.
    EnemyPopped {
        /// Identifier of the enemy that started popping.
        enemy: EnemyId,
        /// Clock reading at which the animation started.
        at: Timestamp,
    },
    /// Confirms that a finished enemy was replaced by a brand-new one.
    EnemyRespawned {
        /// Identifier of the enemy that finished popping.
        previous: EnemyId,
        /// Identifier assigned to the replacement.
        enemy: EnemyId,
        /// Slot inherited by the replacement.
        phase_index: u32,
        /// Freshly sampled anchor point of the replacement.
        base_position: Vec3,
    },
}

/// Monotonic clock reading expressed relative to the driver's epoch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// Clock reading at the driver's epoch.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Creates a timestamp located `millis` milliseconds after the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Offset of the timestamp from the epoch.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Time elapsed since `earlier`, or zero when `earlier` lies in the future.
    #[must_use]
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns a timestamp advanced by the provided delta.
    #[must_use]
    pub fn saturating_add(self, delta: Duration) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

/// Unique identifier assigned to an enemy.
///
/// Identifiers are allocated from a monotonic counter and are never reused, so
/// a respawned enemy always receives a value distinct from every predecessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u64);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Axis-aligned box inside which enemies are anchored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    min: Vec3,
    max: Vec3,
}

impl SpawnBounds {
    /// Bounds spanning ±50 units horizontally and −10..60 vertically.
    pub const DEFAULT: Self = Self::new(
        Vec3::new(-SPAWN_RANGE_XZ * 0.5, SPAWN_FLOOR_Y, -SPAWN_RANGE_XZ * 0.5),
        Vec3::new(
            SPAWN_RANGE_XZ * 0.5,
            SPAWN_FLOOR_Y + SPAWN_RANGE_Y,
            SPAWN_RANGE_XZ * 0.5,
        ),
    );

    /// Creates bounds from inclusive minimum and exclusive maximum corners.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Lower corner of the bounds.
    #[must_use]
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Upper corner of the bounds.
    #[must_use]
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Extent of the bounds along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Reports whether the point lies inside the bounds.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Slot used to desynchronise the enemy's motion.
    pub phase_index: u32,
    /// Current animated position, frozen while popping.
    pub position: Vec3,
    /// Indicates whether the enemy is playing its pop animation.
    pub popping: bool,
    /// Pop animation progress in `0.0..=1.0`; zero while alive.
    pub progress: f32,
}

/// Read-only snapshot describing every enemy in the population.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.phase_index);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots ordered by phase slot.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up the snapshot for the provided enemy, if it is still present.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.id == enemy)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Static, non-moving cubic sensor volume requested for an enemy.
///
/// Sensors report overlap without applying any physical response.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorCollider {
    /// Enemy that owns the sensor.
    pub enemy: EnemyId,
    /// Centre of the sensor in world space.
    pub center: Vec3,
    /// Half extent of the cube along every axis.
    pub half_extent: f32,
}

impl SensorCollider {
    /// Creates a sensor of the default size centred on the provided position.
    #[must_use]
    pub const fn at(enemy: EnemyId, center: Vec3) -> Self {
        Self {
            enemy,
            center,
            half_extent: SENSOR_HALF_EXTENT,
        }
    }

    /// Reports whether a sphere overlaps the sensor cube.
    #[must_use]
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        let extent = Vec3::splat(self.half_extent);
        let closest = center.clamp(self.center - extent, self.center + extent);
        closest.distance_squared(center) <= radius * radius
    }
}

/// Visual parameters derived from an enemy's pop progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopAnimation {
    /// Progress remapped through the cubic ease-out curve.
    pub eased: f32,
    /// Uniform scale applied to the enemy's sphere.
    pub scale: f32,
    /// Opacity applied to the enemy's material.
    pub opacity: f32,
}

impl PopAnimation {
    /// Appearance of an enemy that is not popping.
    pub const RESTING: Self = Self {
        eased: 0.0,
        scale: 1.0,
        opacity: BASE_OPACITY,
    };

    /// Derives the appearance for the provided popping flag and progress.
    ///
    /// Values are recomputed from scratch so the animation stays exact at any
    /// frame rate.
    #[must_use]
    pub fn sample(popping: bool, progress: f32) -> Self {
        if !popping {
            return Self::RESTING;
        }

        let eased = ease_out_cubic(progress);
        Self {
            eased,
            scale: 1.0 + POP_SCALE_GROWTH * eased,
            opacity: BASE_OPACITY * (1.0 - eased),
        }
    }
}

/// Cubic ease-out curve `1 - (1 - t)^3` with `t` clamped to `0.0..=1.0`.
#[must_use]
pub fn ease_out_cubic(progress: f32) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Fraction of `duration` that elapsed between `started_at` and `now`.
///
/// Returns a value in `0.0..=1.0`. A zero duration completes immediately.
#[must_use]
pub fn pop_progress(started_at: Timestamp, now: Timestamp, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = now.saturating_since(started_at);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0) as f32
}
