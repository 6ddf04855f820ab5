#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative enemy population for Hoverfield.
//!
//! The world owns every enemy, advances their wandering motion once per
//! rendered frame, starts pop animations when sensors report a collision and
//! replaces finished enemies with brand-new ones. All mutations flow through
//! [`apply`]; adapters observe the outcome through the [`query`] module.

use std::time::Duration;

use glam::Vec3;
use hoverfield_core::{
    Command, EnemyId, Event, SpawnBounds, Timestamp, ENEMY_COUNT, POP_DURATION, WANDER_AMPLITUDE,
    WELCOME_BANNER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const POPULATION_SEED: u64 = 0x5eed_b10b_0f_f1e1d;

// Per-axis multipliers applied to the motion phase.
const WANDER_FREQUENCY_X: f32 = 1.0;
const WANDER_FREQUENCY_Y: f32 = 0.5;
const WANDER_FREQUENCY_Z: f32 = 0.7;

/// Configuration parameters required to construct the population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationConfig {
    count: usize,
    bounds: SpawnBounds,
    wander_amplitude: f32,
    pop_duration: Duration,
    rng_seed: u64,
}

impl PopulationConfig {
    /// Creates a configuration using the canonical tuning and the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self {
            count: ENEMY_COUNT,
            bounds: SpawnBounds::DEFAULT,
            wander_amplitude: WANDER_AMPLITUDE,
            pop_duration: POP_DURATION,
            rng_seed,
        }
    }

    /// Overrides the number of enemies kept alive.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Overrides the box in which enemies are anchored.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: SpawnBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Overrides the length of the pop animation.
    #[must_use]
    pub const fn with_pop_duration(mut self, pop_duration: Duration) -> Self {
        self.pop_duration = pop_duration;
        self
    }

    /// Number of enemies kept alive.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Box in which enemies are anchored.
    #[must_use]
    pub const fn bounds(&self) -> SpawnBounds {
        self.bounds
    }

    /// Amplitude of the wandering motion along each axis.
    #[must_use]
    pub const fn wander_amplitude(&self) -> f32 {
        self.wander_amplitude
    }

    /// Length of the pop animation.
    #[must_use]
    pub const fn pop_duration(&self) -> Duration {
        self.pop_duration
    }

    /// Seed feeding the random source used for spawn positions.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self::new(POPULATION_SEED)
    }
}

/// Represents the authoritative Hoverfield enemy population.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: PopulationConfig,
    enemies: Vec<Enemy>,
    rng: ChaCha8Rng,
    next_id: u64,
    clock: Timestamp,
}

impl World {
    /// Creates a new world and spawns its initial population.
    #[must_use]
    pub fn new(config: PopulationConfig) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            config,
            enemies: Vec::with_capacity(config.count()),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed()),
            next_id: 0,
            clock: Timestamp::ZERO,
        };
        let mut discarded = Vec::new();
        world.spawn_all(&mut discarded);
        world
    }

    fn spawn_all(&mut self, out_events: &mut Vec<Event>) {
        let count = self.config.count();
        let phases = u32::try_from(count).unwrap_or(u32::MAX);
        self.enemies.clear();
        for phase_index in 0..phases {
            let enemy = self.spawn_enemy(phase_index);
            out_events.push(Event::EnemySpawned {
                enemy: enemy.id,
                phase_index,
                base_position: enemy.base_position,
            });
            self.enemies.push(enemy);
        }
        out_events.push(Event::PopulationSpawned {
            count: self.enemies.len(),
        });
        log::info!("spawned population of {} enemies", self.enemies.len());
    }

    fn spawn_enemy(&mut self, phase_index: u32) -> Enemy {
        let id = self.allocate_id();
        let base_position = sample_base_position(&mut self.rng, self.config.bounds());
        Enemy::alive(id, base_position, phase_index)
    }

    fn allocate_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }

    fn advance(&mut self, now: Timestamp, elapsed: Duration, out_events: &mut Vec<Event>) {
        self.clock = now;
        out_events.push(Event::TimeAdvanced { now, elapsed });

        let phase_seconds = elapsed.as_secs_f32();
        let amplitude = self.config.wander_amplitude();
        let pop_duration = self.config.pop_duration();

        for index in 0..self.enemies.len() {
            let finished = {
                let enemy = &mut self.enemies[index];
                match enemy.state {
                    EnemyState::Popping { started_at } => {
                        now.saturating_since(started_at) >= pop_duration
                    }
                    EnemyState::Alive => {
                        enemy.position = enemy.base_position
                            + wander_offset(phase_seconds, enemy.phase_index, amplitude);
                        false
                    }
                }
            };

            if finished {
                let phase_index = self.enemies[index].phase_index;
                let replacement = self.spawn_enemy(phase_index);
                let base_position = replacement.base_position;
                let previous = std::mem::replace(&mut self.enemies[index], replacement);
                log::debug!(
                    "enemy {} finished popping; respawned as {} at {:?}",
                    previous.id.get(),
                    self.enemies[index].id.get(),
                    base_position
                );
                out_events.push(Event::EnemyRespawned {
                    previous: previous.id,
                    enemy: self.enemies[index].id,
                    phase_index,
                    base_position,
                });
            }
        }

        debug_assert_eq!(self.enemies.len(), self.config.count());
    }

    fn register_collision(&mut self, enemy: EnemyId, at: Timestamp, out_events: &mut Vec<Event>) {
        let Some(target) = self.enemy_mut(enemy) else {
            log::trace!("ignoring collision for departed enemy {}", enemy.get());
            return;
        };

        if target.start_popping(at) {
            out_events.push(Event::EnemyPopped { enemy, at });
        } else {
            log::trace!("ignoring repeated collision for enemy {}", enemy.get());
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PopulationConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Collisions that name an enemy which is absent or already popping leave the
/// world untouched; such events routinely race against respawns.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnAll => world.spawn_all(out_events),
        Command::Tick { now, elapsed } => world.advance(now, elapsed, out_events),
        Command::RegisterCollision { enemy, at } => {
            world.register_collision(enemy, at, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use hoverfield_core::{
        pop_progress, EnemyId, EnemySnapshot, EnemyView, SensorCollider, Timestamp,
    };

    use super::{EnemyState, PopulationConfig, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the population was created with.
    #[must_use]
    pub fn config(world: &World) -> &PopulationConfig {
        &world.config
    }

    /// Clock reading recorded by the most recent tick.
    #[must_use]
    pub fn clock(world: &World) -> Timestamp {
        world.clock
    }

    /// Number of enemies currently tracked by the world.
    #[must_use]
    pub fn population_size(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of every enemy.
    ///
    /// Pop progress is measured against the clock of the most recent tick.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| snapshot(world, enemy))
                .collect(),
        )
    }

    /// Captures the snapshot of a single enemy, if it is still present.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        world
            .enemies
            .iter()
            .find(|candidate| candidate.id == enemy)
            .map(|found| snapshot(world, found))
    }

    /// Lists the static sensor volumes that the physics collaborator should host.
    #[must_use]
    pub fn sensor_colliders(world: &World) -> Vec<SensorCollider> {
        world
            .enemies
            .iter()
            .map(|enemy| SensorCollider::at(enemy.id, enemy.position))
            .collect()
    }

    fn snapshot(world: &World, enemy: &super::Enemy) -> EnemySnapshot {
        let (popping, progress) = match enemy.state {
            EnemyState::Alive => (false, 0.0),
            EnemyState::Popping { started_at } => (
                true,
                pop_progress(started_at, world.clock, world.config.pop_duration()),
            ),
        };

        EnemySnapshot {
            id: enemy.id,
            phase_index: enemy.phase_index,
            position: enemy.position,
            popping,
            progress,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum EnemyState {
    Alive,
    Popping { started_at: Timestamp },
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    base_position: Vec3,
    phase_index: u32,
    state: EnemyState,
    position: Vec3,
}

impl Enemy {
    fn alive(id: EnemyId, base_position: Vec3, phase_index: u32) -> Self {
        Self {
            id,
            base_position,
            phase_index,
            state: EnemyState::Alive,
            position: base_position,
        }
    }

    /// Returns `true` when the enemy transitioned from alive to popping.
    fn start_popping(&mut self, at: Timestamp) -> bool {
        match self.state {
            EnemyState::Alive => {
                self.state = EnemyState::Popping { started_at: at };
                true
            }
            EnemyState::Popping { .. } => false,
        }
    }
}

fn sample_base_position(rng: &mut ChaCha8Rng, bounds: SpawnBounds) -> Vec3 {
    let unit = Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>());
    bounds.min() + unit * bounds.size()
}

fn wander_offset(phase_seconds: f32, phase_index: u32, amplitude: f32) -> Vec3 {
    let phase = phase_seconds + phase_index as f32;
    Vec3::new(
        (phase * WANDER_FREQUENCY_X).sin(),
        (phase * WANDER_FREQUENCY_Y).cos(),
        (phase * WANDER_FREQUENCY_Z).sin(),
    ) * amplitude
}
