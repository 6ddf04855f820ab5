//! Frame driver that connects the population, its sensors and the probe.

use std::time::Duration;

use glam::Vec3;
use hoverfield_core::{Command, EnemyId, Event, Timestamp};
use hoverfield_rendering::{Color, ProbePresentation, Scene};
use hoverfield_system_sensors::{Probe, Sensors};
use hoverfield_world::{self as world, query, PopulationConfig, World};

/// Units per second travelled by the probe at full input.
pub(crate) const PROBE_SPEED: f32 = 30.0;
/// Radius of the probe sphere.
pub(crate) const PROBE_RADIUS: f32 = 1.5;
/// Fill color of the probe sphere.
pub(crate) const PROBE_COLOR: Color = Color::from_rgb_u8(0xff, 0xd7, 0x00);

/// Counters accumulated while a session runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SessionStats {
    /// Frames stepped so far.
    pub(crate) frames: u64,
    /// Enemies that started popping.
    pub(crate) pops: u64,
    /// Enemies replaced after their pop finished.
    pub(crate) respawns: u64,
}

/// Owns the world together with the systems that feed it commands.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    sensors: Sensors,
    probe: Probe,
    clock: Timestamp,
    commands: Vec<Command>,
    events: Vec<Event>,
    stats: SessionStats,
}

impl Session {
    /// Spawns a population and parks the probe at the origin.
    pub(crate) fn new(config: PopulationConfig) -> Self {
        Self {
            world: World::new(config),
            sensors: Sensors::new(),
            probe: Probe::new(Vec3::ZERO, PROBE_RADIUS),
            clock: Timestamp::ZERO,
            commands: Vec::new(),
            events: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn probe(&self) -> Probe {
        self.probe
    }

    pub(crate) fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Teleports the probe to `center`.
    pub(crate) fn place_probe(&mut self, center: Vec3) {
        self.probe = Probe::new(center, self.probe.radius());
    }

    /// Moves the probe along `direction` for `dt` at [`PROBE_SPEED`].
    pub(crate) fn move_probe(&mut self, direction: Vec3, dt: Duration) {
        let step = direction * PROBE_SPEED * dt.as_secs_f32();
        self.place_probe(self.probe.center() + step);
    }

    /// Replaces the whole population with fresh enemies.
    pub(crate) fn respawn_all(&mut self) {
        world::apply(&mut self.world, Command::SpawnAll, &mut self.events);
        self.drain_events();
        log::info!(
            "population respawned with {} enemies",
            query::population_size(&self.world)
        );
    }

    /// Advances the session clock by `dt` and runs a full frame.
    ///
    /// Sensor overlaps are evaluated against the positions produced by the
    /// previous tick, then the resulting collisions are applied before the
    /// world advances to the new clock reading.
    pub(crate) fn step(&mut self, dt: Duration) {
        self.clock = self.clock.saturating_add(dt);

        self.sensors.handle(
            &[self.probe],
            &query::sensor_colliders(&self.world),
            self.clock,
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        world::apply(
            &mut self.world,
            Command::Tick {
                now: self.clock,
                elapsed: self.clock.as_duration(),
            },
            &mut self.events,
        );

        self.stats.frames += 1;
        self.drain_events();
    }

    fn drain_events(&mut self) {
        for event in self.events.drain(..) {
            match event {
                Event::EnemyPopped { enemy, at } => {
                    self.stats.pops += 1;
                    log::debug!("enemy {} popped at {:?}", enemy.get(), at.as_duration());
                }
                Event::EnemyRespawned { .. } => self.stats.respawns += 1,
                _ => {}
            }
        }
    }

    /// Identifier of the enemy occupying `slot` in phase order, if any.
    pub(crate) fn enemy_in_slot(&self, slot: usize) -> Option<(EnemyId, Vec3)> {
        let view = query::enemy_view(&self.world);
        if view.is_empty() {
            return None;
        }
        let found = view
            .iter()
            .nth(slot % view.len())
            .map(|snapshot| (snapshot.id, snapshot.position));
        found
    }

    /// Copies the current population and probe into `scene`.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let view = query::enemy_view(&self.world);
        scene.set_enemies(view.iter());
        scene.probe = ProbePresentation::new(self.probe.center(), self.probe.radius(), PROBE_COLOR);
        scene.status = self.status_line();
    }

    /// One-line summary of the session shown on screen and in logs.
    pub(crate) fn status_line(&self) -> String {
        format!(
            "{} | enemies: {} | popped: {} | respawned: {}",
            query::welcome_banner(&self.world),
            query::population_size(&self.world),
            self.stats.pops,
            self.stats.respawns,
        )
    }
}
