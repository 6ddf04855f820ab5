#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sensor overlap system that reports intersection-enter events as commands.
//!
//! Enemies expose static sensor volumes; probes are spheres moved by the
//! driver (the player, projectiles, scripted sweeps). Only the first frame of
//! an overlap produces a collision, matching the behaviour of a physics
//! engine's intersection-enter callback.

use std::collections::BTreeSet;

use glam::Vec3;
use hoverfield_core::{Command, EnemyId, SensorCollider, Timestamp};

/// Spherical volume that triggers enemy sensors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    center: Vec3,
    radius: f32,
}

impl Probe {
    /// Creates a probe centred on the provided position.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Centre of the probe in world space.
    #[must_use]
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Radius of the probe.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }
}

/// Pure system that tracks sensor contacts between frames.
#[derive(Debug, Default)]
pub struct Sensors {
    contacts: BTreeSet<(usize, EnemyId)>,
}

impl Sensors {
    /// Creates a sensor system without any recorded contacts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tests every probe against every sensor and emits collisions for new overlaps.
    ///
    /// Probes are identified by their index in `probes`, so drivers must keep
    /// the ordering stable between frames.
    pub fn handle(
        &mut self,
        probes: &[Probe],
        colliders: &[SensorCollider],
        at: Timestamp,
        out: &mut Vec<Command>,
    ) {
        let mut current = BTreeSet::new();
        for (probe_index, probe) in probes.iter().enumerate() {
            for collider in colliders {
                if collider.overlaps_sphere(probe.center, probe.radius) {
                    let _ = current.insert((probe_index, collider.enemy));
                }
            }
        }

        let mut entered: BTreeSet<EnemyId> = BTreeSet::new();
        for contact in current.difference(&self.contacts) {
            let _ = entered.insert(contact.1);
        }
        out.extend(
            entered
                .into_iter()
                .map(|enemy| Command::RegisterCollision { enemy, at }),
        );

        self.contacts = current;
    }

    /// Number of probe/sensor pairs that overlapped during the last frame.
    #[must_use]
    pub fn active_contacts(&self) -> usize {
        self.contacts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensor(id: u64, x: f32) -> SensorCollider {
        SensorCollider::at(EnemyId::new(id), Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn emits_collision_only_on_enter() {
        let mut sensors = Sensors::new();
        let colliders = [sensor(1, 0.0)];
        let probes = [Probe::new(Vec3::ZERO, 0.25)];
        let mut out = Vec::new();

        sensors.handle(&probes, &colliders, Timestamp::from_millis(10), &mut out);
        sensors.handle(&probes, &colliders, Timestamp::from_millis(20), &mut out);

        assert_eq!(
            out,
            vec![Command::RegisterCollision {
                enemy: EnemyId::new(1),
                at: Timestamp::from_millis(10),
            }]
        );
        assert_eq!(sensors.active_contacts(), 1);
    }

    #[test]
    fn leaving_and_reentering_fires_again() {
        let mut sensors = Sensors::new();
        let colliders = [sensor(4, 0.0)];
        let mut out = Vec::new();

        sensors.handle(&[Probe::new(Vec3::ZERO, 0.1)], &colliders, Timestamp::ZERO, &mut out);
        sensors.handle(
            &[Probe::new(Vec3::new(5.0, 0.0, 0.0), 0.1)],
            &colliders,
            Timestamp::from_millis(1),
            &mut out,
        );
        sensors.handle(
            &[Probe::new(Vec3::ZERO, 0.1)],
            &colliders,
            Timestamp::from_millis(2),
            &mut out,
        );

        assert_eq!(out.len(), 2);
    }

    #[test]
    fn two_probes_entering_one_sensor_fire_once() {
        let mut sensors = Sensors::new();
        let colliders = [sensor(2, 0.0)];
        let probes = [
            Probe::new(Vec3::new(0.2, 0.0, 0.0), 0.1),
            Probe::new(Vec3::new(-0.2, 0.0, 0.0), 0.1),
        ];
        let mut out = Vec::new();

        sensors.handle(&probes, &colliders, Timestamp::ZERO, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(sensors.active_contacts(), 2);
    }

    #[test]
    fn contacts_with_vanished_sensors_are_forgotten() {
        let mut sensors = Sensors::new();
        let probes = [Probe::new(Vec3::ZERO, 0.5)];
        let mut out = Vec::new();

        sensors.handle(&probes, &[sensor(8, 0.0)], Timestamp::ZERO, &mut out);
        sensors.handle(&probes, &[sensor(9, 0.0)], Timestamp::from_millis(1), &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(sensors.active_contacts(), 1);
    }
}
