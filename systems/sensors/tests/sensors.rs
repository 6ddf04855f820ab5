use std::time::Duration;

use hoverfield_core::{Command, Event, Timestamp};
use hoverfield_system_sensors::{Probe, Sensors};
use hoverfield_world::{self as world, query, PopulationConfig, World};

#[test]
fn probe_parked_on_enemy_pops_it_exactly_once() {
    let mut world = World::new(PopulationConfig::new(0x0bad_cafe).with_count(8));
    let mut sensors = Sensors::new();
    let mut events = Vec::new();

    let now = Timestamp::from_millis(16);
    world::apply(
        &mut world,
        Command::Tick {
            now,
            elapsed: now.as_duration(),
        },
        &mut events,
    );

    let target = query::enemy_view(&world)
        .iter()
        .nth(3)
        .copied()
        .expect("eight enemies");
    let probes = [Probe::new(target.position, 0.25)];

    let mut popped = 0;
    let mut now = now;
    for _ in 0..10 {
        let mut commands = Vec::new();
        sensors.handle(&probes, &query::sensor_colliders(&world), now, &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        popped += events
            .drain(..)
            .filter(|event| matches!(event, Event::EnemyPopped { enemy, .. } if *enemy == target.id))
            .count();

        now = now.saturating_add(Duration::from_millis(16));
        world::apply(
            &mut world,
            Command::Tick {
                now,
                elapsed: now.as_duration(),
            },
            &mut events,
        );
    }

    assert_eq!(popped, 1);
    let snapshot = query::enemy(&world, target.id).expect("still popping after 160ms");
    assert!(snapshot.popping);
    assert_eq!(snapshot.position, target.position);
}
