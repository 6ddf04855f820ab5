#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Hoverfield experience.

mod logging;
mod session;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec3;
use hoverfield_rendering::{
    CameraPresentation, Color, FrameInput, Presentation, ProbePresentation, RenderingBackend,
    Scene, TerrainPresentation,
};
use hoverfield_rendering_macroquad::MacroquadBackend;
use hoverfield_system_terrain::{TerrainBand, TerrainConfig, TerrainField};
use hoverfield_world::{query, PopulationConfig};

use self::session::{Session, PROBE_COLOR, PROBE_RADIUS};

/// Fixed frame length used by the headless driver.
const HEADLESS_FRAME: Duration = Duration::from_nanos(16_666_667);
/// Headless frames spent on each enemy before the probe moves on.
const HEADLESS_DWELL_FRAMES: u64 = 30;
/// Radians per second the camera turns at full orbit input.
const ORBIT_SPEED: f32 = 1.2;
const CAMERA_DISTANCE: f32 = 110.0;
const CAMERA_HEIGHT: f32 = 45.0;
const CLEAR_COLOR: Color = Color::from_rgb_u8(0x0b, 0x10, 0x1c);

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    On,
    Off,
}

/// Hover over procedural terrain and pop drifting enemies.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed used to place and respawn enemies.
    #[arg(long)]
    seed: Option<u64>,
    /// Seed used to generate the terrain height field.
    #[arg(long)]
    terrain_seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_enum, default_value_t = VsyncMode::On)]
    vsync: VsyncMode,
    /// Log frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
    /// Run the given number of frames without opening a window.
    #[arg(long, value_name = "N")]
    headless_frames: Option<u64>,
}

impl Args {
    fn population_config(&self) -> PopulationConfig {
        self.seed
            .map_or_else(PopulationConfig::default, PopulationConfig::new)
    }

    fn terrain_config(&self) -> TerrainConfig {
        let config = TerrainConfig::default();
        match self.terrain_seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

/// Entry point for the Hoverfield command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let session = Session::new(args.population_config());
    log::info!("{}", query::welcome_banner(session.world()));

    match args.headless_frames {
        Some(frames) => run_headless(session, args.terrain_config(), frames),
        None => run_windowed(session, &args),
    }
}

fn build_terrain(config: TerrainConfig) -> Result<TerrainField> {
    let terrain = TerrainField::build(config).context("failed to build terrain")?;
    let [water, sand, grass, rock] = band_counts(&terrain);
    log::info!(
        "terrain ready: {} vertices (water {water}, sand {sand}, grass {grass}, rock {rock})",
        terrain.heights().len(),
    );
    Ok(terrain)
}

/// Vertex counts per band, ordered from the lowest band to the highest.
fn band_counts(terrain: &TerrainField) -> [usize; 4] {
    let mut counts = [0; 4];
    for band in terrain.bands() {
        let slot = match band {
            TerrainBand::Water => 0,
            TerrainBand::Sand => 1,
            TerrainBand::Grass => 2,
            TerrainBand::Rock => 3,
        };
        counts[slot] += 1;
    }
    counts
}

fn run_headless(mut session: Session, terrain: TerrainConfig, frames: u64) -> Result<()> {
    let _ = build_terrain(terrain)?;
    log::info!("running {frames} headless frames");

    for frame in 0..frames {
        if frame % HEADLESS_DWELL_FRAMES == 0 {
            let slot = usize::try_from(frame / HEADLESS_DWELL_FRAMES)
                .context("headless frame count exceeds addressable slots")?;
            if let Some((enemy, position)) = session.enemy_in_slot(slot) {
                log::debug!("probe visiting enemy {}", enemy.get());
                session.place_probe(position);
            }
        }
        session.step(HEADLESS_FRAME);
    }

    let stats = session.stats();
    log::info!(
        "headless run finished after {} frames: {} popped, {} respawned, {} alive, probe at {}",
        stats.frames,
        stats.pops,
        stats.respawns,
        query::population_size(session.world()),
        session.probe().center(),
    );
    Ok(())
}

fn run_windowed(mut session: Session, args: &Args) -> Result<()> {
    let terrain = build_terrain(args.terrain_config())?;
    let colors = terrain.colors().map(Color::from_rgb).collect();
    let terrain = TerrainPresentation::new(
        terrain.world_vertices(),
        colors,
        &terrain.triangle_indices(),
    )
    .context("failed to prepare terrain mesh")?;

    let camera = CameraPresentation::new(Vec3::ZERO, CAMERA_DISTANCE, CAMERA_HEIGHT, 0.0);
    let probe = ProbePresentation::new(session.probe().center(), PROBE_RADIUS, PROBE_COLOR);
    let mut scene = Scene::new(terrain, Vec::new(), probe, camera);
    session.populate_scene(&mut scene);

    let presentation = Presentation::new(
        query::welcome_banner(session.world()),
        CLEAR_COLOR,
        scene,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync == VsyncMode::On)
        .with_show_fps(args.show_fps);

    backend.run(
        presentation,
        move |dt: Duration, input: FrameInput, scene: &mut Scene| {
            if input.respawn_all {
                session.respawn_all();
            }
            session.move_probe(input.probe_motion, dt);
            session.step(dt);

            scene.camera = scene
                .camera
                .orbited(input.orbit * ORBIT_SPEED * dt.as_secs_f32());
            session.populate_scene(scene);
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_default_to_windowed_mode() {
        let args = Args::try_parse_from(["hoverfield"]).expect("no arguments are required");

        assert_eq!(args.headless_frames, None);
        assert_eq!(args.vsync, VsyncMode::On);
        assert!(!args.show_fps);
        assert_eq!(args.population_config(), PopulationConfig::default());
        assert_eq!(args.terrain_config(), TerrainConfig::default());
    }

    #[test]
    fn seeds_flow_into_configurations() {
        let args = Args::try_parse_from([
            "hoverfield",
            "--seed",
            "7",
            "--terrain-seed",
            "11",
            "--vsync",
            "off",
            "--headless-frames",
            "90",
        ])
        .expect("valid arguments");

        assert_eq!(args.population_config().rng_seed(), 7);
        assert_eq!(args.terrain_config().seed(), 11);
        assert_eq!(args.vsync, VsyncMode::Off);
        assert_eq!(args.headless_frames, Some(90));
    }

    #[test]
    fn headless_run_visits_enemies() {
        let session = Session::new(PopulationConfig::new(3).with_count(4));
        let terrain = TerrainConfig::new(20.0, 20.0, 8, 20.0, 5);
        run_headless(session, terrain, 120).expect("headless run succeeds");
    }

    #[test]
    fn band_counts_cover_every_vertex() {
        let terrain = TerrainField::build(TerrainConfig::default().with_seed(17))
            .expect("default terrain is valid");
        let counts = band_counts(&terrain);

        assert_eq!(counts.iter().sum::<usize>(), terrain.heights().len());
        let water = terrain
            .heights()
            .iter()
            .filter(|height| **height < 5.0)
            .count();
        assert_eq!(counts[0], water);
    }

    #[test]
    fn headless_rejects_invalid_terrain() {
        let session = Session::new(PopulationConfig::new(3).with_count(2));
        let terrain = TerrainConfig::new(20.0, 20.0, 0, 20.0, 5);

        assert!(run_headless(session, terrain, 10).is_err());
    }
}
