#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Hoverfield.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the adapter depends on macroquad without its default `audio` feature.

use anyhow::Result;
use glam::Vec3;
use hoverfield_rendering::{
    CameraPresentation, Color, EnemyPresentation, FrameInput, Presentation, ProbePresentation,
    RenderingBackend, Scene, TerrainPresentation,
};
use macroquad::{
    camera::{set_camera, set_default_camera, Camera3D},
    input::{is_key_down, is_key_pressed, KeyCode},
    math::{vec2, vec3, Vec3 as MacroquadVec3},
    models::{draw_mesh, draw_sphere, Mesh, Vertex},
};
use std::time::{Duration, Instant};

const STATUS_FONT_SIZE: f32 = 22.0;
const CAMERA_FOV_Y: f32 = 75.0;

/// Keys held down during a single frame that steer the probe and camera.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    /// `W` pushes the probe away from the camera.
    pub forward: bool,
    /// `S` pulls the probe towards the camera.
    pub backward: bool,
    /// `A` strafes the probe left.
    pub left: bool,
    /// `D` strafes the probe right.
    pub right: bool,
    /// `R` raises the probe.
    pub up: bool,
    /// `F` lowers the probe.
    pub down: bool,
    /// Left arrow orbits the camera anticlockwise.
    pub orbit_left: bool,
    /// Right arrow orbits the camera clockwise.
    pub orbit_right: bool,
    /// `Enter` respawns the whole population.
    pub respawn_all: bool,
}

impl HeldKeys {
    fn poll() -> Self {
        Self {
            forward: is_key_down(KeyCode::W),
            backward: is_key_down(KeyCode::S),
            left: is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::D),
            up: is_key_down(KeyCode::R),
            down: is_key_down(KeyCode::F),
            orbit_left: is_key_down(KeyCode::Left),
            orbit_right: is_key_down(KeyCode::Right),
            respawn_all: is_key_pressed(KeyCode::Enter),
        }
    }

    /// Converts the held keys into camera-relative frame input.
    ///
    /// Forward motion points from the camera eye towards its target, projected
    /// onto the horizontal plane.
    #[must_use]
    pub fn frame_input(&self, camera: &CameraPresentation) -> FrameInput {
        let forward = Vec3::new(-camera.yaw.sin(), 0.0, -camera.yaw.cos());
        let right = Vec3::new(camera.yaw.cos(), 0.0, -camera.yaw.sin());

        let mut motion = Vec3::ZERO;
        motion += forward * axis(self.forward, self.backward);
        motion += right * axis(self.right, self.left);
        motion += Vec3::Y * axis(self.up, self.down);

        FrameInput {
            probe_motion: motion.clamp(Vec3::splat(-1.0), Vec3::splat(1.0)),
            orbit: axis(self.orbit_right, self.orbit_left),
            respawn_all: self.respawn_all,
        }
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    vsync: Option<bool>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that keeps the platform's default presentation mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests presentation synchronised with the display refresh rate, or
    /// unthrottled presentation when `enabled` is false.
    #[must_use]
    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.vsync = Some(enabled);
        self
    }

    /// Configures whether the backend logs frame timing once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Wall time spent on one frame and its two stages.
#[derive(Clone, Copy, Debug, Default)]
struct FrameTiming {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Frame rate and stage costs averaged over roughly one second.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    simulation: Duration,
    render: Duration,
}

#[derive(Debug, Default)]
struct FrameClock {
    window: FrameTiming,
    frames: u32,
}

impl FrameClock {
    /// Accumulates `timing`, yielding a report each time a second of frames has passed.
    fn tick(&mut self, timing: FrameTiming) -> Option<FrameReport> {
        self.window.frame += timing.frame;
        self.window.simulation += timing.simulation;
        self.window.render += timing.render;
        self.frames = self.frames.saturating_add(1);

        if self.window.frame < Duration::from_secs(1) {
            return None;
        }

        let FrameTiming {
            frame,
            simulation,
            render,
        } = std::mem::take(&mut self.window);
        let frames = std::mem::take(&mut self.frames);
        Some(FrameReport {
            fps: frames as f32 / frame.as_secs_f32(),
            simulation: simulation / frames,
            render: render / frames,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self { vsync, show_fps } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(vsync) = vsync {
            config.platform.swap_interval = Some(i32::from(vsync));
        }

        log::info!(
            "opening window with {} enemies and {} terrain triangles",
            scene.enemies.len(),
            scene.terrain.triangle_count()
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let terrain_mesh = terrain_mesh(&scene.terrain);
            let background = to_macroquad_color(clear_color);
            let mut frame_clock = FrameClock::default();

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    log::info!("quit requested");
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = HeldKeys::poll().frame_input(&scene.camera);

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation = simulation_start.elapsed();

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                set_camera(&camera_for(&scene.camera));
                draw_mesh(&terrain_mesh);
                draw_probe(&scene.probe);
                draw_enemies(&scene.enemies);
                set_default_camera();
                draw_status(&scene.status);
                let render = render_start.elapsed();

                let timing = FrameTiming {
                    frame: frame_dt,
                    simulation,
                    render,
                };
                if let Some(report) = frame_clock.tick(timing) {
                    if show_fps {
                        log::info!(
                            "FPS: {:.1} | sim: {:.2}ms render: {:.2}ms",
                            report.fps,
                            report.simulation.as_secs_f64() * 1_000.0,
                            report.render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn camera_for(camera: &CameraPresentation) -> Camera3D {
    Camera3D {
        position: to_macroquad_vec3(camera.eye()),
        target: to_macroquad_vec3(camera.target),
        up: vec3(0.0, 1.0, 0.0),
        fovy: CAMERA_FOV_Y.to_radians(),
        ..Camera3D::default()
    }
}

fn terrain_mesh(terrain: &TerrainPresentation) -> Mesh {
    let vertices = terrain
        .vertices
        .iter()
        .zip(&terrain.colors)
        .map(|(position, color)| Vertex {
            position: to_macroquad_vec3(*position),
            uv: vec2(0.0, 0.0),
            color: to_macroquad_color(*color),
        })
        .collect();

    Mesh {
        vertices,
        indices: terrain.indices.clone(),
        texture: None,
    }
}

fn draw_probe(probe: &ProbePresentation) {
    draw_sphere(
        to_macroquad_vec3(probe.center),
        probe.radius,
        None,
        to_macroquad_color(probe.color),
    );
}

fn draw_enemies(enemies: &[EnemyPresentation]) {
    for enemy in enemies {
        if enemy.color.alpha <= 0.0 {
            continue;
        }
        draw_sphere(
            to_macroquad_vec3(enemy.center),
            enemy.scaled_radius(),
            None,
            to_macroquad_color(enemy.color),
        );
    }
}

fn draw_status(status: &str) {
    if status.is_empty() {
        return;
    }
    let _ = macroquad::text::draw_text(
        status,
        12.0,
        STATUS_FONT_SIZE + 4.0,
        STATUS_FONT_SIZE,
        macroquad::color::WHITE,
    );
}

fn to_macroquad_vec3(vector: Vec3) -> MacroquadVec3 {
    vec3(vector.x, vector.y, vector.z)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
