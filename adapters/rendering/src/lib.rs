#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hoverfield adapters.

use anyhow::Result as AnyResult;
use glam::Vec3;
use hoverfield_core::{EnemyId, EnemySnapshot, PopAnimation, ENEMY_RADIUS, ENEMY_SUBDIVISIONS};
use std::{error::Error, fmt, time::Duration};

/// Color applied to enemies that are drifting normally.
pub const ENEMY_BASE_COLOR: Color = Color::from_rgb_u8(0xad, 0xd8, 0xe6);

/// Color applied to enemies while their pop animation plays.
pub const ENEMY_HIT_COLOR: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);

/// Largest vertex count a terrain mesh may carry with 16-bit indices.
pub const MAX_TERRAIN_VERTICES: usize = u16::MAX as usize + 1;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from floating point RGB channels.
    #[must_use]
    pub const fn from_rgb(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], 1.0)
    }

    /// Returns the same color with the provided alpha, clamped to 0.0..=1.0.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Requested probe direction; each axis lies in -1.0..=1.0.
    pub probe_motion: Vec3,
    /// Requested camera orbit direction in -1.0..=1.0.
    pub orbit: f32,
    /// Whether the adapter detected a request to respawn every enemy.
    pub respawn_all: bool,
}

/// Sphere describing a single enemy ready to be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier of the enemy, useful for per-entity caches.
    pub id: EnemyId,
    /// Centre of the sphere in world space.
    pub center: Vec3,
    /// Radius of the unscaled sphere.
    pub radius: f32,
    /// Ring and slice count used when tessellating the sphere.
    pub subdivisions: u32,
    /// Uniform scale applied on top of the radius.
    pub scale: f32,
    /// Material color; alpha carries the opacity.
    pub color: Color,
    /// Whether the pop animation is playing.
    pub popping: bool,
}

impl EnemyPresentation {
    /// Derives the sphere for the provided snapshot, applying the pop animation.
    #[must_use]
    pub fn from_snapshot(snapshot: &EnemySnapshot) -> Self {
        let animation = PopAnimation::sample(snapshot.popping, snapshot.progress);
        let base = if snapshot.popping {
            ENEMY_HIT_COLOR
        } else {
            ENEMY_BASE_COLOR
        };

        Self {
            id: snapshot.id,
            center: snapshot.position,
            radius: ENEMY_RADIUS,
            subdivisions: ENEMY_SUBDIVISIONS,
            scale: animation.scale,
            color: base.with_alpha(animation.opacity),
            popping: snapshot.popping,
        }
    }

    /// Radius after applying the animation scale.
    #[must_use]
    pub fn scaled_radius(&self) -> f32 {
        self.radius * self.scale
    }
}

/// Static triangulated terrain surface with per-vertex colors.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainPresentation {
    /// Vertex positions in world space.
    pub vertices: Vec<Vec3>,
    /// Color of each vertex.
    pub colors: Vec<Color>,
    /// Flattened triangle list indexing into `vertices`.
    pub indices: Vec<u16>,
}

impl TerrainPresentation {
    /// Creates a new terrain descriptor from world-space geometry.
    ///
    /// Returns an error when the color count differs from the vertex count,
    /// when the mesh cannot be addressed with 16-bit indices, or when a
    /// triangle references a missing vertex.
    pub fn new(
        vertices: Vec<Vec3>,
        colors: Vec<Color>,
        triangles: &[[u32; 3]],
    ) -> std::result::Result<Self, RenderingError> {
        if vertices.len() != colors.len() {
            return Err(RenderingError::MismatchedVertexColors {
                vertices: vertices.len(),
                colors: colors.len(),
            });
        }
        if vertices.len() > MAX_TERRAIN_VERTICES {
            return Err(RenderingError::TerrainTooDense {
                vertices: vertices.len(),
            });
        }

        let mut indices = Vec::with_capacity(triangles.len() * 3);
        for index in triangles.iter().flatten() {
            let in_range = usize::try_from(*index).map_or(false, |value| value < vertices.len());
            let narrowed = u16::try_from(*index).ok().filter(|_| in_range);
            let Some(narrowed) = narrowed else {
                return Err(RenderingError::IndexOutOfRange {
                    index: *index,
                    vertices: vertices.len(),
                });
            };
            indices.push(narrowed);
        }

        Ok(Self {
            vertices,
            colors,
            indices,
        })
    }

    /// Number of triangles contained in the mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Sphere steered by the player to trigger enemy sensors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbePresentation {
    /// Centre of the probe in world space.
    pub center: Vec3,
    /// Radius of the probe.
    pub radius: f32,
    /// Fill color of the probe.
    pub color: Color,
}

impl ProbePresentation {
    /// Creates a new probe descriptor.
    #[must_use]
    pub const fn new(center: Vec3, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }
}

/// Camera orbiting a fixed focus point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPresentation {
    /// Point the camera looks at.
    pub target: Vec3,
    /// Horizontal distance between the camera and its target.
    pub distance: f32,
    /// Height of the camera above its target.
    pub height: f32,
    /// Orbit angle around the vertical axis, in radians.
    pub yaw: f32,
}

impl CameraPresentation {
    /// Creates a new orbit camera descriptor.
    #[must_use]
    pub const fn new(target: Vec3, distance: f32, height: f32, yaw: f32) -> Self {
        Self {
            target,
            distance,
            height,
            yaw,
        }
    }

    /// World-space position of the camera.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.target
            + Vec3::new(
                self.distance * self.yaw.sin(),
                self.height,
                self.distance * self.yaw.cos(),
            )
    }

    /// Returns the camera rotated around its target by `delta` radians.
    #[must_use]
    pub fn orbited(self, delta: f32) -> Self {
        Self {
            yaw: (self.yaw + delta).rem_euclid(std::f32::consts::TAU),
            ..self
        }
    }
}

/// Scene description combining the terrain, enemies and probe.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Static terrain surface.
    pub terrain: TerrainPresentation,
    /// Enemies currently alive or popping.
    pub enemies: Vec<EnemyPresentation>,
    /// Player-controlled probe.
    pub probe: ProbePresentation,
    /// Camera used to view the scene.
    pub camera: CameraPresentation,
    /// Single-line status text drawn over the scene.
    pub status: String,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        terrain: TerrainPresentation,
        enemies: Vec<EnemyPresentation>,
        probe: ProbePresentation,
        camera: CameraPresentation,
    ) -> Self {
        Self {
            terrain,
            enemies,
            probe,
            camera,
            status: String::new(),
        }
    }

    /// Replaces the enemy list with presentations derived from snapshots.
    pub fn set_enemies<'a, I>(&mut self, snapshots: I)
    where
        I: IntoIterator<Item = &'a EnemySnapshot>,
    {
        self.enemies.clear();
        self.enemies
            .extend(snapshots.into_iter().map(EnemyPresentation::from_snapshot));
    }

    /// Number of enemies currently playing their pop animation.
    #[must_use]
    pub fn popping_enemies(&self) -> usize {
        self.enemies
            .iter()
            .filter(|enemy| enemy.popping)
            .count()
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Hoverfield scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Every vertex requires exactly one color.
    MismatchedVertexColors {
        /// Number of vertices supplied.
        vertices: usize,
        /// Number of colors supplied.
        colors: usize,
    },
    /// The mesh holds more vertices than 16-bit indices can address.
    TerrainTooDense {
        /// Number of vertices supplied.
        vertices: usize,
    },
    /// A triangle referenced a vertex outside the mesh.
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Number of vertices supplied.
        vertices: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MismatchedVertexColors { vertices, colors } => write!(
                f,
                "terrain has {vertices} vertices but {colors} vertex colors"
            ),
            Self::TerrainTooDense { vertices } => write!(
                f,
                "terrain has {vertices} vertices; at most {MAX_TERRAIN_VERTICES} are supported"
            ),
            Self::IndexOutOfRange { index, vertices } => write!(
                f,
                "terrain index {index} is out of range for {vertices} vertices"
            ),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use hoverfield_core::EnemyId;

    fn snapshot(popping: bool, progress: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(3),
            phase_index: 3,
            position: Vec3::new(1.0, 2.0, 3.0),
            popping,
            progress,
        }
    }

    fn quad() -> (Vec<Vec3>, Vec<Color>) {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let colors = vec![Color::from_rgb([0.5, 0.5, 0.5]); 4];
        (vertices, colors)
    }

    #[test]
    fn resting_enemy_uses_base_color_and_opacity() {
        let presentation = EnemyPresentation::from_snapshot(&snapshot(false, 0.0));

        assert_eq!(presentation.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(presentation.radius, 0.5);
        assert_eq!(presentation.subdivisions, 32);
        assert_eq!(presentation.scale, 1.0);
        assert_eq!(presentation.color, ENEMY_BASE_COLOR.with_alpha(0.7));
    }

    #[test]
    fn popping_enemy_turns_red_grows_and_fades() {
        let start = EnemyPresentation::from_snapshot(&snapshot(true, 0.0));
        assert_eq!(start.color, ENEMY_HIT_COLOR.with_alpha(0.7));
        assert_eq!(start.scale, 1.0);

        let halfway = EnemyPresentation::from_snapshot(&snapshot(true, 0.5));
        assert!((halfway.scale - 1.4375).abs() < 1e-6);
        assert!((halfway.color.alpha - 0.0875).abs() < 1e-6);

        let end = EnemyPresentation::from_snapshot(&snapshot(true, 1.0));
        assert!((end.scaled_radius() - 0.75).abs() < 1e-6);
        assert_eq!(end.color.alpha, 0.0);
    }

    #[test]
    fn terrain_presentation_flattens_triangles() {
        let (vertices, colors) = quad();
        let terrain = TerrainPresentation::new(vertices, colors, &[[0, 1, 3], [1, 2, 3]])
            .expect("valid quad");

        assert_eq!(terrain.indices, vec![0, 1, 3, 1, 2, 3]);
        assert_eq!(terrain.triangle_count(), 2);
    }

    #[test]
    fn terrain_presentation_rejects_mismatched_colors() {
        let (vertices, mut colors) = quad();
        let _ = colors.pop();
        let error = TerrainPresentation::new(vertices, colors, &[])
            .expect_err("missing color must be rejected");

        assert_eq!(
            error,
            RenderingError::MismatchedVertexColors {
                vertices: 4,
                colors: 3
            }
        );
    }

    #[test]
    fn terrain_presentation_rejects_dangling_indices() {
        let (vertices, colors) = quad();
        let error = TerrainPresentation::new(vertices, colors, &[[0, 1, 4]])
            .expect_err("index 4 is out of range");

        assert_eq!(
            error,
            RenderingError::IndexOutOfRange {
                index: 4,
                vertices: 4
            }
        );
    }

    #[test]
    fn camera_orbit_wraps_and_keeps_distance() {
        let camera = CameraPresentation::new(Vec3::ZERO, 10.0, 5.0, 0.0);
        assert!(camera.eye().abs_diff_eq(Vec3::new(0.0, 5.0, 10.0), 1e-5));

        let turned = camera.orbited(std::f32::consts::TAU + 1.0);
        assert!((turned.yaw - 1.0).abs() < 1e-5);
        let horizontal = Vec3::new(turned.eye().x, 0.0, turned.eye().z);
        assert!((horizontal.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn scene_tracks_popping_enemies() {
        let (vertices, colors) = quad();
        let terrain = TerrainPresentation::new(vertices, colors, &[]).expect("valid terrain");
        let mut scene = Scene::new(
            terrain,
            Vec::new(),
            ProbePresentation::new(Vec3::ZERO, 1.0, Color::from_rgb_u8(255, 255, 0)),
            CameraPresentation::new(Vec3::ZERO, 10.0, 5.0, 0.0),
        );

        let snapshots = [snapshot(false, 0.0), snapshot(true, 0.3), snapshot(true, 1.0)];
        scene.set_enemies(snapshots.iter());

        assert_eq!(scene.enemies.len(), 3);
        assert_eq!(scene.popping_enemies(), 2);
    }
}
