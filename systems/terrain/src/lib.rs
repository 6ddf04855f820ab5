#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural terrain height field and static collision surface.
//!
//! A [`TerrainField`] is built once from a [`TerrainConfig`] and never mutated
//! afterwards, so it can be shared freely between the rendering and physics
//! collaborators. Heights come from three octaves of seeded simplex noise and
//! every vertex is tinted according to fixed height bands.

mod noise;

pub use noise::SimplexNoise;

use glam::Vec3;
use hoverfield_core::TERRAIN_VERTICAL_OFFSET;
use thiserror::Error;

const TERRAIN_SEED: u64 = 0x7e44_a1d5_0c3a_9b17;

/// Largest number of segments allowed along each side of the grid.
pub const MAX_RESOLUTION: u32 = 4_096;

// Base sampling frequency of the first octave.
const BASE_FREQUENCY: f64 = 0.01;

// (frequency multiplier, weight) per octave.
const OCTAVES: [(f64, f64); 3] = [(1.0, 1.0), (5.0, 0.5), (10.0, 0.25)];

/// Parameters describing the terrain to generate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainConfig {
    width: f32,
    depth: f32,
    resolution: u32,
    max_height: f32,
    seed: u64,
    vertical_offset: f32,
}

impl TerrainConfig {
    /// Creates a configuration placed at the canonical vertical offset.
    #[must_use]
    pub const fn new(width: f32, depth: f32, resolution: u32, max_height: f32, seed: u64) -> Self {
        Self {
            width,
            depth,
            resolution,
            max_height,
            seed,
            vertical_offset: TERRAIN_VERTICAL_OFFSET,
        }
    }

    /// Overrides the vertical offset applied to the collision surface.
    #[must_use]
    pub const fn with_vertical_offset(mut self, vertical_offset: f32) -> Self {
        self.vertical_offset = vertical_offset;
        self
    }

    /// Overrides the seed used to draw the noise source.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Extent of the terrain along the x axis.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Extent of the terrain along the z axis.
    #[must_use]
    pub const fn depth(&self) -> f32 {
        self.depth
    }

    /// Number of grid segments along each side.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Height produced by a noise sum of `1.0`.
    #[must_use]
    pub const fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Seed used to draw the noise source.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Vertical translation applied to the world-space surface.
    #[must_use]
    pub const fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    fn validate(&self) -> Result<(), TerrainError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(TerrainError::InvalidWidth { width: self.width });
        }
        if !(self.depth.is_finite() && self.depth > 0.0) {
            return Err(TerrainError::InvalidDepth { depth: self.depth });
        }
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(TerrainError::InvalidResolution {
                resolution: self.resolution,
            });
        }
        if !(self.max_height.is_finite() && self.max_height >= 0.0) {
            return Err(TerrainError::InvalidMaxHeight {
                max_height: self.max_height,
            });
        }
        if !self.vertical_offset.is_finite() {
            return Err(TerrainError::InvalidVerticalOffset {
                vertical_offset: self.vertical_offset,
            });
        }
        Ok(())
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::new(100.0, 100.0, 128, 20.0, TERRAIN_SEED)
    }
}

/// Errors reported when a terrain configuration cannot produce geometry.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum TerrainError {
    /// The width was zero, negative or not finite.
    #[error("terrain width must be positive and finite (received {width})")]
    InvalidWidth {
        /// Width that failed validation.
        width: f32,
    },
    /// The depth was zero, negative or not finite.
    #[error("terrain depth must be positive and finite (received {depth})")]
    InvalidDepth {
        /// Depth that failed validation.
        depth: f32,
    },
    /// The resolution was zero or exceeded [`MAX_RESOLUTION`].
    #[error("terrain resolution must lie in 1..=4096 (received {resolution})")]
    InvalidResolution {
        /// Resolution that failed validation.
        resolution: u32,
    },
    /// The maximum height was negative or not finite.
    #[error("terrain max height must be non-negative and finite (received {max_height})")]
    InvalidMaxHeight {
        /// Maximum height that failed validation.
        max_height: f32,
    },
    /// The vertical offset was not finite.
    #[error("terrain vertical offset must be finite (received {vertical_offset})")]
    InvalidVerticalOffset {
        /// Offset that failed validation.
        vertical_offset: f32,
    },
}

/// Surface category assigned to a vertex from its height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainBand {
    /// Heights below 5.
    Water,
    /// Heights from 5 up to 10.
    Sand,
    /// Heights from 10 up to 15.
    Grass,
    /// Heights of 15 and above.
    Rock,
}

impl TerrainBand {
    /// Classifies a height using absolute thresholds.
    #[must_use]
    pub fn classify(height: f32) -> Self {
        if height < 5.0 {
            Self::Water
        } else if height < 10.0 {
            Self::Sand
        } else if height < 15.0 {
            Self::Grass
        } else {
            Self::Rock
        }
    }

    /// Linear RGB color used to tint vertices of this band.
    #[must_use]
    pub const fn color(self) -> [f32; 3] {
        match self {
            Self::Water => [0.0, 0.5, 0.8],
            Self::Sand => [0.8, 0.7, 0.5],
            Self::Grass => [0.1, 0.6, 0.1],
            Self::Rock => [0.5, 0.5, 0.5],
        }
    }
}

/// Triangulated static collision surface.
#[derive(Clone, Debug, PartialEq)]
pub struct TriMesh {
    /// Vertex positions in world space.
    pub vertices: Vec<Vec3>,
    /// Counter-clockwise vertex index triples.
    pub indices: Vec<[u32; 3]>,
}

/// Immutable height field generated from layered noise.
#[derive(Clone, Debug)]
pub struct TerrainField {
    config: TerrainConfig,
    heights: Vec<f32>,
    bands: Vec<TerrainBand>,
}

impl TerrainField {
    /// Generates the height field described by `config`.
    ///
    /// A single noise source is drawn from the configured seed and reused for
    /// every sample. Heights are not clamped, so the octave sum may slightly
    /// exceed `0.0..=max_height`.
    pub fn build(config: TerrainConfig) -> Result<Self, TerrainError> {
        config.validate()?;
        log::debug!(
            "building terrain {}x{} at resolution {} (max height {}, seed {:#x})",
            config.width(),
            config.depth(),
            config.resolution(),
            config.max_height(),
            config.seed()
        );

        let noise = SimplexNoise::from_seed(config.seed());
        let side = vertices_per_side(config.resolution());
        let mut heights = Vec::with_capacity(side * side);
        for row in 0..side {
            for column in 0..side {
                let (x, y) = plane_coordinates(&config, column, row);
                heights.push(sample_height(&noise, x, y, config.max_height()));
            }
        }
        let bands = heights.iter().copied().map(TerrainBand::classify).collect();

        Ok(Self {
            config,
            heights,
            bands,
        })
    }

    /// Configuration the field was generated from.
    #[must_use]
    pub const fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Number of vertices along each side of the grid.
    #[must_use]
    pub fn vertices_per_side(&self) -> usize {
        vertices_per_side(self.config.resolution())
    }

    /// Height samples in row-major order.
    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height of the vertex at the provided grid position.
    #[must_use]
    pub fn height_at(&self, column: usize, row: usize) -> Option<f32> {
        let side = self.vertices_per_side();
        if column >= side || row >= side {
            return None;
        }
        self.heights.get(row * side + column).copied()
    }

    /// Band assigned to every vertex in row-major order.
    #[must_use]
    pub fn bands(&self) -> &[TerrainBand] {
        &self.bands
    }

    /// Per-vertex RGB colors in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.bands.iter().map(|band| band.color())
    }

    /// Vertex positions in world space, laid flat and vertically offset.
    #[must_use]
    pub fn world_vertices(&self) -> Vec<Vec3> {
        let side = self.vertices_per_side();
        let offset = self.config.vertical_offset();
        let mut vertices = Vec::with_capacity(self.heights.len());
        for row in 0..side {
            for column in 0..side {
                let (x, y) = plane_coordinates(&self.config, column, row);
                let height = self.heights[row * side + column];
                vertices.push(Vec3::new(x as f32, height + offset, -(y as f32)));
            }
        }
        vertices
    }

    /// Index triples covering every grid quad with two triangles.
    #[must_use]
    pub fn triangle_indices(&self) -> Vec<[u32; 3]> {
        let segments = self.config.resolution();
        let stride = segments + 1;
        let capacity = usize::try_from(segments).unwrap_or(0).pow(2) * 2;
        let mut indices = Vec::with_capacity(capacity);
        for row in 0..segments {
            for column in 0..segments {
                let a = column + stride * row;
                let b = column + stride * (row + 1);
                let c = column + 1 + stride * (row + 1);
                let d = column + 1 + stride * row;
                indices.push([a, b, d]);
                indices.push([b, c, d]);
            }
        }
        indices
    }

    /// Static trimesh collider equivalent to the rendered surface.
    #[must_use]
    pub fn collider(&self) -> TriMesh {
        TriMesh {
            vertices: self.world_vertices(),
            indices: self.triangle_indices(),
        }
    }
}

fn vertices_per_side(resolution: u32) -> usize {
    usize::try_from(resolution).unwrap_or(0) + 1
}

fn plane_coordinates(config: &TerrainConfig, column: usize, row: usize) -> (f64, f64) {
    let width = f64::from(config.width());
    let depth = f64::from(config.depth());
    let segments = f64::from(config.resolution());
    let x = column as f64 * width / segments - width * 0.5;
    let y = depth * 0.5 - row as f64 * depth / segments;
    (x, y)
}

fn sample_height(noise: &SimplexNoise, x: f64, y: f64, max_height: f32) -> f32 {
    let sum: f64 = OCTAVES
        .iter()
        .map(|(frequency, weight)| {
            let scale = BASE_FREQUENCY * frequency;
            weight * noise.sample(x * scale, y * scale)
        })
        .sum();
    ((sum + 1.0) * 0.5 * f64::from(max_height)) as f32
}
