use hoverfield_system_terrain::{TerrainBand, TerrainConfig, TerrainError, TerrainField};

fn reference_config(seed: u64) -> TerrainConfig {
    TerrainConfig::new(100.0, 100.0, 128, 20.0, seed)
}

#[test]
fn builds_one_sample_per_grid_vertex() {
    let field = TerrainField::build(reference_config(0xabc)).expect("valid terrain");

    assert_eq!(field.vertices_per_side(), 129);
    assert_eq!(field.heights().len(), 129 * 129);
    assert_eq!(field.bands().len(), field.heights().len());
    assert_eq!(field.colors().count(), field.heights().len());
    assert_eq!(field.height_at(128, 128), field.heights().last().copied());
    assert!(field.height_at(129, 0).is_none());
}

#[test]
fn heights_stay_near_configured_range() {
    let field = TerrainField::build(reference_config(0x51ab)).expect("valid terrain");
    let max_height = field.config().max_height();

    // Three unclamped octaves sum to at most ±1.75 before normalisation.
    let lower = (1.0 - 1.75) * 0.5 * max_height;
    let upper = (1.0 + 1.75) * 0.5 * max_height;
    for height in field.heights() {
        assert!(
            (lower..=upper).contains(height),
            "height {height} outside {lower}..={upper}"
        );
    }

    let minimum = field.heights().iter().copied().fold(f32::INFINITY, f32::min);
    let maximum = field
        .heights()
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    assert!(maximum > minimum, "terrain should not be flat");
}

#[test]
fn bands_follow_height_thresholds() {
    let field = TerrainField::build(reference_config(0x77)).expect("valid terrain");
    for (height, band) in field.heights().iter().zip(field.bands()) {
        assert_eq!(*band, TerrainBand::classify(*height));
    }
    for (band, color) in field.bands().iter().zip(field.colors()) {
        assert_eq!(band.color(), color);
    }
}

#[test]
fn identical_seeds_produce_identical_fields() {
    let first = TerrainField::build(reference_config(1_234)).expect("valid terrain");
    let second = TerrainField::build(reference_config(1_234)).expect("valid terrain");
    assert_eq!(first.heights(), second.heights());
    assert_eq!(first.bands(), second.bands());
}

#[test]
fn different_seeds_produce_different_fields() {
    let first = TerrainField::build(reference_config(1_234)).expect("valid terrain");
    let second = TerrainField::build(reference_config(4_321)).expect("valid terrain");
    assert_ne!(first.heights(), second.heights());
}

#[test]
fn collider_matches_offset_grid() {
    let config = TerrainConfig::new(40.0, 20.0, 8, 10.0, 9);
    let field = TerrainField::build(config).expect("valid terrain");
    let collider = field.collider();

    assert_eq!(collider.vertices.len(), 81);
    assert_eq!(collider.indices.len(), 8 * 8 * 2);
    assert!(collider
        .indices
        .iter()
        .flatten()
        .all(|index| (*index as usize) < collider.vertices.len()));

    for (vertex, height) in collider.vertices.iter().zip(field.heights()) {
        assert!((vertex.y - (height - 50.0)).abs() < 1e-4);
    }

    let first = collider.vertices[0];
    let last = collider.vertices[80];
    assert_eq!((first.x, first.z), (-20.0, -10.0));
    assert_eq!((last.x, last.z), (20.0, 10.0));
    assert_eq!(collider.indices[0], [0, 9, 1]);
    assert_eq!(collider.indices[1], [9, 10, 1]);
}

#[test]
fn vertical_offset_is_configurable() {
    let config = TerrainConfig::new(10.0, 10.0, 2, 4.0, 3).with_vertical_offset(0.0);
    let field = TerrainField::build(config).expect("valid terrain");
    for (vertex, height) in field.world_vertices().iter().zip(field.heights()) {
        assert_eq!(vertex.y, *height);
    }
}

#[test]
fn invalid_dimensions_fail_fast() {
    let error = TerrainField::build(TerrainConfig::new(100.0, 0.0, 16, 20.0, 1))
        .expect_err("zero depth must be rejected");
    assert_eq!(error, TerrainError::InvalidDepth { depth: 0.0 });
    assert_eq!(
        error.to_string(),
        "terrain depth must be positive and finite (received 0)"
    );

    assert!(TerrainField::build(TerrainConfig::new(-5.0, 10.0, 16, 20.0, 1)).is_err());
    assert!(TerrainField::build(TerrainConfig::new(10.0, 10.0, 0, 20.0, 1)).is_err());
}
