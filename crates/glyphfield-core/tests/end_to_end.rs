use glyphfield_core::config::{ALPHA_THRESHOLD, SAMPLE_STEP};
use glyphfield_core::glyph::sample_mask;
use glyphfield_core::{
    FieldConfig, GlyphRasterizer, ParticleField, PixelSurface, Rgba, SwashRasterizer,
};
use glyphfield_platform::SurfaceSize;
use pretty_assertions::assert_eq;

fn scenario_config() -> FieldConfig {
    FieldConfig::from_toml_str(
        r##"
text = "AIR 4.2"
palette = ["#22d3ee", "#a855f7", "#f472b6", "#facc15"]
particle_radius = 2.0
mouse_radius = 60.0
mouse_strength = 20.0
font = "bold 120px sans-serif"
seed = 2024
"##,
    )
    .unwrap()
}

#[test]
fn air_scenario_fills_the_surface_bounds() {
    let config = scenario_config();
    let palette = config.palette.clone();
    let mut field = ParticleField::new(config, SwashRasterizer::bundled()).unwrap();
    field.resize(SurfaceSize::new(800, 200));

    let particles = field.particles();
    assert!(!particles.is_empty());
    for p in particles {
        assert!((0.0..800.0).contains(&p.base_position.x));
        assert!((0.0..200.0).contains(&p.base_position.y));
        assert!(palette.contains(&p.color));
        assert_eq!(p.size, 2.0);
    }
}

#[test]
fn store_size_matches_thresholded_samples() {
    let config = scenario_config();
    let size = SurfaceSize::new(800, 200);
    let mut rasterizer = SwashRasterizer::bundled();
    let mask = rasterizer.rasterize(&config.text, &config.font, size);
    let expected = sample_mask(&mask, SAMPLE_STEP, ALPHA_THRESHOLD).len();

    let mut field = ParticleField::new(config, SwashRasterizer::bundled()).unwrap();
    field.resize(size);
    assert_eq!(field.particles().len(), expected);
}

#[test]
fn resize_replaces_every_base_position() {
    let mut field = ParticleField::new(scenario_config(), SwashRasterizer::bundled()).unwrap();
    field.resize(SurfaceSize::new(800, 200));
    let wide: Vec<_> = field.particles().iter().map(|p| p.base_position).collect();

    field.resize(SurfaceSize::new(400, 400));
    for p in field.particles() {
        assert!(p.base_position.x < 400.0);
        assert!(p.base_position.y < 400.0);
    }
    // text re-centered on the new surface, so the old formation is gone
    let stale = field
        .particles()
        .iter()
        .filter(|p| wide.contains(&p.base_position))
        .count();
    assert!(stale < field.particles().len());
}

#[test]
fn animation_settles_into_the_glyphs() {
    let mut field = ParticleField::new(scenario_config(), SwashRasterizer::bundled()).unwrap();
    field.resize(SurfaceSize::new(800, 200));
    let mut surface = PixelSurface::new(SurfaceSize::new(800, 200), Rgba::opaque(0, 0, 0));
    for _ in 0..600 {
        field.tick();
    }
    field.render(&mut surface);
    for p in field.particles() {
        assert!(p.position.is_finite());
        assert!(p.position.distance(p.base_position) < 2.2);
    }
    let lit = surface
        .as_rgba()
        .chunks(4)
        .filter(|px| px[..3] != [0, 0, 0])
        .count();
    assert!(lit > 0);
}

#[test]
fn empty_text_draws_nothing() {
    let config = FieldConfig {
        text: String::new(),
        ..scenario_config()
    };
    let mut field = ParticleField::new(config, SwashRasterizer::bundled()).unwrap();
    field.resize(SurfaceSize::new(800, 200));
    assert!(field.particles().is_empty());
}
