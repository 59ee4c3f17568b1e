use cosmic_text::{
    fontdb, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, Style, SwashCache, Weight,
};
use glyphfield_platform::SurfaceSize;
use tracing::{debug, warn};

use super::{AlphaMask, GlyphRasterizer};
use crate::font::{FontDescriptor, FontFamily, FontStyle};

const LOCALE: &str = "en-US";
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Text rasterizer backed by cosmic-text shaping and swash glyph rendering.
///
/// The font database and glyph cache live as long as the rasterizer; the
/// mask produced by each call is handed to the caller and not retained.
pub struct SwashRasterizer {
    font_system: FontSystem,
    cache: SwashCache,
}

impl SwashRasterizer {
    /// System fonts, with the bundled face backing `sans-serif` when the
    /// system has no face for it.
    pub fn new() -> Self {
        let mut font_system = FontSystem::new();
        install_bundled_fallback(font_system.db_mut());
        Self::from_font_system(font_system)
    }

    /// Only the bundled face. Output does not depend on installed fonts.
    pub fn bundled() -> Self {
        let mut db = fontdb::Database::new();
        install_bundled_fallback(&mut db);
        Self::from_database(db)
    }

    pub fn from_database(db: fontdb::Database) -> Self {
        Self::from_font_system(FontSystem::new_with_locale_and_db(LOCALE.to_owned(), db))
    }

    fn from_font_system(font_system: FontSystem) -> Self {
        debug!("font database holds {} faces", font_system.db().len());
        Self {
            font_system,
            cache: SwashCache::new(),
        }
    }

    fn has_family(&self, name: &str) -> bool {
        self.font_system.db().faces().any(|face| {
            face.families
                .iter()
                .any(|(family, _)| family.eq_ignore_ascii_case(name))
        })
    }

    fn resolve_family<'a>(&self, font: &'a FontDescriptor) -> Family<'a> {
        for family in &font.families {
            match family {
                FontFamily::Named(name) if self.has_family(name) => return Family::Name(name),
                FontFamily::Named(_) => continue,
                FontFamily::SansSerif => return Family::SansSerif,
                FontFamily::Serif => return Family::Serif,
                FontFamily::Monospace => return Family::Monospace,
                FontFamily::Cursive => return Family::Cursive,
                FontFamily::Fantasy => return Family::Fantasy,
            }
        }
        warn!("no installed family matches `{font}`, falling back to sans-serif");
        Family::SansSerif
    }
}

impl Default for SwashRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRasterizer for SwashRasterizer {
    fn rasterize(&mut self, text: &str, font: &FontDescriptor, size: SurfaceSize) -> AlphaMask {
        let mut mask = AlphaMask::new(size);
        if text.is_empty() || size.is_empty() {
            return mask;
        }
        if self.font_system.db().len() == 0 {
            warn!("font database is empty; nothing to rasterize");
            return mask;
        }

        let line_height = font.size_px * LINE_HEIGHT_FACTOR;
        let attrs = Attrs::new()
            .family(self.resolve_family(font))
            .weight(Weight(font.weight))
            .style(match font.style {
                FontStyle::Normal => Style::Normal,
                FontStyle::Italic => Style::Italic,
                FontStyle::Oblique => Style::Oblique,
            });

        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(font.size_px, line_height));
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut text_width: f32 = 0.0;
        let mut top = f32::MAX;
        let mut bottom = f32::MIN;
        for run in buffer.layout_runs() {
            text_width = text_width.max(run.line_w);
            top = top.min(run.line_top);
            bottom = bottom.max(run.line_top + line_height);
        }
        if bottom < top {
            return mask;
        }

        let offset_x = ((size.width as f32 - text_width) / 2.0).round() as i32;
        let offset_y = ((size.height as f32 - (bottom - top)) / 2.0 - top).round() as i32;
        buffer.draw(
            &mut self.font_system,
            &mut self.cache,
            Color::rgb(0xff, 0xff, 0xff),
            |x, y, w, h, color| {
                for dy in 0..h as i32 {
                    for dx in 0..w as i32 {
                        mask.accumulate(offset_x + x + dx, offset_y + y + dy, color.a());
                    }
                }
            },
        );
        mask
    }
}

/// Loads egui's Ubuntu-Light face and points `sans-serif` at it unless the
/// database already has a face for the current sans-serif family.
fn install_bundled_fallback(db: &mut fontdb::Database) {
    let sans = db.family_name(&fontdb::Family::SansSerif).to_owned();
    let has_sans = db
        .faces()
        .any(|face| face.families.iter().any(|(name, _)| *name == sans));
    if has_sans {
        return;
    }

    db.load_font_data(epaint_default_fonts::UBUNTU_LIGHT.to_vec());
    let bundled = db.faces().find_map(|face| {
        face.families
            .iter()
            .map(|(name, _)| name)
            .find(|name| name.starts_with("Ubuntu"))
            .cloned()
    });
    match bundled {
        Some(name) => {
            debug!("using bundled `{name}` as sans-serif fallback");
            db.set_sans_serif_family(name);
        }
        None => warn!("bundled fallback font failed to load"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ALPHA_THRESHOLD;

    fn ink_bounds(mask: &AlphaMask) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get(x, y) > ALPHA_THRESHOLD {
                    let b = bounds.get_or_insert((x, y, x, y));
                    *b = (b.0.min(x), b.1.min(y), b.2.max(x), b.3.max(y));
                }
            }
        }
        bounds
    }

    #[test]
    fn bundled_font_renders_centered_ink() {
        let mut rasterizer = SwashRasterizer::bundled();
        let font: FontDescriptor = "64px sans-serif".parse().unwrap();
        let mask = rasterizer.rasterize("HI", &font, SurfaceSize::new(200, 100));
        let (x0, y0, x1, y1) = ink_bounds(&mask).expect("no ink rendered");
        let center_x = (x0 + x1) as f32 / 2.0;
        let center_y = (y0 + y1) as f32 / 2.0;
        assert!((center_x - 100.0).abs() < 10.0, "center_x = {center_x}");
        assert!((25.0..75.0).contains(&center_y), "center_y = {center_y}");
    }

    #[test]
    fn unknown_family_falls_back() {
        let mut rasterizer = SwashRasterizer::bundled();
        let font: FontDescriptor = "bold 48px NoSuchFamily".parse().unwrap();
        let mask = rasterizer.rasterize("A", &font, SurfaceSize::new(100, 100));
        assert!(ink_bounds(&mask).is_some());
    }

    #[test]
    fn empty_database_yields_blank_mask() {
        let mut rasterizer = SwashRasterizer::from_database(fontdb::Database::new());
        let mask = rasterizer.rasterize("A", &FontDescriptor::default(), SurfaceSize::new(50, 50));
        assert!(ink_bounds(&mask).is_none());
    }
}
