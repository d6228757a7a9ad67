// cosmic-text glyph source for the label atlas.

use cosmic_text::{
    Attrs, Buffer as CosmicBuffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent,
};
use crisp_core::{CellMetrics, Error, GlyphRasterizer, RasterGlyph, Result};

/// Glyph that sizes every atlas cell.
const REFERENCE_GLYPH: &str = "0";

/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// [`GlyphRasterizer`] over cosmic-text's system font database, monospace family.
pub struct CosmicRasterizer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    font_size_px: f32,
    line_height: f32,
}

impl CosmicRasterizer {
    pub fn new(font_size_px: f32) -> Self {
        Self::with_font_system(FontSystem::new(), font_size_px)
    }

    /// Use an existing font database, e.g. one with extra fonts loaded.
    pub fn with_font_system(font_system: FontSystem, font_size_px: f32) -> Self {
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            font_size_px,
            line_height: (font_size_px * LINE_HEIGHT_FACTOR).ceil(),
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size_px
    }

    fn shape(&mut self, text: &str) -> CosmicBuffer {
        let metrics = Metrics::new(self.font_size_px, self.line_height);
        let mut buffer = CosmicBuffer::new(&mut self.font_system, metrics);
        buffer.set_text(
            &mut self.font_system,
            text,
            Attrs::new().family(Family::Monospace),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl GlyphRasterizer for CosmicRasterizer {
    fn cell_metrics(&mut self) -> Result<CellMetrics> {
        let buffer = self.shape(REFERENCE_GLYPH);
        let run = buffer.layout_runs().next().ok_or_else(|| {
            Error::Initialization("reference glyph produced no layout run".to_string())
        })?;
        let glyph = run.glyphs.first().ok_or_else(|| {
            Error::Initialization("reference glyph produced no glyph".to_string())
        })?;

        Ok(CellMetrics {
            width: glyph.w.ceil() as u32,
            height: self.line_height as u32,
            baseline: (run.line_y - run.line_top).round() as u32,
        })
    }

    fn rasterize(&mut self, character: char) -> Result<RasterGlyph> {
        let buffer = self.shape(&character.to_string());
        let (physical, advance) = buffer
            .layout_runs()
            .next()
            .and_then(|run| run.glyphs.first())
            .filter(|glyph| glyph.glyph_id != 0)
            .map(|glyph| (glyph.physical((0.0, 0.0), 1.0), glyph.w))
            .ok_or_else(|| {
                Error::Initialization(format!("no monospace font provides {character:?}"))
            })?;

        let image = self
            .swash_cache
            .get_image(&mut self.font_system, physical.cache_key)
            .as_ref()
            .ok_or_else(|| Error::Initialization(format!("swash could not render {character:?}")))?;

        let width = image.placement.width;
        let height = image.placement.height;
        let coverage = coverage_from_swash(image.content, &image.data, (width * height) as usize);

        Ok(RasterGlyph {
            coverage,
            width,
            height,
            left: (physical.x + image.placement.left) as f32,
            top: image.placement.top as f32,
            advance,
        })
    }
}

/// Reduce a swash image to one coverage byte per pixel.
pub(crate) fn coverage_from_swash(content: SwashContent, data: &[u8], pixels: usize) -> Vec<u8> {
    if pixels == 0 {
        return Vec::new();
    }
    let channels = (data.len() / pixels).max(1);
    match content {
        SwashContent::Mask => data.to_vec(),
        // RGBA -> alpha channel
        SwashContent::Color => data
            .chunks(channels)
            .map(|c| c.get(3).copied().unwrap_or(255))
            .collect(),
        // Subpixel RGB -> average as grayscale
        SwashContent::SubpixelMask => data
            .chunks(channels)
            .map(|c| {
                let sum: u16 = c.iter().take(3).map(|&v| u16::from(v)).sum();
                (sum / c.len().clamp(1, 3) as u16) as u8
            })
            .collect(),
    }
}
