// Fontless rasterizer used by the unit tests.

use crate::{CellMetrics, Error, GlyphRasterizer, RasterGlyph, Result};

pub(crate) const CELL_W: u32 = 7;
pub(crate) const CELL_H: u32 = 16;
pub(crate) const BASELINE: u32 = 12;

/// Draws every glyph as a solid block, 5x9 px, one pixel right of the pen.
pub(crate) struct BlockRasterizer {
    pub(crate) fail_on: Option<char>,
    pub(crate) blank_on: Option<char>,
}

impl BlockRasterizer {
    pub(crate) fn new() -> Self {
        Self {
            fail_on: None,
            blank_on: None,
        }
    }
}

impl GlyphRasterizer for BlockRasterizer {
    fn cell_metrics(&mut self) -> Result<CellMetrics> {
        Ok(CellMetrics {
            width: CELL_W,
            height: CELL_H,
            baseline: BASELINE,
        })
    }

    fn rasterize(&mut self, character: char) -> Result<RasterGlyph> {
        if self.fail_on == Some(character) {
            return Err(Error::Initialization(format!("no face for {character:?}")));
        }
        let fill = if self.blank_on == Some(character) { 0 } else { 255 };
        Ok(RasterGlyph {
            coverage: vec![fill; 5 * 9],
            width: 5,
            height: 9,
            left: 1.0,
            top: 9.0,
            advance: CELL_W as f32,
        })
    }
}

pub(crate) fn atlas() -> crate::AtlasImage {
    crate::build_atlas(&mut BlockRasterizer::new()).unwrap()
}
