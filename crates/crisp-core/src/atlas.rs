// Glyph atlas construction: rasterize the fixed label glyph set once into a
// single-row coverage bitmap and record per-glyph metrics.

mod tests;

use std::collections::HashMap;

use crate::{Error, Result};

pub const DECIMAL_SEPARATOR: char = ',';
pub const MINUS: char = '-';
pub const EXPONENT: char = 'e';

/// Every glyph a label can contain, in atlas column order.
pub const GLYPH_SET: [char; 13] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', DECIMAL_SEPARATOR, MINUS, EXPONENT,
];

// ──────────────────────────────────────────────
// Rasterizer seam
// ──────────────────────────────────────────────

/// Uniform cell measured from a reference glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub width: u32,
    pub height: u32,
    /// Distance from the cell top to the baseline, in pixels.
    pub baseline: u32,
}

/// A single rasterized glyph as produced by the font backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGlyph {
    /// Coverage bitmap, one byte per pixel, row-major, `width * height` long.
    pub coverage: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Horizontal offset from the pen position to the first ink column.
    pub left: f32,
    /// Distance from the baseline up to the first ink row.
    pub top: f32,
    pub advance: f32,
}

/// Font backend used by [`build_atlas`].
pub trait GlyphRasterizer {
    /// Measure the reference glyph that sizes every atlas cell.
    fn cell_metrics(&mut self) -> Result<CellMetrics>;
    /// Rasterize one character as white-on-black coverage.
    fn rasterize(&mut self, character: char) -> Result<RasterGlyph>;
}

// ──────────────────────────────────────────────
// Metric table
// ──────────────────────────────────────────────

/// Placement of one glyph, in whole device pixels except for the UV column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetric {
    pub box_width: u32,
    pub box_height: u32,
    pub bearing_x: i32,
    pub advance: i32,
    /// Left edge of the glyph's atlas column in UV space.
    pub atlas_u: f64,
}

/// Read-only glyph metrics keyed by character.
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    metrics: HashMap<char, GlyphMetric>,
}

impl GlyphTable {
    pub fn get(&self, character: char) -> Result<&GlyphMetric> {
        self.metrics.get(&character).ok_or_else(|| {
            Error::InvariantViolation(format!("glyph {character:?} is not in the atlas"))
        })
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub(crate) fn insert(&mut self, character: char, metric: GlyphMetric) {
        self.metrics.insert(character, metric);
    }
}

/// How glyph cells map into texture UV space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLayout {
    pub column_count: u32,
    pub row_count: u32,
    pub column_factor: f64,
    pub row_factor: f64,
}

impl AtlasLayout {
    fn single_row(column_count: u32) -> Self {
        Self {
            column_count,
            row_count: 1,
            column_factor: 1.0 / f64::from(column_count),
            row_factor: 1.0,
        }
    }
}

/// CPU-side atlas: the coverage bitmap ready for upload plus its metrics.
#[derive(Debug, Clone)]
pub struct AtlasImage {
    pub width: u32,
    pub height: u32,
    /// Single channel, row-major, top row first.
    pub pixels: Vec<u8>,
    pub cell: CellMetrics,
    pub layout: AtlasLayout,
    pub metrics: GlyphTable,
}

// ──────────────────────────────────────────────
// Builder
// ──────────────────────────────────────────────

/// Rasterize [`GLYPH_SET`] side by side into one row of equal cells.
///
/// Runs once at startup. Any glyph that fails to rasterize, or comes back with
/// no ink, aborts the build: there is no fallback glyph.
pub fn build_atlas<R: GlyphRasterizer + ?Sized>(rasterizer: &mut R) -> Result<AtlasImage> {
    let cell = rasterizer.cell_metrics()?;
    if cell.width == 0 || cell.height == 0 {
        return Err(Error::Initialization(format!(
            "reference glyph measured as {}x{}",
            cell.width, cell.height
        )));
    }

    let columns = GLYPH_SET.len() as u32;
    let layout = AtlasLayout::single_row(columns);
    let width = cell.width * columns;
    let height = cell.height;
    let mut pixels = vec![0u8; (width * height) as usize];
    let mut metrics = GlyphTable::default();

    for (column, &character) in GLYPH_SET.iter().enumerate() {
        let glyph = rasterizer.rasterize(character)?;
        if glyph.width == 0 || glyph.height == 0 || glyph.coverage.iter().all(|&c| c == 0) {
            return Err(Error::Initialization(format!(
                "glyph {character:?} rasterized without ink"
            )));
        }
        if glyph.coverage.len() != (glyph.width * glyph.height) as usize {
            return Err(Error::Initialization(format!(
                "glyph {character:?}: coverage length {} does not match {}x{}",
                glyph.coverage.len(),
                glyph.width,
                glyph.height
            )));
        }

        let origin_x = column as u32 * cell.width;
        let origin_y = cell.baseline as i64 - glyph.top.round() as i64;
        blit_into_cell(&mut pixels, width, &cell, origin_x, origin_y, &glyph);

        metrics.insert(
            character,
            GlyphMetric {
                box_width: cell.width,
                box_height: cell.height,
                bearing_x: glyph.left.round() as i32,
                advance: glyph.advance.round() as i32,
                atlas_u: column as f64 * layout.column_factor,
            },
        );
    }

    log::info!(
        "Built label atlas: {} glyphs, {}x{} px ({}x{} cells)",
        metrics.len(),
        width,
        height,
        cell.width,
        cell.height
    );

    Ok(AtlasImage {
        width,
        height,
        pixels,
        cell,
        layout,
        metrics,
    })
}

/// Copy glyph coverage into its cell, ink starting at the cell's left edge.
/// Rows and columns falling outside the cell are clipped so nothing bleeds
/// into the neighbouring column.
fn blit_into_cell(
    pixels: &mut [u8],
    atlas_width: u32,
    cell: &CellMetrics,
    origin_x: u32,
    origin_y: i64,
    glyph: &RasterGlyph,
) {
    let copy_w = glyph.width.min(cell.width);
    for row in 0..glyph.height {
        let y = origin_y + i64::from(row);
        if y < 0 || y >= i64::from(cell.height) {
            continue;
        }
        let src = (row * glyph.width) as usize;
        let dst = (y as u32 * atlas_width + origin_x) as usize;
        pixels[dst..dst + copy_w as usize]
            .copy_from_slice(&glyph.coverage[src..src + copy_w as usize]);
    }
}
