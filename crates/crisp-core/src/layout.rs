// Label layout: one run of textured quads per tick value.
//
// Buffer is packed [Screen X | Screen Y | Tex U | Tex V] x6 per glyph,
// two triangles (0 1 2) and (3 4 5) where 3 == 0 and 4 == 2:
// 0,3---5
//  | \  |      v = 0 along the top edge, v = row factor along the bottom
//  1---2,4

mod tests;

use serde::Deserialize;

use crate::atlas::{AtlasLayout, GlyphMetric, GlyphTable};
use crate::format::{format_number, GlyphRun};
use crate::projection::{hint_to_pixel, PixelSize, ProjectionRect};
use crate::Result;

pub const VERTICES_PER_GLYPH: usize = 6;
pub const FLOATS_PER_VERTEX: usize = 4;

/// Which axis a label annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Centered under an x-axis tick, along the bottom edge.
    Horizontal,
    /// Centered beside a y-axis tick, along the left edge.
    Vertical,
}

/// One vertex of a glyph quad, in logical units and atlas UV space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadVertex {
    pub position: [f64; 2],
    pub uv: [f64; 2],
}

impl QuadVertex {
    pub fn to_array(self) -> [f64; FLOATS_PER_VERTEX] {
        [self.position[0], self.position[1], self.uv[0], self.uv[1]]
    }
}

/// Fixed screen-space offsets of labels from the projection edges.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    /// Gap between the bottom edge and horizontal labels, in pixels.
    pub horizontal_offset_px: f64,
    /// Gap between the left edge and vertical labels, in pixels.
    pub vertical_offset_px: f64,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            horizontal_offset_px: 1.0,
            vertical_offset_px: 4.0,
        }
    }
}

// ──────────────────────────────────────────────
// Label
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Label {
    pub value: f64,
    pub glyphs: GlyphRun,
    pub axis: Axis,
    /// Sum of glyph advances.
    pub pixel_width: u32,
    /// Tallest glyph box.
    pub pixel_height: u32,
    /// `glyphs.len() * VERTICES_PER_GLYPH` vertices, valid after [`layout_label`].
    pub quads: Vec<QuadVertex>,
    metrics: Vec<GlyphMetric>,
}

impl Label {
    pub fn new(value: f64, axis: Axis, table: &GlyphTable) -> Result<Self> {
        let glyphs = format_number(value);
        let metrics = glyphs
            .iter()
            .map(|&ch| table.get(ch).copied())
            .collect::<Result<Vec<_>>>()?;

        let pixel_width = metrics.iter().map(|m| m.advance.max(0) as u32).sum();
        let pixel_height = metrics.iter().map(|m| m.box_height).max().unwrap_or(0);

        Ok(Self {
            value,
            quads: vec![QuadVertex::default(); glyphs.len() * VERTICES_PER_GLYPH],
            glyphs,
            axis,
            pixel_width,
            pixel_height,
            metrics,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.quads.len()
    }

    /// Flat `[x, y, u, v, x, y, u, v, ...]` view of the quad buffer.
    pub fn flat_buffer(&self) -> Vec<f64> {
        self.quads.iter().flat_map(|v| v.to_array()).collect()
    }
}

// ──────────────────────────────────────────────
// Layout
// ──────────────────────────────────────────────

/// Recompute `label.quads` for the given projection and pixel size.
///
/// The anchor is hinted before any glyph is placed; every glyph offset after
/// that is a whole number of pixels, so all quad edges stay on the grid.
pub fn layout_label(
    label: &mut Label,
    rect: &ProjectionRect,
    pixel: PixelSize,
    atlas: &AtlasLayout,
    tuning: &LayoutTuning,
) {
    let (anchor_x, anchor_y) = match label.axis {
        Axis::Horizontal => (
            label.value - f64::from(label.pixel_width) * pixel.width / 2.0,
            rect.bottom + tuning.horizontal_offset_px * pixel.height,
        ),
        Axis::Vertical => (
            rect.left + tuning.vertical_offset_px * pixel.width,
            label.value - f64::from(label.pixel_height) * pixel.height / 2.0,
        ),
    };

    let mut cursor = hint_to_pixel(anchor_x, pixel.width);
    let bottom = hint_to_pixel(anchor_y, pixel.height);

    label.quads.clear();
    label.quads.reserve(label.metrics.len() * VERTICES_PER_GLYPH);

    for metric in &label.metrics {
        let left = cursor + f64::from(metric.bearing_x) * pixel.width;
        let right = left + f64::from(metric.box_width) * pixel.width;
        let top = bottom + f64::from(metric.box_height) * pixel.height;

        let u0 = metric.atlas_u;
        let u1 = u0 + atlas.column_factor;
        let v0 = 0.0;
        let v1 = atlas.row_factor;

        let vertex = |x: f64, y: f64, u: f64, v: f64| QuadVertex {
            position: [x, y],
            uv: [u, v],
        };
        label.quads.extend_from_slice(&[
            vertex(left, top, u0, v0),
            vertex(left, bottom, u0, v1),
            vertex(right, bottom, u1, v1),
            vertex(left, top, u0, v0),
            vertex(right, bottom, u1, v1),
            vertex(right, top, u1, v0),
        ]);

        // Ink offset (bearing) and pen advance are independent.
        cursor += f64::from(metric.advance) * pixel.width;
    }
}
