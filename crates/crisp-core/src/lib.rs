// Core of the crisp label engine.
// Everything here is GPU-free: projection math, pixel hinting, glyph atlas
// construction behind a rasterizer trait, number formatting and label layout.

pub mod atlas;
pub mod engine;
mod error;
pub mod format;
pub mod layout;
pub mod margin;
pub mod projection;

pub use atlas::{
    build_atlas, AtlasImage, AtlasLayout, CellMetrics, GlyphMetric, GlyphRasterizer, GlyphTable,
    RasterGlyph, DECIMAL_SEPARATOR, EXPONENT, GLYPH_SET, MINUS,
};
pub use engine::{linear_ticks, LabelEngine, Tuning};
pub use error::{Error, Result};
pub use format::{format_number, GlyphRun, MAX_GLYPHS};
pub use layout::{
    layout_label, Axis, Label, LayoutTuning, QuadVertex, FLOATS_PER_VERTEX, VERTICES_PER_GLYPH,
};
pub use margin::{reserve_margins, LabelExtents, MarginTuning};
pub use projection::{hint_to_pixel, DeviceSize, PixelSize, ProjectionRect};

#[cfg(test)]
pub(crate) mod testing;
