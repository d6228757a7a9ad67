// Margin reservation: grow the projection window so labels get screen space
// outside the plotted data, then put the window back on the pixel grid.


use serde::Deserialize;

use crate::atlas::CellMetrics;
use crate::layout::{Axis, Label};
use crate::projection::{hint_to_pixel, DeviceSize, PixelSize, ProjectionRect};
use crate::Result;

/// Empirical margin constants.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MarginTuning {
    /// Extra left margin beyond the widest vertical label, in character widths.
    pub left_padding_chars: f64,
    /// Extra bottom margin beyond the tallest horizontal label, in pixels.
    pub bottom_padding_px: f64,
    /// Fixed right margin, in pixels.
    pub right_margin_px: f64,
    /// Top margin as a fraction of the label height.
    pub top_margin_text_fraction: f64,
}

impl Default for MarginTuning {
    fn default() -> Self {
        Self {
            left_padding_chars: 1.0,
            bottom_padding_px: 2.0,
            right_margin_px: 10.0,
            top_margin_text_fraction: 0.5,
        }
    }
}

/// Screen space the current label set needs, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LabelExtents {
    /// Widest vertical label (they occupy the left margin).
    pub max_width_px: f64,
    /// Tallest horizontal label (they occupy the bottom margin).
    pub max_height_px: f64,
    pub char_width_px: f64,
}

impl LabelExtents {
    pub fn from_labels(labels: &[Label], cell: CellMetrics) -> Self {
        let max_width_px = labels
            .iter()
            .filter(|l| l.axis == Axis::Vertical)
            .map(|l| l.pixel_width)
            .max()
            .unwrap_or(0);
        let max_height_px = labels
            .iter()
            .filter(|l| l.axis == Axis::Horizontal)
            .map(|l| l.pixel_height)
            .max()
            .unwrap_or(0);
        Self {
            max_width_px: f64::from(max_width_px),
            max_height_px: f64::from(max_height_px),
            char_width_px: f64::from(cell.width),
        }
    }
}

/// Grow `rect` to reserve label space and re-hint it for a `device`-sized surface.
///
/// Returns the new rect and the pixel size derived from it. Pixel size is
/// recomputed after the rect grows and before any edge is hinted; the hinted
/// rect spans exactly `device` pixels of that size, so the pixel size derived
/// from it matches the grid every label is later hinted against. The result
/// contains `rect` for any non-negative tuning on surfaces wider and taller
/// than one pixel.
pub fn reserve_margins(
    rect: &ProjectionRect,
    device: DeviceSize,
    extents: &LabelExtents,
    tuning: &MarginTuning,
) -> Result<(ProjectionRect, PixelSize)> {
    let pixel = PixelSize::derive(rect, device)?;
    let device_w = f64::from(device.width);
    let device_h = f64::from(device.height);

    let x_offset = extents.max_width_px + tuning.left_padding_chars * extents.char_width_px;
    let y_offset = extents.max_height_px + tuning.bottom_padding_px;

    // Growing the rect makes every pixel larger; pre-scale so the reserved
    // band still measures about `x_offset` / `y_offset` pixels afterwards.
    let grow_w = x_offset * pixel.width / device_w;
    let grow_h = y_offset * pixel.height / device_h;

    let grown = ProjectionRect {
        left: rect.left - (pixel.width + grow_w) * x_offset,
        right: rect.right + pixel.width * tuning.right_margin_px,
        bottom: rect.bottom - (pixel.height + grow_h) * y_offset,
        top: rect.top + pixel.height * extents.max_height_px * tuning.top_margin_text_fraction,
    };
    grown.validate()?;

    // Hinting floors left and bottom by up to one pixel, and the opposite
    // edges follow them down. Spreading the grown rect over one pixel fewer
    // leaves that pixel as slack, so right and top still cover the data.
    let slack = DeviceSize::new(
        device.width.saturating_sub(1).max(1),
        device.height.saturating_sub(1).max(1),
    );
    let pixel = PixelSize::derive(&grown, slack)?;
    let left = hint_to_pixel(grown.left, pixel.width);
    let bottom = hint_to_pixel(grown.bottom, pixel.height);
    let hinted = ProjectionRect {
        left,
        right: hint_to_pixel(left + device_w * pixel.width, pixel.width),
        bottom,
        top: hint_to_pixel(bottom + device_h * pixel.height, pixel.height),
    };
    hinted.validate()?;

    let pixel = PixelSize::derive(&hinted, device)?;
    log::debug!(
        "Reserved label margins: {x_offset}x{y_offset} px, projection {hinted:?}, pixel {pixel:?}"
    );
    Ok((hinted, pixel))
}
