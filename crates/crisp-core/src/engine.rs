// LabelEngine: owns the projection state and the label set, and runs the
// reservation + layout pipeline whenever the surface, projection or ticks change.


use serde::Deserialize;

use crate::atlas::{AtlasImage, AtlasLayout, CellMetrics, GlyphTable};
use crate::layout::{layout_label, Axis, Label, LayoutTuning};
use crate::margin::{reserve_margins, LabelExtents, MarginTuning};
use crate::projection::{DeviceSize, PixelSize, ProjectionRect};
use crate::Result;

/// All empirical layout constants in one place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub margin: MarginTuning,
    pub layout: LayoutTuning,
}

pub struct LabelEngine {
    metrics: GlyphTable,
    atlas_layout: AtlasLayout,
    cell: CellMetrics,
    tuning: Tuning,

    /// Rect supplied by the host, before any margin is reserved.
    data_rect: ProjectionRect,
    /// Effective rect after reservation and hinting.
    projection: ProjectionRect,
    pixel: Option<PixelSize>,
    device: Option<DeviceSize>,

    /// Vertical labels first, then horizontal, each in tick order.
    labels: Vec<Label>,
    /// Bumped on every change to label geometry.
    generation: u64,
}

impl LabelEngine {
    pub fn new(atlas: &AtlasImage, data_rect: ProjectionRect, tuning: Tuning) -> Self {
        Self {
            metrics: atlas.metrics.clone(),
            atlas_layout: atlas.layout,
            cell: atlas.cell,
            tuning,
            data_rect,
            projection: data_rect,
            pixel: None,
            device: None,
            labels: Vec::new(),
            generation: 0,
        }
    }

    // ── Host operations ────────────────────────

    /// Replace the data rectangle. Margins are reserved on top of it.
    pub fn set_projection(&mut self, rect: ProjectionRect) -> Result<()> {
        rect.validate()?;
        self.data_rect = rect;
        if self.device.is_none() {
            self.projection = rect;
            self.generation += 1;
            return Ok(());
        }
        self.recompute()
    }

    /// The drawable surface changed size.
    pub fn resize(&mut self, device: DeviceSize) -> Result<()> {
        self.relayout(device)
    }

    /// Replace every label. No label survives from the previous set.
    pub fn set_tick_values(&mut self, vertical: &[f64], horizontal: &[f64]) -> Result<()> {
        let vertical = vertical
            .iter()
            .map(|&v| Label::new(v, Axis::Vertical, &self.metrics));
        let horizontal = horizontal
            .iter()
            .map(|&v| Label::new(v, Axis::Horizontal, &self.metrics));
        self.labels = vertical.chain(horizontal).collect::<Result<Vec<_>>>()?;
        self.generation += 1;
        log::debug!("Label set replaced: {} labels", self.labels.len());

        if self.device.is_some() {
            self.recompute()?;
        }
        Ok(())
    }

    fn recompute(&mut self) -> Result<()> {
        match self.device {
            Some(device) => self.relayout(device),
            None => Ok(()),
        }
    }

    /// Reserve margins from the data rect, then lay out every label against
    /// the resulting projection. Always starts from the data rect, so running
    /// it twice with the same inputs gives identical results. Nothing is
    /// modified when the reservation fails.
    fn relayout(&mut self, device: DeviceSize) -> Result<()> {
        let extents = LabelExtents::from_labels(&self.labels, self.cell);
        let (projection, pixel) =
            reserve_margins(&self.data_rect, device, &extents, &self.tuning.margin)?;

        for label in &mut self.labels {
            layout_label(
                label,
                &projection,
                pixel,
                &self.atlas_layout,
                &self.tuning.layout,
            );
        }

        self.device = Some(device);
        self.projection = projection;
        self.pixel = Some(pixel);
        self.generation += 1;
        log::debug!(
            "Relaid {} labels for {}x{} surface",
            self.labels.len(),
            device.width,
            device.height
        );
        Ok(())
    }

    // ── Accessors ──────────────────────────────

    /// Effective projection, including reserved margins.
    pub fn projection(&self) -> ProjectionRect {
        self.projection
    }

    pub fn data_projection(&self) -> ProjectionRect {
        self.data_rect
    }

    /// Orthographic matrix for [`Self::projection`], column-major.
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        self.projection.ortho_matrix()
    }

    /// `None` until the first resize.
    pub fn pixel_size(&self) -> Option<PixelSize> {
        self.pixel
    }

    pub fn device_size(&self) -> Option<DeviceSize> {
        self.device
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cell(&self) -> CellMetrics {
        self.cell
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

/// `count` evenly spaced values from `min` to `max`, both ends included.
pub fn linear_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        max
                    } else {
                        min + (max - min) * i as f64 / last
                    }
                })
                .collect()
        }
    }
}
