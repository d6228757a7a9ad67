// Logical (data) coordinate window and its mapping onto the device pixel grid.


use crate::{Error, Result};

/// Fraction of a pixel under which a value is treated as sitting on the next boundary.
const HINT_EPSILON: f64 = 0.01;

// ──────────────────────────────────────────────
// ProjectionRect
// ──────────────────────────────────────────────

/// Orthographic projection window in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionRect {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl ProjectionRect {
    /// Create a rect, rejecting empty or inverted extents.
    pub fn new(left: f64, right: f64, bottom: f64, top: f64) -> Result<Self> {
        let rect = Self {
            left,
            right,
            bottom,
            top,
        };
        rect.validate()?;
        Ok(rect)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.left, self.right, self.bottom, self.top]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::DegenerateGeometry(format!(
                "non-finite projection edge in {self:?}"
            )));
        }
        if self.left >= self.right || self.bottom >= self.top {
            return Err(Error::DegenerateGeometry(format!(
                "projection collapsed: left {} right {} bottom {} top {}",
                self.left, self.right, self.bottom, self.top
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True if `other` lies inside `self` (edges may coincide).
    pub fn contains(&self, other: &ProjectionRect) -> bool {
        self.left <= other.left
            && self.right >= other.right
            && self.bottom <= other.bottom
            && self.top >= other.top
    }

    /// Snap all four edges onto the pixel grid.
    pub fn hinted(&self, pixel: PixelSize) -> ProjectionRect {
        ProjectionRect {
            left: hint_to_pixel(self.left, pixel.width),
            right: hint_to_pixel(self.right, pixel.width),
            bottom: hint_to_pixel(self.bottom, pixel.height),
            top: hint_to_pixel(self.top, pixel.height),
        }
    }

    /// Column-major orthographic matrix mapping the rect onto clip space.
    ///
    /// x and y land in [-1, 1]; z in [-1, 1] maps to wgpu's [0, 1] depth range.
    pub fn ortho_matrix(&self) -> [[f32; 4]; 4] {
        let (near, far) = (-1.0_f64, 1.0_f64);
        let rw = 1.0 / self.width();
        let rh = 1.0 / self.height();
        let rd = 1.0 / (near - far);
        [
            [(2.0 * rw) as f32, 0.0, 0.0, 0.0],
            [0.0, (2.0 * rh) as f32, 0.0, 0.0],
            [0.0, 0.0, rd as f32, 0.0],
            [
                (-(self.right + self.left) * rw) as f32,
                (-(self.top + self.bottom) * rh) as f32,
                (near * rd) as f32,
                1.0,
            ],
        ]
    }
}

// ──────────────────────────────────────────────
// Device and pixel sizes
// ──────────────────────────────────────────────

/// Drawable surface size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSize {
    pub width: u32,
    pub height: u32,
}

impl DeviceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Logical units covered by one device pixel along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    /// Derive the pixel size of `rect` shown on a surface of `device` pixels.
    pub fn derive(rect: &ProjectionRect, device: DeviceSize) -> Result<Self> {
        if device.width == 0 || device.height == 0 {
            return Err(Error::DegenerateGeometry(format!(
                "device surface has no area: {}x{}",
                device.width, device.height
            )));
        }
        rect.validate()?;
        Ok(Self {
            width: rect.width() / f64::from(device.width),
            height: rect.height() / f64::from(device.height),
        })
    }
}

// ──────────────────────────────────────────────
// Pixel hinting
// ──────────────────────────────────────────────

/// Snap `value` onto a pixel boundary of size `pixel_size`.
///
/// Rounds down to the boundary at or below `value`, except when the value sits
/// within 1% of a pixel under the next boundary, which absorbs float error from
/// arithmetic that should have landed exactly on it. The result never moves more
/// than one pixel and hinting an already hinted value returns it unchanged.
pub fn hint_to_pixel(value: f64, pixel_size: f64) -> f64 {
    let index = value / pixel_size;
    let mut whole = index.floor();
    if 1.0 - (index - whole) < HINT_EPSILON {
        whole += 1.0;
    }
    whole * pixel_size
}
