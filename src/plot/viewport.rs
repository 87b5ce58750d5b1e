use crate::GraphError;

use super::Point;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_PADDING: u32 = 40;
/// Largest canvas side accepted.
pub const MAX_DIMENSION: u32 = 4096;

/// Requested math window and the pixel canvas it is drawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
  pub x_min: f64,
  pub x_max: f64,
  pub y_min: f64,
  pub y_max: f64,
  pub pixel_width: u32,
  pub pixel_height: u32,
  pub padding: u32,
}

impl Viewport {
  pub fn new(
    (x_min, x_max): (f64, f64),
    (y_min, y_max): (f64, f64),
    (pixel_width, pixel_height): (u32, u32),
    padding: u32,
  ) -> Result<Self, GraphError> {
    let bounds = [x_min, x_max, y_min, y_max];
    if bounds.iter().any(|v| !v.is_finite()) {
      return Err(GraphError::InvalidViewport(format!(
        "bounds must be finite, got x [{x_min}, {x_max}], \
         y [{y_min}, {y_max}]"
      )));
    }
    if x_max <= x_min {
      return Err(GraphError::InvalidViewport(format!(
        "xmax ({x_max}) must be greater than xmin ({x_min})"
      )));
    }
    if y_max <= y_min {
      return Err(GraphError::InvalidViewport(format!(
        "ymax ({y_max}) must be greater than ymin ({y_min})"
      )));
    }
    if pixel_width.max(pixel_height) > MAX_DIMENSION {
      return Err(GraphError::InvalidViewport(format!(
        "{pixel_width}x{pixel_height} canvas is over {MAX_DIMENSION} px a side"
      )));
    }
    if padding.saturating_mul(2) >= pixel_width.min(pixel_height) {
      return Err(GraphError::InvalidViewport(format!(
        "padding {padding} leaves no room on {pixel_width}x{pixel_height}"
      )));
    }
    Ok(Self {
      x_min,
      x_max,
      y_min,
      y_max,
      pixel_width,
      pixel_height,
      padding,
    })
  }

  pub fn x_range(&self) -> f64 {
    self.x_max - self.x_min
  }

  pub fn y_range(&self) -> f64 {
    self.y_max - self.y_min
  }

  pub fn contains(&self, x: f64, y: f64) -> bool {
    (self.x_min..=self.x_max).contains(&x)
      && (self.y_min..=self.y_max).contains(&y)
  }

  fn plot_width(&self) -> f64 {
    (self.pixel_width - 2 * self.padding) as f64
  }

  fn plot_height(&self) -> f64 {
    (self.pixel_height - 2 * self.padding) as f64
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingMode {
  /// Each axis scaled on its own; the window fills the padded canvas.
  Independent,
  /// One scale for both axes, the shorter side centred.
  AspectCorrected,
}

/// Affine map between math coordinates and pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
  x_min: f64,
  y_min: f64,
  x_scale: f64,
  y_scale: f64,
  left: f64,
  bottom: f64,
}

impl CoordinateMapper {
  pub fn new(viewport: &Viewport, mode: MappingMode) -> Self {
    let pad = viewport.padding as f64;
    let x_scale = viewport.plot_width() / viewport.x_range();
    let y_scale = viewport.plot_height() / viewport.y_range();
    let (x_scale, y_scale, x_offset, y_offset) = match mode {
      MappingMode::Independent => (x_scale, y_scale, 0.0, 0.0),
      MappingMode::AspectCorrected => {
        let scale = x_scale.min(y_scale);
        (
          scale,
          scale,
          (viewport.plot_width() - viewport.x_range() * scale) / 2.0,
          (viewport.plot_height() - viewport.y_range() * scale) / 2.0,
        )
      }
    };
    Self {
      x_min: viewport.x_min,
      y_min: viewport.y_min,
      x_scale,
      y_scale,
      left: pad + x_offset,
      bottom: viewport.pixel_height as f64 - pad - y_offset,
    }
  }

  pub fn independent(viewport: &Viewport) -> Self {
    Self::new(viewport, MappingMode::Independent)
  }

  pub fn aspect_corrected(viewport: &Viewport) -> Self {
    Self::new(viewport, MappingMode::AspectCorrected)
  }

  pub fn x_to_pixel(&self, x: f64) -> f64 {
    self.left + (x - self.x_min) * self.x_scale
  }

  pub fn y_to_pixel(&self, y: f64) -> f64 {
    self.bottom - (y - self.y_min) * self.y_scale
  }

  pub fn to_pixel(&self, x: f64, y: f64) -> Point {
    (self.x_to_pixel(x), self.y_to_pixel(y))
  }

  pub fn to_math(&self, px: f64, py: f64) -> (f64, f64) {
    (
      self.x_min + (px - self.left) / self.x_scale,
      self.y_min + (self.bottom - py) / self.y_scale,
    )
  }

  /// Pixel rectangle `(left, top, right, bottom)` covered by the math
  /// window.
  pub fn plot_rect(&self, viewport: &Viewport) -> (f64, f64, f64, f64) {
    let (left, top) = self.to_pixel(viewport.x_min, viewport.y_max);
    let (right, bottom) = self.to_pixel(viewport.x_max, viewport.y_min);
    (left, top, right, bottom)
  }
}
