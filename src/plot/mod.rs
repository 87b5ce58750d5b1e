//! Coordinate mapping, grid layout, the raster surface and the curve
//! plotters.

pub mod canvas;
pub mod conic;
pub mod contour;
pub mod explicit;
pub mod grid;
pub mod viewport;

pub use canvas::{Canvas, Stroke, Surface, TextAlign, parse_hex_color};
pub use viewport::{CoordinateMapper, MappingMode, Viewport};

use crate::GraphError;

/// Pixel-space point.
pub type Point = (f64, f64);

pub const MIN_RESOLUTION: usize = 100;
pub const MAX_RESOLUTION: usize = 1000;
pub const DEFAULT_RESOLUTION: usize = 500;

/// Tunable sampling constants shared by the plotters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSettings {
  /// Samples across the independent axis for explicit plots.
  pub resolution: usize,
  /// A jump larger than this fraction of the dependent axis range between
  /// consecutive samples starts a new path segment.
  pub discontinuity_fraction: f64,
  /// Parameter increment for the conic sweeps.
  pub parametric_step: f64,
  /// Smallest half-range of the hyperbolic parameter.
  pub hyperbola_span: f64,
  /// Bounds on the contour grid's long side, in cells.
  pub min_contour_cells: usize,
  pub max_contour_cells: usize,
}

impl Default for PlotSettings {
  fn default() -> Self {
    Self {
      resolution: DEFAULT_RESOLUTION,
      discontinuity_fraction: 0.1,
      parametric_step: 0.01,
      hyperbola_span: 3.0,
      min_contour_cells: 50,
      max_contour_cells: 400,
    }
  }
}

impl PlotSettings {
  /// Defaults with `resolution` clamped into the supported range.
  pub fn with_resolution(resolution: usize) -> Self {
    let clamped = resolution.clamp(MIN_RESOLUTION, MAX_RESOLUTION);
    if clamped != resolution {
      log::warn!("resolution {resolution} clamped to {clamped}");
    }
    Self {
      resolution: clamped,
      ..Self::default()
    }
  }

  /// Contour cells along the longer side of the plot area.
  pub fn contour_cells(&self) -> usize {
    (self.resolution / 2).clamp(self.min_contour_cells, self.max_contour_cells)
  }
}

/// Pixel-space polylines produced by a plotter, consumed once by the
/// rasterizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedCurve {
  pub segments: Vec<Vec<Point>>,
}

impl RenderedCurve {
  pub fn is_empty(&self) -> bool {
    self.segments.is_empty()
  }

  pub fn point_count(&self) -> usize {
    self.segments.iter().map(Vec::len).sum()
  }

  pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
    self.segments.iter().flatten().copied()
  }
}

/// Move-to / line-to path builder. A segment is only kept once it has at
/// least two points.
#[derive(Debug, Default)]
pub struct Pen {
  segments: Vec<Vec<Point>>,
  current: Vec<Point>,
}

impl Pen {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start a new segment at `p`.
  pub fn move_to(&mut self, p: Point) {
    self.lift();
    self.current.push(p);
  }

  /// Extend the current segment; starts one if the pen is up.
  pub fn line_to(&mut self, p: Point) {
    self.current.push(p);
  }

  /// End the current segment without starting another.
  pub fn lift(&mut self) {
    if self.current.len() > 1 {
      self.segments.push(std::mem::take(&mut self.current));
    } else {
      self.current.clear();
    }
  }

  /// Add a free-standing two-point segment.
  pub fn segment(&mut self, a: Point, b: Point) {
    self.lift();
    self.segments.push(vec![a, b]);
  }

  pub fn finish(mut self) -> RenderedCurve {
    self.lift();
    RenderedCurve {
      segments: self.segments,
    }
  }
}

/// Stroke every segment of `curve`, capping both ends with a dot so that
/// chains of short contour segments join without notches.
pub fn draw_curve(
  surface: &mut impl Surface,
  curve: &RenderedCurve,
  stroke: Stroke,
) -> Result<(), GraphError> {
  let cap = stroke.width as f64 / 2.0;
  for segment in &curve.segments {
    surface.stroke_path(segment, stroke)?;
    if let (Some(&first), Some(&last)) = (segment.first(), segment.last()) {
      surface.fill_circle(first, cap, stroke.color)?;
      surface.fill_circle(last, cap, stroke.color)?;
    }
  }
  Ok(())
}
