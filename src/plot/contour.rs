//! Marching-squares tracing of `f(x, y) = 0` for equations no other
//! plotter recognises.

use crate::evaluator::{Bindings, Expression};
use crate::{EvalError, GraphError};

use super::{
  CoordinateMapper, Pen, PlotSettings, Point, RenderedCurve, Viewport,
};

/// Unit-square corner positions, clockwise from the top-left, y down.
const CORNERS: [Point; 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// Vertex samples on a `(cols + 1) x (rows + 1)` lattice, row-major from
/// the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
  cols: usize,
  rows: usize,
  values: Vec<f64>,
}

impl ScalarGrid {
  pub fn from_fn(
    cols: usize,
    rows: usize,
    mut f: impl FnMut(usize, usize) -> f64,
  ) -> Self {
    let mut values = Vec::with_capacity((cols + 1) * (rows + 1));
    for row in 0..=rows {
      for col in 0..=cols {
        values.push(f(col, row));
      }
    }
    Self { cols, rows, values }
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn value(&self, col: usize, row: usize) -> f64 {
    self.values[row * (self.cols + 1) + col]
  }

  /// Corner values of a cell, clockwise from the top-left.
  pub fn corners(&self, col: usize, row: usize) -> [f64; 4] {
    [
      self.value(col, row),
      self.value(col + 1, row),
      self.value(col + 1, row + 1),
      self.value(col, row + 1),
    ]
  }
}

/// Fraction along an edge where the zero lies, if the edge changes sign.
/// Non-finite endpoints never produce a crossing.
fn crossing(v1: f64, v2: f64) -> Option<f64> {
  if !(v1.is_finite() && v2.is_finite()) || (v1 > 0.0) == (v2 > 0.0) {
    return None;
  }
  let total = v1.abs() + v2.abs();
  Some(if total == 0.0 { 0.5 } else { v1.abs() / total })
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
  (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

/// Zero-crossings of one cell, in unit-cell coordinates.
///
/// Edges are visited clockwise, starting with the edge that leaves a
/// positive corner: the top edge when the top-left corner is positive,
/// otherwise the right edge. Crossings are numbered 0..4 in that order.
/// Two crossings make one segment. Four crossings (a saddle) are paired
/// by the sign of the cell centre: positive pairs {0,1} and {2,3}, which
/// keeps the positive corners connected; otherwise {0,3} and {1,2}. The
/// centre is only evaluated for saddles.
pub fn cell_segments(
  corners: [f64; 4],
  center: impl FnOnce() -> f64,
) -> Vec<(Point, Point)> {
  let start = if corners[0] > 0.0 { 0 } else { 1 };
  let found: Vec<Point> = (0..4)
    .map(|n| (start + n) % 4)
    .filter_map(|a| {
      let b = (a + 1) % 4;
      crossing(corners[a], corners[b]).map(|t| lerp(CORNERS[a], CORNERS[b], t))
    })
    .collect();

  match found[..] {
    [p, q] => vec![(p, q)],
    [p0, p1, p2, p3] => {
      if center() > 0.0 {
        vec![(p0, p1), (p2, p3)]
      } else {
        vec![(p0, p3), (p1, p2)]
      }
    }
    _ => Vec::new(),
  }
}

/// Run marching squares over a grid, emitting segments in grid units
/// (`col + u`, `row + v`). `center` is asked for a cell's centre value
/// only when the cell is a saddle.
pub fn march(
  grid: &ScalarGrid,
  mut center: impl FnMut(usize, usize) -> f64,
  mut emit: impl FnMut(Point, Point),
) {
  for row in 0..grid.rows {
    for col in 0..grid.cols {
      let offset = |p: Point| (col as f64 + p.0, row as f64 + p.1);
      for (a, b) in cell_segments(grid.corners(col, row), || center(col, row))
      {
        emit(offset(a), offset(b));
      }
    }
  }
}

/// Evaluates `f` at pixel positions, mapping failures and NaN to `+inf`
/// so they never produce a sign change.
struct Sampler<'a> {
  f: &'a Expression,
  mapper: &'a CoordinateMapper,
  bindings: Bindings,
  evaluated: usize,
  last_error: Option<EvalError>,
}

impl Sampler<'_> {
  fn sample(&mut self, px: f64, py: f64) -> f64 {
    let (x, y) = self.mapper.to_math(px, py);
    self.bindings.set("x", x);
    self.bindings.set("y", y);
    match self.f.eval(&self.bindings) {
      Ok(v) => {
        self.evaluated += 1;
        if v.is_nan() { f64::INFINITY } else { v }
      }
      Err(e) => {
        self.last_error = Some(e);
        f64::INFINITY
      }
    }
  }
}

/// Grid dimensions: the long side of the plot area gets
/// `settings.contour_cells()` cells, the short side proportionally fewer.
pub fn grid_size(
  width: f64,
  height: f64,
  settings: &PlotSettings,
) -> (usize, usize) {
  let long = settings.contour_cells();
  let short = |ratio: f64| ((long as f64 * ratio).round() as usize).max(1);
  if width >= height {
    (long, short(height / width))
  } else {
    (short(width / height), long)
  }
}

/// Trace `f(x, y) = 0` where `f` is the equation in zero form.
pub fn plot_implicit(
  f: &Expression,
  mapper: &CoordinateMapper,
  viewport: &Viewport,
  settings: &PlotSettings,
) -> Result<RenderedCurve, GraphError> {
  let (left, top, right, bottom) = mapper.plot_rect(viewport);
  let (cols, rows) = grid_size(right - left, bottom - top, settings);
  let cell_w = (right - left) / cols as f64;
  let cell_h = (bottom - top) / rows as f64;
  let to_pixel = |p: Point| (left + p.0 * cell_w, top + p.1 * cell_h);

  let mut sampler = Sampler {
    f,
    mapper,
    bindings: Bindings::new().with("x", 0.0).with("y", 0.0),
    evaluated: 0,
    last_error: None,
  };
  let grid = ScalarGrid::from_fn(cols, rows, |col, row| {
    sampler.sample(left + col as f64 * cell_w, top + row as f64 * cell_h)
  });

  let mut pen = Pen::new();
  march(
    &grid,
    |col, row| {
      sampler.sample(
        left + (col as f64 + 0.5) * cell_w,
        top + (row as f64 + 0.5) * cell_h,
      )
    },
    |a, b| pen.segment(to_pixel(a), to_pixel(b)),
  );

  if sampler.evaluated == 0 {
    return Err(match sampler.last_error {
      Some(e) => GraphError::Eval(e),
      None => GraphError::NoOutput(format!("no samples of {}", f.source())),
    });
  }
  let curve = pen.finish();
  log::debug!(
    "contoured {:?} on a {cols}x{rows} grid: {} segments",
    f.source(),
    curve.segments.len()
  );
  Ok(curve)
}
