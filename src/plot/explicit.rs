use crate::evaluator::{Bindings, Expression};
use crate::GraphError;

use super::{CoordinateMapper, Pen, PlotSettings, RenderedCurve, Viewport};

/// Variable an explicit equation is solved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solved {
  /// `y = f(x)`
  ForY,
  /// `x = f(y)`
  ForX,
}

impl Solved {
  fn independent_name(self) -> &'static str {
    match self {
      Solved::ForY => "x",
      Solved::ForX => "y",
    }
  }
}

/// Sample `f` across the independent axis and trace it with pen-state
/// breaks.
///
/// A sample is drawn only if it evaluates to a finite value inside the
/// other axis's window. The pen lifts after an invalid sample and whenever
/// two consecutive valid samples jump by more than
/// `discontinuity_fraction` of the dependent range, so poles and jumps are
/// not bridged by near-vertical lines. Evaluation errors count as invalid
/// samples; only a curve where every sample errors is a failure.
pub fn plot_explicit(
  f: &Expression,
  solved: Solved,
  mapper: &CoordinateMapper,
  viewport: &Viewport,
  settings: &PlotSettings,
) -> Result<RenderedCurve, GraphError> {
  let ((lo, hi), (dep_lo, dep_hi)) = match solved {
    Solved::ForY => (
      (viewport.x_min, viewport.x_max),
      (viewport.y_min, viewport.y_max),
    ),
    Solved::ForX => (
      (viewport.y_min, viewport.y_max),
      (viewport.x_min, viewport.x_max),
    ),
  };
  let samples = settings.resolution.max(1);
  let step = (hi - lo) / samples as f64;
  let max_jump = (dep_hi - dep_lo) * settings.discontinuity_fraction;
  let var = solved.independent_name();

  let mut bindings = Bindings::new().with(var, lo);
  let mut pen = Pen::new();
  let mut previous: Option<f64> = None;
  let mut evaluated = 0usize;
  let mut last_error = None;

  for i in 0..=samples {
    let t = if i == samples { hi } else { lo + i as f64 * step };
    bindings.set(var, t);
    let value = match f.eval(&bindings) {
      Ok(v) => {
        evaluated += 1;
        Some(v)
      }
      Err(e) => {
        last_error = Some(e);
        None
      }
    };
    let value =
      value.filter(|v| v.is_finite() && (dep_lo..=dep_hi).contains(v));

    match value {
      Some(v) => {
        let point = match solved {
          Solved::ForY => mapper.to_pixel(t, v),
          Solved::ForX => mapper.to_pixel(v, t),
        };
        let jumped = previous.is_some_and(|p| (v - p).abs() > max_jump);
        if previous.is_none() || jumped {
          pen.move_to(point);
        } else {
          pen.line_to(point);
        }
        previous = Some(v);
      }
      None => {
        pen.lift();
        previous = None;
      }
    }
  }

  if evaluated == 0 {
    return Err(match last_error {
      Some(e) => GraphError::Eval(e),
      None => GraphError::NoOutput(format!("no samples of {}", f.source())),
    });
  }
  let curve = pen.finish();
  log::debug!(
    "explicit plot of {:?}: {} segments, {} points",
    f.source(),
    curve.segments.len(),
    curve.point_count()
  );
  Ok(curve)
}
