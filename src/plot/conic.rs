use std::f64::consts::TAU;

use crate::equation::ShapeParams;

use super::{CoordinateMapper, Pen, PlotSettings, RenderedCurve, Viewport};

// Upper bound on the hyperbolic parameter; cosh(20) is ~2.4e8.
const MAX_HYPERBOLA_SPAN: f64 = 20.0;

/// Trace a conic parametrically. Points outside the window lift the pen,
/// so a partly visible curve is drawn as separate arcs rather than joined
/// across the gap.
pub fn plot_conic(
  params: &ShapeParams,
  mapper: &CoordinateMapper,
  viewport: &Viewport,
  settings: &PlotSettings,
) -> RenderedCurve {
  let mut pen = Pen::new();
  let step = settings.parametric_step;
  match *params {
    ShapeParams::Circle { h, k, r } => {
      sweep(&mut pen, 0.0, TAU, step, mapper, viewport, |t| {
        (h + r * t.cos(), k + r * t.sin())
      });
    }
    ShapeParams::Ellipse {
      h,
      k,
      a,
      b,
      horizontal,
    } => {
      let (rx, ry) = if horizontal { (a, b) } else { (b, a) };
      sweep(&mut pen, 0.0, TAU, step, mapper, viewport, |t| {
        (h + rx * t.cos(), k + ry * t.sin())
      });
    }
    ShapeParams::Hyperbola {
      h,
      k,
      a,
      b,
      horizontal,
    } => {
      let span = hyperbola_span(params, viewport, settings);
      for branch in [1.0, -1.0] {
        sweep(&mut pen, -span, span, step, mapper, viewport, |t| {
          if horizontal {
            (h + branch * a * t.cosh(), k + b * t.sinh())
          } else {
            (h + b * t.sinh(), k + branch * a * t.cosh())
          }
        });
        pen.lift();
      }
    }
  }
  pen.finish()
}

/// Half-range of `t` needed for the branches to leave the window, never
/// less than `settings.hyperbola_span`.
fn hyperbola_span(
  params: &ShapeParams,
  viewport: &Viewport,
  settings: &PlotSettings,
) -> f64 {
  let ShapeParams::Hyperbola {
    h,
    k,
    a,
    b,
    horizontal,
  } = *params
  else {
    return settings.hyperbola_span;
  };
  let reach = |lo: f64, hi: f64, c: f64| (lo - c).abs().max((hi - c).abs());
  let (along, across) = if horizontal {
    (
      reach(viewport.x_min, viewport.x_max, h),
      reach(viewport.y_min, viewport.y_max, k),
    )
  } else {
    (
      reach(viewport.y_min, viewport.y_max, k),
      reach(viewport.x_min, viewport.x_max, h),
    )
  };
  let needed = (along / a).max(1.0).acosh().max((across / b).asinh());
  needed
    .max(settings.hyperbola_span)
    .min(MAX_HYPERBOLA_SPAN)
}

fn sweep(
  pen: &mut Pen,
  from: f64,
  to: f64,
  step: f64,
  mapper: &CoordinateMapper,
  viewport: &Viewport,
  at: impl Fn(f64) -> (f64, f64),
) {
  let steps = ((to - from) / step).ceil().max(1.0) as usize;
  for i in 0..=steps {
    let t = if i == steps { to } else { from + i as f64 * step };
    let (x, y) = at(t);
    if x.is_finite() && y.is_finite() && viewport.contains(x, y) {
      pen.line_to(mapper.to_pixel(x, y));
    } else {
      pen.lift();
    }
  }
}
