use plotters::style::RGBColor;

use crate::GraphError;

use super::canvas::{BACKGROUND, Stroke, Surface, TextAlign};
use super::viewport::{CoordinateMapper, Viewport};

const PLOT_AREA: RGBColor = BACKGROUND;
const MINOR_LINE: RGBColor = RGBColor(0xBF, 0xBF, 0xBF);
const MAJOR_LINE: RGBColor = RGBColor(0xA6, 0xA6, 0xA6);
const AXIS_LINE: RGBColor = RGBColor(0x00, 0x00, 0x00);
const LABEL: RGBColor = RGBColor(0x40, 0x40, 0x40);
const LABEL_SIZE: f64 = 12.0;
const TICK_LENGTH: f64 = 5.0;

// Guards against a degenerate step producing an unbounded loop.
const MAX_TICKS: usize = 10_000;

/// Major and minor gridline step for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSpacing {
  pub major: f64,
  pub minor: f64,
}

/// `(range upper bound, major, minor)`, checked top to bottom.
const TICK_TABLE: [(f64, f64, f64); 5] = [
  (2.0, 0.2, 0.1),
  (5.0, 1.0, 0.2),
  (20.0, 2.0, 0.5),
  (50.0, 10.0, 2.0),
  (100.0, 20.0, 5.0),
];

/// Pick gridline spacing for an axis spanning `range` units.
///
/// Ranges below 1 are looked up one decade at a time (0.5 uses the entry
/// for 5, scaled by 1/10); ranges above 100 get `ceil(range/10)` and
/// `ceil(range/50)`.
pub fn tick_spacing(range: f64) -> TickSpacing {
  if !(range.is_finite() && range > 0.0) {
    return TickSpacing {
      major: 1.0,
      minor: 0.2,
    };
  }
  let mut scaled = range;
  let mut factor = 1.0;
  while scaled < 1.0 {
    scaled *= 10.0;
    factor /= 10.0;
  }
  let (major, minor) = TICK_TABLE
    .iter()
    .find(|(limit, _, _)| scaled <= *limit)
    .map(|&(_, major, minor)| (major, minor))
    .unwrap_or(((scaled / 10.0).ceil(), (scaled / 50.0).ceil()));
  TickSpacing {
    major: major * factor,
    minor: minor * factor,
  }
}

/// Multiples of `step` inside `[min, max]`, with values within 1e-10 of
/// zero snapped to exactly zero.
pub fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
  if !(step.is_finite() && step > 0.0) || max < min {
    return Vec::new();
  }
  let eps = 1e-9;
  let first = (min / step - eps).ceil() as i64;
  let last = (max / step + eps).floor() as i64;
  (first..=last)
    .take(MAX_TICKS)
    .map(|k| {
      let v = k as f64 * step;
      if v.abs() < 1e-10 { 0.0 } else { v }
    })
    .collect()
}

/// Label text for a tick value.
pub fn format_label(v: f64) -> String {
  let v = if v.abs() < 1e-10 { 0.0 } else { v };
  let magnitude = v.abs();
  if v == 0.0 {
    "0".to_string()
  } else if magnitude > 1000.0 || magnitude < 0.01 {
    format!("{v:.1e}")
  } else if magnitude < 1.0 {
    format!("{v:.1}")
  } else if (v - v.round()).abs() < 1e-9 {
    format!("{}", v.round() as i64)
  } else {
    format!("{}", (v * 1e9).round() / 1e9)
  }
}

/// Where gridlines, axes and labels go, in math units.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
  pub x_spacing: TickSpacing,
  pub y_spacing: TickSpacing,
  pub minor_x: Vec<f64>,
  pub minor_y: Vec<f64>,
  pub major_x: Vec<f64>,
  pub major_y: Vec<f64>,
  /// The x-axis (y = 0) is inside the window.
  pub x_axis: bool,
  /// The y-axis (x = 0) is inside the window.
  pub y_axis: bool,
}

impl GridLayout {
  pub fn new(viewport: &Viewport) -> Self {
    let x_spacing = tick_spacing(viewport.x_range());
    let y_spacing = tick_spacing(viewport.y_range());
    Self {
      x_spacing,
      y_spacing,
      minor_x: tick_values(viewport.x_min, viewport.x_max, x_spacing.minor),
      minor_y: tick_values(viewport.y_min, viewport.y_max, y_spacing.minor),
      major_x: tick_values(viewport.x_min, viewport.x_max, x_spacing.major),
      major_y: tick_values(viewport.y_min, viewport.y_max, y_spacing.major),
      x_axis: viewport.y_min <= 0.0 && viewport.y_max >= 0.0,
      y_axis: viewport.x_min <= 0.0 && viewport.x_max >= 0.0,
    }
  }
}

/// Paint the plot area, minor lines, major lines, axes, then tick marks
/// and labels.
///
/// Label text depends on a font being available to the raster backend;
/// if drawing text fails the labels are skipped with a warning and the
/// rest of the grid is kept.
pub fn draw_grid(
  surface: &mut impl Surface,
  mapper: &CoordinateMapper,
  viewport: &Viewport,
) -> Result<(), GraphError> {
  let layout = GridLayout::new(viewport);
  let (left, top, right, bottom) = mapper.plot_rect(viewport);
  surface.fill_rect((left, top), (right, bottom), PLOT_AREA)?;

  let passes = [
    (&layout.minor_x, &layout.minor_y, Stroke::new(MINOR_LINE, 1)),
    (&layout.major_x, &layout.major_y, Stroke::new(MAJOR_LINE, 1)),
  ];
  for (xs, ys, stroke) in passes {
    for &x in xs {
      let px = mapper.x_to_pixel(x);
      surface.stroke_path(&[(px, top), (px, bottom)], stroke)?;
    }
    for &y in ys {
      let py = mapper.y_to_pixel(y);
      surface.stroke_path(&[(left, py), (right, py)], stroke)?;
    }
  }

  let axis = Stroke::new(AXIS_LINE, 2);
  if layout.x_axis {
    let py = mapper.y_to_pixel(0.0);
    surface.stroke_path(&[(left, py), (right, py)], axis)?;
  }
  if layout.y_axis {
    let px = mapper.x_to_pixel(0.0);
    surface.stroke_path(&[(px, top), (px, bottom)], axis)?;
  }

  let tick = Stroke::new(AXIS_LINE, 1);
  let mut labels_ok = true;
  for &x in &layout.major_x {
    let px = mapper.x_to_pixel(x);
    surface.stroke_path(&[(px, bottom), (px, bottom + TICK_LENGTH)], tick)?;
    if labels_ok {
      labels_ok = draw_label(
        surface,
        &format_label(x),
        (px, bottom + 20.0),
        TextAlign::Center,
      );
    }
  }
  for &y in &layout.major_y {
    let py = mapper.y_to_pixel(y);
    surface.stroke_path(&[(left - TICK_LENGTH, py), (left, py)], tick)?;
    if labels_ok {
      labels_ok = draw_label(
        surface,
        &format_label(y),
        (left - 10.0, py),
        TextAlign::Right,
      );
    }
  }
  Ok(())
}

fn draw_label(
  surface: &mut impl Surface,
  text: &str,
  at: (f64, f64),
  align: TextAlign,
) -> bool {
  match surface.text(text, at, align, LABEL_SIZE, LABEL) {
    Ok(()) => true,
    Err(e) => {
      log::warn!("skipping axis labels: {e}");
      false
    }
  }
}
