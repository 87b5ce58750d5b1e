//! Equation classification and plotting engine.
//!
//! Raw equation text is normalized, classified into one of a handful of
//! algebraic forms, mined for conic parameters, and drawn onto an RGB
//! canvas with a sampling strategy suited to its form.

use std::f64::consts::TAU;

use plotters::style::RGBColor;
use thiserror::Error;

pub mod equation;
pub mod evaluator;
pub mod plot;
pub mod syntax;

pub use syntax::Rule;

use equation::{EquationForm, Extraction, NormalizedEquation, ShapeParams};
use evaluator::{Expression, Function};
use plot::canvas::BACKGROUND;
use plot::explicit::Solved;
use plot::viewport::{DEFAULT_HEIGHT, DEFAULT_PADDING, DEFAULT_WIDTH};
use plot::{
  Canvas, CoordinateMapper, PlotSettings, RenderedCurve, Stroke, Viewport,
};

#[derive(Error, Debug)]
pub enum EvalError {
  #[error("Parse error: {0}")]
  Parse(#[from] Box<pest::error::Error<Rule>>),
  #[error("Empty input")]
  EmptyInput,
  #[error("Syntax error: {0}")]
  Syntax(String),
  #[error("Unknown function: {0}")]
  UnknownFunction(String),
  #[error("{name} expects {expected} argument(s), got {got}")]
  Arity {
    name: &'static str,
    expected: String,
    got: usize,
  },
  #[error("Undefined symbol: {0}")]
  UndefinedSymbol(String),
}

#[derive(Error, Debug)]
pub enum GraphError {
  #[error(transparent)]
  Eval(#[from] EvalError),
  #[error("Invalid viewport: {0}")]
  InvalidViewport(String),
  #[error("Nothing to draw: {0}")]
  NoOutput(String),
  #[error("Unsupported equation: {0}")]
  Equation(String),
  #[error("Drawing failed: {0}")]
  Drawing(String),
  #[error("PNG encoding failed: {0}")]
  Encode(#[from] image::ImageError),
}

pub const DEFAULT_COLOR: &str = "#C2185B";
const DEFAULT_RGB: RGBColor = RGBColor(0xC2, 0x18, 0x5B);
const CURVE_WIDTH: u32 = 3;

/// Which family of graph was asked for. Only the default window depends
/// on it; the form is always classified from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphKind {
  Polynomial,
  Conic,
  Trig,
  #[default]
  Auto,
}

impl GraphKind {
  /// `Auto` resolved against the equation text.
  pub fn resolve(self, equation: &str) -> GraphKind {
    match self {
      GraphKind::Auto if mentions_trig(equation) => GraphKind::Trig,
      GraphKind::Auto => GraphKind::Polynomial,
      other => other,
    }
  }

  /// Default `(x range, y range)` for this kind.
  pub fn default_window(self) -> ((f64, f64), (f64, f64)) {
    match self {
      GraphKind::Trig => ((-TAU, TAU), (-5.0, 5.0)),
      _ => ((-10.0, 10.0), (-10.0, 10.0)),
    }
  }
}

fn mentions_trig(text: &str) -> bool {
  equation::normalize(text)
    .as_str()
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter_map(Function::lookup)
    .any(Function::is_trigonometric)
}

/// Everything needed to draw one graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRequest {
  pub equation: String,
  pub kind: GraphKind,
  pub x_min: Option<f64>,
  pub x_max: Option<f64>,
  pub y_min: Option<f64>,
  pub y_max: Option<f64>,
  /// `#RRGGBB`, `#RGB` or a palette name.
  pub color: String,
  pub resolution: usize,
  pub width: u32,
  pub height: u32,
  pub padding: u32,
}

impl Default for GraphRequest {
  fn default() -> Self {
    Self {
      equation: String::new(),
      kind: GraphKind::Auto,
      x_min: None,
      x_max: None,
      y_min: None,
      y_max: None,
      color: DEFAULT_COLOR.to_string(),
      resolution: plot::DEFAULT_RESOLUTION,
      width: DEFAULT_WIDTH,
      height: DEFAULT_HEIGHT,
      padding: DEFAULT_PADDING,
    }
  }
}

impl GraphRequest {
  pub fn new(equation: impl Into<String>) -> Self {
    Self {
      equation: equation.into(),
      ..Self::default()
    }
  }

  /// Requested window with unset bounds filled from the kind's default.
  pub fn window(&self) -> ((f64, f64), (f64, f64)) {
    let ((x_lo, x_hi), (y_lo, y_hi)) =
      self.kind.resolve(&self.equation).default_window();
    (
      (self.x_min.unwrap_or(x_lo), self.x_max.unwrap_or(x_hi)),
      (self.y_min.unwrap_or(y_lo), self.y_max.unwrap_or(y_hi)),
    )
  }

  pub fn viewport(&self) -> Result<Viewport, GraphError> {
    let (x, y) = self.window();
    Viewport::new(x, y, (self.width, self.height), self.padding)
  }

  fn curve_color(&self) -> RGBColor {
    plot::parse_hex_color(&self.color).unwrap_or_else(|| {
      log::warn!("unrecognised colour {:?}, using {DEFAULT_COLOR}", self.color);
      DEFAULT_RGB
    })
  }
}

/// A finished render and what was learned about the equation on the way.
#[derive(Debug, Clone)]
pub struct GraphOutput {
  pub canvas: Canvas,
  pub equation: String,
  pub normalized: NormalizedEquation,
  pub form: EquationForm,
  pub params: Option<ShapeParams>,
  pub used_default: bool,
  pub viewport: Viewport,
}

impl GraphOutput {
  pub fn to_png(&self) -> Result<Vec<u8>, GraphError> {
    self.canvas.to_png()
  }
}

/// Normalize, classify and draw `request.equation`. A leading `Y =` is
/// accepted for `y =`.
pub fn render_graph(request: &GraphRequest) -> Result<GraphOutput, GraphError> {
  let viewport = request.viewport()?;
  let settings = PlotSettings::with_resolution(request.resolution);
  let normalized = equation::normalize_explicit(&request.equation);
  let form = equation::classify(&normalized);
  let extraction = equation::extract(&normalized, form);
  log::debug!(
    "rendering {:?} as {form} over x [{}, {}], y [{}, {}]",
    normalized.as_str(),
    viewport.x_min,
    viewport.x_max,
    viewport.y_min,
    viewport.y_max
  );

  let mapper = match form {
    EquationForm::ExplicitY | EquationForm::ExplicitX => {
      CoordinateMapper::independent(&viewport)
    }
    _ => CoordinateMapper::aspect_corrected(&viewport),
  };
  let curve =
    trace(&normalized, form, extraction, &mapper, &viewport, &settings)?;

  let mut canvas =
    Canvas::new(viewport.pixel_width, viewport.pixel_height, BACKGROUND);
  plot::grid::draw_grid(&mut canvas, &mapper, &viewport)?;
  let stroke = Stroke::new(request.curve_color(), CURVE_WIDTH);
  plot::draw_curve(&mut canvas, &curve, stroke)?;

  Ok(GraphOutput {
    canvas,
    equation: request.equation.clone(),
    normalized,
    form,
    params: extraction.map(|e| e.params),
    used_default: extraction.is_some_and(|e| e.used_default),
    viewport,
  })
}

/// Run the plotter that matches `form`.
fn trace(
  normalized: &NormalizedEquation,
  form: EquationForm,
  extraction: Option<Extraction>,
  mapper: &CoordinateMapper,
  viewport: &Viewport,
  settings: &PlotSettings,
) -> Result<RenderedCurve, GraphError> {
  match (form, extraction) {
    (EquationForm::ExplicitY, _) | (EquationForm::ExplicitX, _) => {
      let (lhs, rhs) = normalized.sides();
      let source = rhs.unwrap_or(lhs);
      let solved = if form == EquationForm::ExplicitY {
        Solved::ForY
      } else {
        Solved::ForX
      };
      let f = Expression::parse(source)?;
      plot::explicit::plot_explicit(&f, solved, mapper, viewport, settings)
    }
    (_, Some(extraction)) => Ok(plot::conic::plot_conic(
      &extraction.params,
      mapper,
      viewport,
      settings,
    )),
    _ => {
      let zero = normalized.zero_form().ok_or_else(|| {
        GraphError::Equation(format!(
          "{:?} is not a single relation",
          normalized.as_str()
        ))
      })?;
      let f = Expression::parse(&zero)?;
      plot::contour::plot_implicit(&f, mapper, viewport, settings)
    }
  }
}
