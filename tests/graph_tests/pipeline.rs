use super::*;

use mathplot::plot::canvas::BACKGROUND;
use mathplot::plot::{Canvas, parse_hex_color};

fn has_color_near(canvas: &Canvas, (px, py): (f64, f64), color: &str) -> bool {
  let want = parse_hex_color(color).unwrap();
  let (cx, cy) = (px.round() as i64, py.round() as i64);
  (-2..=2).any(|dx| {
    (-2..=2).any(|dy| {
      let (x, y) = (cx + dx, cy + dy);
      x >= 0 && y >= 0 && canvas.pixel(x as u32, y as u32) == Some(want)
    })
  })
}

#[test]
fn parabola_end_to_end() {
  let out = render_graph(&GraphRequest::new("y = x^2")).unwrap();
  assert_eq!(out.form, EquationForm::ExplicitY);
  assert_eq!(out.normalized.as_str(), "y=x**2");
  assert_eq!(out.params, None);
  assert_eq!((out.canvas.width(), out.canvas.height()), (800, 600));

  let m = CoordinateMapper::independent(&out.viewport);
  for x in [-3.0, -1.0, 0.0, 1.0, 2.0] {
    assert!(
      has_color_near(&out.canvas, m.to_pixel(x, x * x), "#C2185B"),
      "no curve at x = {x}"
    );
  }
  assert_eq!(out.canvas.pixel(2, 2), Some(BACKGROUND));
  assert!(!has_color_near(&out.canvas, m.to_pixel(5.0, -5.0), "#C2185B"));
}

#[test]
fn uppercase_y_prefix_is_explicit() {
  for kind in [GraphKind::Polynomial, GraphKind::Auto] {
    let request = GraphRequest {
      kind,
      ..GraphRequest::new("Y = x^2")
    };
    let out = render_graph(&request).unwrap();
    assert_eq!(out.form, EquationForm::ExplicitY);
    assert_eq!(out.normalized.as_str(), "y=x**2");
    let m = CoordinateMapper::independent(&out.viewport);
    assert!(has_color_near(&out.canvas, m.to_pixel(2.0, 4.0), "#C2185B"));
  }
}

#[test]
fn png_bytes() {
  let out = render_graph(&GraphRequest::new("y = 2x + 1")).unwrap();
  let png = out.to_png().unwrap();
  assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn circle_uses_aspect_correction() {
  let request = GraphRequest {
    color: "blue".into(),
    ..GraphRequest::new("(x-1)^2 + (y+2)^2 = 9")
  };
  let out = render_graph(&request).unwrap();
  assert_eq!(out.form, EquationForm::Circle);
  assert_eq!(
    out.params,
    Some(ShapeParams::Circle {
      h: 1.0,
      k: -2.0,
      r: 3.0
    })
  );
  assert!(!out.used_default);
  let m = CoordinateMapper::aspect_corrected(&out.viewport);
  for (x, y) in [(4.0, -2.0), (-2.0, -2.0), (1.0, 1.0), (1.0, -5.0)] {
    assert!(has_color_near(&out.canvas, m.to_pixel(x, y), "blue"));
  }
}

#[test]
fn hyperbola_and_implicit_render() {
  let out = render_graph(&GraphRequest::new("x^2/9 - y^2/16 = 1")).unwrap();
  assert_eq!(out.form, EquationForm::Hyperbola);
  let m = CoordinateMapper::aspect_corrected(&out.viewport);
  assert!(has_color_near(&out.canvas, m.to_pixel(3.0, 0.0), "#C2185B"));
  assert!(has_color_near(&out.canvas, m.to_pixel(-3.0, 0.0), "#C2185B"));

  let out = render_graph(&GraphRequest::new("x^2 = y^3")).unwrap();
  assert_eq!(out.form, EquationForm::Implicit);
  let m = CoordinateMapper::aspect_corrected(&out.viewport);
  assert!(has_color_near(&out.canvas, m.to_pixel(8.0, 4.0), "#C2185B"));
}

#[test]
fn defaults_are_reported() {
  let out = render_graph(&GraphRequest::new("x^2/0 + y^2/4 = 1")).unwrap();
  assert_eq!(out.form, EquationForm::Ellipse);
  assert!(out.used_default);
}

#[test]
fn degenerate_circle_draws_the_default() {
  let out = render_graph(&GraphRequest::new("x^2 + y^2 = 0")).unwrap();
  assert_eq!(out.form, EquationForm::Circle);
  assert_eq!(
    out.params,
    Some(ShapeParams::Circle {
      h: 0.0,
      k: 0.0,
      r: 1.0
    })
  );
  assert!(out.used_default);
  let m = CoordinateMapper::aspect_corrected(&out.viewport);
  assert!(has_color_near(&out.canvas, m.to_pixel(1.0, 0.0), "#C2185B"));
}

#[test]
fn kind_selects_the_window() {
  let out = render_graph(&GraphRequest::new("y = sin(x)")).unwrap();
  assert_eq!(out.viewport.x_max, std::f64::consts::TAU);
  assert_eq!(out.viewport.y_max, 5.0);

  let request = GraphRequest {
    kind: GraphKind::Polynomial,
    ..GraphRequest::new("y = sin(x)")
  };
  let out = render_graph(&request).unwrap();
  assert_eq!(out.viewport.x_max, 10.0);
}

#[test]
fn unparsable_colour_falls_back() {
  let request = GraphRequest {
    color: "not a colour".into(),
    ..GraphRequest::new("y = x")
  };
  let out = render_graph(&request).unwrap();
  let m = CoordinateMapper::independent(&out.viewport);
  assert!(has_color_near(&out.canvas, m.to_pixel(3.0, 3.0), "#C2185B"));
}

#[test]
fn resolution_is_clamped_not_rejected() {
  let request = GraphRequest {
    resolution: 5,
    ..GraphRequest::new("y = x^3")
  };
  assert!(render_graph(&request).is_ok());
}

mod failures {
  use super::*;

  #[test]
  fn malformed_expression() {
    let err = render_graph(&GraphRequest::new("y = sin(")).unwrap_err();
    assert!(matches!(err, GraphError::Eval(_)));
  }

  #[test]
  fn undefined_symbol() {
    let err = render_graph(&GraphRequest::new("y = z + 1")).unwrap_err();
    assert!(matches!(err, GraphError::Eval(_)));
  }

  #[test]
  fn empty_side() {
    let err = render_graph(&GraphRequest::new("x^2 + y^2 =")).unwrap_err();
    assert!(matches!(err, GraphError::Equation(_)));
  }

  #[test]
  fn inverted_window() {
    let request = GraphRequest {
      x_min: Some(5.0),
      x_max: Some(1.0),
      ..GraphRequest::new("y = x")
    };
    assert!(matches!(
      render_graph(&request),
      Err(GraphError::InvalidViewport(_))
    ));
  }

  #[test]
  fn oversized_canvas() {
    let request = GraphRequest {
      width: 70_000,
      height: 70_000,
      ..GraphRequest::new("y = x")
    };
    assert!(matches!(
      render_graph(&request),
      Err(GraphError::InvalidViewport(_))
    ));
  }
}
