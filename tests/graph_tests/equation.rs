use super::*;

mod normalizing {
  use super::*;

  #[test]
  fn implicit_multiplication() {
    assert_eq!(normalize("y = 2x^2 + 3x").as_str(), "y=2*x**2+3*x");
    assert_eq!(normalize("(x-1)(x+2)").as_str(), "(x-1)*(x+2)");
    assert_eq!(normalize("x(x-1)").as_str(), "x*(x-1)");
    assert_eq!(normalize("2 pi x").as_str(), "2*pi*x");
  }

  #[test]
  fn function_names_stay_attached() {
    assert_eq!(normalize("y=2sin(3x)").as_str(), "y=2*sin(3*x)");
    assert_eq!(normalize("y=log10(x)").as_str(), "y=log10(x)");
    assert_eq!(normalize("y=xsin(x)").as_str(), "y=x*sin(x)");
  }

  #[test]
  fn whitespace_is_removed() {
    assert_eq!(normalize(" x ^ 2 \t+ y^2 = 9 ").as_str(), "x**2+y**2=9");
  }

  #[test]
  fn rhs_drops_y_prefix() {
    assert_eq!(normalize_rhs("Y = 3x - 1").as_str(), "3*x-1");
    assert_eq!(normalize_rhs("3x - 1").as_str(), "3*x-1");
  }

  #[test]
  fn explicit_prefix_is_case_insensitive() {
    assert_eq!(normalize_explicit("Y = 2x^2").as_str(), "y=2*x**2");
    assert_eq!(normalize_explicit("  y=x").as_str(), "y=x");
    assert_eq!(normalize_explicit("x^2 + Y^2 = 4").as_str(), "x**2+Y**2=4");
    assert_eq!(
      classify(&normalize_explicit("Y = x^2")),
      EquationForm::ExplicitY
    );
  }

  #[test]
  fn display_form() {
    assert_eq!(format_equation("y=2*x**2+3*x"), "y = 2x^2 + 3x");
    assert_eq!(format_equation("y=-x**2"), "y = -x^2");
    assert_eq!(format_equation("y=2*3"), "y = 2 * 3");
  }
}

mod classifying {
  use super::*;

  #[test]
  fn explicit_forms() {
    assert_eq!(form_of("y = x^2 - 3x"), EquationForm::ExplicitY);
    assert_eq!(form_of("x^3 - x"), EquationForm::ExplicitY);
    assert_eq!(form_of("x = y^2"), EquationForm::ExplicitX);
  }

  #[test]
  fn rhs_mentioning_its_own_variable_is_implicit() {
    assert_eq!(form_of("y = y + x"), EquationForm::Implicit);
    assert_eq!(form_of("x = sin(x) + y"), EquationForm::Implicit);
  }

  #[test]
  fn circles() {
    assert_eq!(form_of("(x-1)^2 + (y+2)^2 = 9"), EquationForm::Circle);
    assert_eq!(form_of("x^2 + y^2 = 25"), EquationForm::Circle);
    assert_eq!(form_of("y^2 + (x-3)^2 = 4"), EquationForm::Circle);
  }

  #[test]
  fn unit_circle_is_an_ellipse() {
    assert_eq!(form_of("x^2 + y^2 = 1"), EquationForm::Ellipse);
  }

  #[test]
  fn ellipses_and_hyperbolas() {
    assert_eq!(form_of("x^2/9 + y^2/4 = 1"), EquationForm::Ellipse);
    assert_eq!(form_of("(x^2)/(9) + (y^2)/(4) = 1"), EquationForm::Ellipse);
    assert_eq!(form_of("x^2/9 - y^2/16 = 1"), EquationForm::Hyperbola);
    assert_eq!(form_of("y^2/16 - x^2/9 = 1"), EquationForm::Hyperbola);
  }

  #[test]
  fn classifying_is_idempotent() {
    for raw in ["y=x**2", "(x-2)**2+(y+3)**2=16", "x**2/4-y**2/9=1", "x*y=1"] {
      let eq = normalize(raw);
      assert_eq!(eq, normalize(eq.as_str()));
      assert_eq!(classify(&eq), classify(&normalize(eq.as_str())));
    }
  }

  #[test]
  fn fallback_is_implicit() {
    assert_eq!(form_of("x^2 = y^3"), EquationForm::Implicit);
    assert_eq!(form_of("xy = 1"), EquationForm::Implicit);
    assert_eq!(form_of("x^2 + x^2 = 4"), EquationForm::Implicit);
  }
}

mod extracting {
  use super::*;

  fn params(raw: &str) -> (ShapeParams, bool) {
    let eq = normalize(raw);
    let extraction = extract(&eq, classify(&eq)).unwrap();
    (extraction.params, extraction.used_default)
  }

  #[test]
  fn circle_centre_and_radius() {
    assert_eq!(
      params("(x-1)^2 + (y+2)^2 = 9"),
      (
        ShapeParams::Circle {
          h: 1.0,
          k: -2.0,
          r: 3.0
        },
        false
      )
    );
    assert_eq!(
      params("x^2 + y^2 = 5^2"),
      (
        ShapeParams::Circle {
          h: 0.0,
          k: 0.0,
          r: 5.0
        },
        false
      )
    );
  }

  #[test]
  fn already_normalized_input() {
    assert_eq!(
      params("(x-2)**2+(y+3)**2=16").0,
      ShapeParams::Circle {
        h: 2.0,
        k: -3.0,
        r: 4.0
      }
    );
    assert_eq!(
      params("x**2/4-y**2/9=1").0,
      ShapeParams::Hyperbola {
        h: 0.0,
        k: 0.0,
        a: 2.0,
        b: 3.0,
        horizontal: true
      }
    );
  }

  #[test]
  fn ellipse_orientation() {
    assert_eq!(
      params("x^2/9 + y^2/4 = 1"),
      (
        ShapeParams::Ellipse {
          h: 0.0,
          k: 0.0,
          a: 3.0,
          b: 2.0,
          horizontal: true
        },
        false
      )
    );
    assert_eq!(
      params("(x-1)^2/4 + (y+1)^2/9 = 1"),
      (
        ShapeParams::Ellipse {
          h: 1.0,
          k: -1.0,
          a: 3.0,
          b: 2.0,
          horizontal: false
        },
        false
      )
    );
  }

  #[test]
  fn unit_circle_as_ellipse() {
    assert_eq!(
      params("x^2 + y^2 = 1"),
      (
        ShapeParams::Ellipse {
          h: 0.0,
          k: 0.0,
          a: 1.0,
          b: 1.0,
          horizontal: true
        },
        false
      )
    );
  }

  #[test]
  fn bracketed_variables_are_read() {
    for raw in ["(x)^2 + (y)^2 = 1", "x^(2) + ((y))^2 = 1"] {
      assert_eq!(form_of(raw), EquationForm::Ellipse, "{raw}");
      assert_eq!(
        params(raw),
        (
          ShapeParams::Ellipse {
            h: 0.0,
            k: 0.0,
            a: 1.0,
            b: 1.0,
            horizontal: true
          },
          false
        ),
        "{raw}"
      );
    }
    assert_eq!(
      params("(x)^2/(4) - (y)^2 = 1").0,
      ShapeParams::Hyperbola {
        h: 0.0,
        k: 0.0,
        a: 2.0,
        b: 1.0,
        horizontal: true
      }
    );
  }

  #[test]
  fn zero_radius_falls_back_to_unit_circle() {
    assert_eq!(form_of("x^2 + y^2 = 0"), EquationForm::Circle);
    assert_eq!(
      params("x^2 + y^2 = 0"),
      (
        ShapeParams::Circle {
          h: 0.0,
          k: 0.0,
          r: 1.0
        },
        true
      )
    );
  }

  #[test]
  fn unreadable_text_uses_fixed_defaults() {
    let eq = normalize("x^3 + y = 1");
    let ellipse = extract(&eq, EquationForm::Ellipse).unwrap();
    assert!(ellipse.used_default);
    assert_eq!(
      ellipse.params,
      ShapeParams::Ellipse {
        h: 0.0,
        k: 0.0,
        a: 4.0,
        b: 3.0,
        horizontal: true
      }
    );
    let hyperbola = extract(&eq, EquationForm::Hyperbola).unwrap();
    assert!(hyperbola.used_default);
    assert_eq!(
      hyperbola.params,
      ShapeParams::Hyperbola {
        h: 0.0,
        k: 0.0,
        a: 1.0,
        b: 1.0,
        horizontal: true
      }
    );
    let circle = extract(&eq, EquationForm::Circle).unwrap();
    assert!(circle.used_default);
    assert_eq!(
      circle.params,
      ShapeParams::Circle {
        h: 0.0,
        k: 0.0,
        r: 1.0
      }
    );
  }

  #[test]
  fn zero_denominator_defaults_to_one() {
    let (params, used_default) = params("x^2/0 + y^2/4 = 1");
    assert!(used_default);
    assert_eq!(
      params,
      ShapeParams::Ellipse {
        h: 0.0,
        k: 0.0,
        a: 2.0,
        b: 1.0,
        horizontal: false
      }
    );
  }

  #[test]
  fn hyperbola_axes() {
    assert_eq!(
      params("y^2/16 - x^2/9 = 1"),
      (
        ShapeParams::Hyperbola {
          h: 0.0,
          k: 0.0,
          a: 4.0,
          b: 3.0,
          horizontal: false
        },
        false
      )
    );
    assert_eq!(
      params("(x-2)^2/4 - (y-1)^2 = 1"),
      (
        ShapeParams::Hyperbola {
          h: 2.0,
          k: 1.0,
          a: 2.0,
          b: 1.0,
          horizontal: true
        },
        false
      )
    );
  }

  #[test]
  fn non_conic_forms_have_no_params() {
    let eq = normalize("y = x^2");
    assert_eq!(extract(&eq, EquationForm::ExplicitY), None);
    assert_eq!(extract(&eq, EquationForm::Implicit), None);
  }

  #[test]
  fn positive_lengths_only() {
    for raw in [
      "x^2 + y^2 = 16",
      "x^2/25 + y^2/0 = 1",
      "x^2/4 - y^2/0.0 = 1",
      "(x+1)^2/2 + (y-1)^2/8 = 1",
    ] {
      let (p, _) = params(raw);
      match p {
        ShapeParams::Circle { r, .. } => assert!(r > 0.0, "{raw}"),
        ShapeParams::Ellipse { a, b, .. }
        | ShapeParams::Hyperbola { a, b, .. } => {
          assert!(a > 0.0 && b > 0.0, "{raw}")
        }
      }
    }
  }
}
