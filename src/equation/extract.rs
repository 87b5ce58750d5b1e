use std::sync::LazyLock;

use regex::Regex;

use super::{
  CIRCLE, ELLIPSE, EquationForm, HYPERBOLA, NUM, NormalizedEquation,
  SquaredTerm, term_from,
};

/// Shape parameters of a classified conic.
///
/// `a` and `b` are semi-axis lengths. For an ellipse `a` is the major one
/// and `horizontal` says it lies along x; for a hyperbola `a` is the
/// transverse semi-axis and `horizontal` means the branches open left and
/// right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeParams {
  Circle {
    h: f64,
    k: f64,
    r: f64,
  },
  Ellipse {
    h: f64,
    k: f64,
    a: f64,
    b: f64,
    horizontal: bool,
  },
  Hyperbola {
    h: f64,
    k: f64,
    a: f64,
    b: f64,
    horizontal: bool,
  },
}

pub const DEFAULT_CIRCLE: ShapeParams = ShapeParams::Circle {
  h: 0.0,
  k: 0.0,
  r: 1.0,
};

pub const DEFAULT_ELLIPSE: ShapeParams = ShapeParams::Ellipse {
  h: 0.0,
  k: 0.0,
  a: 4.0,
  b: 3.0,
  horizontal: true,
};

pub const DEFAULT_HYPERBOLA: ShapeParams = ShapeParams::Hyperbola {
  h: 0.0,
  k: 0.0,
  a: 1.0,
  b: 1.0,
  horizontal: true,
};

/// Result of parameter extraction. Extraction never fails: when the text
/// does not yield usable numbers a fixed default is returned and
/// `used_default` is set so callers can warn about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extraction {
  pub params: ShapeParams,
  pub used_default: bool,
}

// A branch either yields parameters (and whether a denominator had to be
// replaced by 1) or declines.
type Branch = fn(&str) -> Option<(ShapeParams, bool)>;

const CIRCLE_BRANCHES: &[Branch] = &[circle_exact];
const ELLIPSE_BRANCHES: &[Branch] = &[ellipse_exact, ellipse_loose];
const HYPERBOLA_BRANCHES: &[Branch] = &[hyperbola_exact, hyperbola_loose];

static WRAPPED_SQUARE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\(([xy]\*\*2)\)").expect("valid wrapped-square pattern")
});

static WRAPPED_ATOM: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(r"\(([xy]|{NUM})\)")).expect("valid atom pattern")
});

static X_DENOMINATOR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(r"x\*\*2(?:/({NUM}))?")).expect("valid x-term pattern")
});

static Y_DENOMINATOR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(&format!(r"y\*\*2(?:/({NUM}))?")).expect("valid y-term pattern")
});

/// Pull shape parameters for a conic form. Returns `None` for forms that
/// carry no parameters.
pub fn extract(
  equation: &NormalizedEquation,
  form: EquationForm,
) -> Option<Extraction> {
  let (branches, default) = match form {
    EquationForm::Circle => (CIRCLE_BRANCHES, DEFAULT_CIRCLE),
    EquationForm::Ellipse => (ELLIPSE_BRANCHES, DEFAULT_ELLIPSE),
    EquationForm::Hyperbola => (HYPERBOLA_BRANCHES, DEFAULT_HYPERBOLA),
    _ => return None,
  };
  let text = unwrap_groups(equation.as_str());

  let extraction = branches
    .iter()
    .find_map(|branch| branch(&text))
    .map(|(params, replaced)| Extraction {
      params,
      used_default: replaced,
    })
    .unwrap_or_else(|| {
      log::warn!(
        "could not read {form} parameters from {:?}, using {default:?}",
        equation.as_str()
      );
      Extraction {
        params: default,
        used_default: true,
      }
    });
  Some(extraction)
}

/// `(x**2)/(9)` → `x**2/9` and `(x)**(2)` → `x**2`, so the conic patterns
/// see one spelling. Offset groups such as `(x-1)` are kept.
fn unwrap_groups(text: &str) -> String {
  let mut text = text.to_string();
  loop {
    let atoms = WRAPPED_ATOM.replace_all(&text, "$1");
    let next = WRAPPED_SQUARE.replace_all(&atoms, "$1").into_owned();
    if next == text {
      return text;
    }
    text = next;
  }
}

/// Semi-axis from a squared-length denominator. Missing, zero, negative or
/// unreadable denominators count as 1; the flag reports the replacement.
fn semi_axis(denominator: Option<f64>) -> (f64, bool) {
  match denominator {
    None => (1.0, false),
    Some(d) if d.is_finite() && d > 0.0 => (d.sqrt(), false),
    Some(_) => (1.0, true),
  }
}

fn circle_exact(text: &str) -> Option<(ShapeParams, bool)> {
  let caps = CIRCLE.captures(text)?;
  let (first, second) = (term_from(&caps, 1)?, term_from(&caps, 5)?);
  let (x, y) = order_xy(first, second)?;
  let value = caps.get(9)?.as_str().parse::<f64>().ok()?;
  let r = if caps.get(10).is_some() { value } else { value.sqrt() };
  if !(r.is_finite() && r > 0.0) {
    return None;
  }
  Some((
    ShapeParams::Circle {
      h: x.center,
      k: y.center,
      r,
    },
    false,
  ))
}

fn order_xy(
  first: SquaredTerm,
  second: SquaredTerm,
) -> Option<(SquaredTerm, SquaredTerm)> {
  match (first.var, second.var) {
    ('x', 'y') => Some((first, second)),
    ('y', 'x') => Some((second, first)),
    _ => None,
  }
}

fn ellipse_from(
  x: &SquaredTerm,
  y: &SquaredTerm,
  (ax, ax_replaced): (f64, bool),
  (by, by_replaced): (f64, bool),
) -> (ShapeParams, bool) {
  let horizontal = ax >= by;
  let (a, b) = if horizontal { (ax, by) } else { (by, ax) };
  (
    ShapeParams::Ellipse {
      h: x.center,
      k: y.center,
      a,
      b,
      horizontal,
    },
    ax_replaced || by_replaced,
  )
}

fn ellipse_exact(text: &str) -> Option<(ShapeParams, bool)> {
  let caps = ELLIPSE.captures(text)?;
  let (x, y) = order_xy(term_from(&caps, 1)?, term_from(&caps, 5)?)?;
  Some(ellipse_from(
    &x,
    &y,
    semi_axis(x.denominator),
    semi_axis(y.denominator),
  ))
}

fn loose_denominator(pattern: &Regex, text: &str) -> Option<Option<f64>> {
  let caps = pattern.captures(text)?;
  Some(caps.get(1).map(|m| m.as_str().parse::<f64>().unwrap_or(f64::NAN)))
}

/// Both squared terms present somewhere on the left; centres are taken
/// as the origin.
fn ellipse_loose(text: &str) -> Option<(ShapeParams, bool)> {
  let (lhs, _) = text.split_once('=')?;
  let dx = loose_denominator(&X_DENOMINATOR, lhs)?;
  let dy = loose_denominator(&Y_DENOMINATOR, lhs)?;
  let origin = |var| SquaredTerm {
    var,
    center: 0.0,
    has_offset: false,
    denominator: None,
  };
  Some(ellipse_from(
    &origin('x'),
    &origin('y'),
    semi_axis(dx),
    semi_axis(dy),
  ))
}

fn hyperbola_from(
  positive: &SquaredTerm,
  negative: &SquaredTerm,
) -> (ShapeParams, bool) {
  let (a, a_replaced) = semi_axis(positive.denominator);
  let (b, b_replaced) = semi_axis(negative.denominator);
  let horizontal = positive.var == 'x';
  let (h, k) = if horizontal {
    (positive.center, negative.center)
  } else {
    (negative.center, positive.center)
  };
  (
    ShapeParams::Hyperbola {
      h,
      k,
      a,
      b,
      horizontal,
    },
    a_replaced || b_replaced,
  )
}

fn hyperbola_exact(text: &str) -> Option<(ShapeParams, bool)> {
  let caps = HYPERBOLA.captures(text)?;
  let positive = term_from(&caps, 1)?;
  let negative = term_from(&caps, 5)?;
  if positive.var == negative.var {
    return None;
  }
  Some(hyperbola_from(&positive, &negative))
}

/// Split the left side at its first binary minus and read a denominator
/// from each half.
fn hyperbola_loose(text: &str) -> Option<(ShapeParams, bool)> {
  let (lhs, _) = text.split_once('=')?;
  let split = lhs.char_indices().skip(1).find(|&(_, c)| c == '-')?.0;
  let (positive, negative) = (&lhs[..split], &lhs[split + 1..]);
  let term = |part: &str| -> Option<SquaredTerm> {
    let (var, pattern) = if part.contains("x**2") {
      ('x', &X_DENOMINATOR)
    } else if part.contains("y**2") {
      ('y', &Y_DENOMINATOR)
    } else {
      return None;
    };
    Some(SquaredTerm {
      var,
      center: 0.0,
      has_offset: false,
      denominator: loose_denominator(pattern, part)?,
    })
  };
  let (positive, negative) = (term(positive)?, term(negative)?);
  if positive.var == negative.var {
    return None;
  }
  Some(hyperbola_from(&positive, &negative))
}
