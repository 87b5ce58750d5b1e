//! Equation text handling: normalization, form classification and conic
//! parameter extraction.

pub mod classify;
pub mod extract;
pub mod normalize;

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

pub use classify::classify;
pub use extract::{Extraction, ShapeParams, extract};
pub use normalize::{
  NormalizedEquation, format_equation, normalize, normalize_explicit,
  normalize_rhs,
};

/// Algebraic form of an equation. Exactly one per equation; `Implicit` is
/// the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EquationForm {
  ExplicitY,
  ExplicitX,
  Circle,
  Ellipse,
  Hyperbola,
  Implicit,
}

impl EquationForm {
  pub fn name(self) -> &'static str {
    match self {
      EquationForm::ExplicitY => "explicit-y",
      EquationForm::ExplicitX => "explicit-x",
      EquationForm::Circle => "circle",
      EquationForm::Ellipse => "ellipse",
      EquationForm::Hyperbola => "hyperbola",
      EquationForm::Implicit => "implicit",
    }
  }
}

impl fmt::Display for EquationForm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// Unsigned numeric literal as it appears in normalized text.
const NUM: &str = r"(?:\d+(?:\.\d*)?|\.\d+)";

/// `x**2`, `y**2`, `(x-h)**2` or `(y+k)**2`, optionally over a denominator.
/// Occupies four capture groups: bare variable, bracketed variable, offset,
/// denominator (the last one never participates without a denominator).
fn squared_term(with_denominator: bool) -> String {
  let denominator = if with_denominator {
    format!("(?:/({NUM}))?")
  } else {
    "()".to_string()
  };
  format!(r"(?:([xy])|\(([xy])([+-]{NUM})\))\*\*2{denominator}")
}

pub(crate) static CIRCLE: LazyLock<Regex> = LazyLock::new(|| {
  let term = squared_term(false);
  Regex::new(&format!(r"^{term}\+{term}=({NUM})(\*\*2)?$"))
    .expect("valid circle pattern")
});

pub(crate) static ELLIPSE: LazyLock<Regex> = LazyLock::new(|| {
  let term = squared_term(true);
  Regex::new(&format!(r"^{term}\+{term}=1(?:\.0*)?$"))
    .expect("valid ellipse pattern")
});

pub(crate) static HYPERBOLA: LazyLock<Regex> = LazyLock::new(|| {
  let term = squared_term(true);
  Regex::new(&format!(r"^{term}-{term}=1(?:\.0*)?$"))
    .expect("valid hyperbola pattern")
});

/// One squared term pulled out of a conic pattern match.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SquaredTerm {
  pub var: char,
  pub center: f64,
  pub has_offset: bool,
  pub denominator: Option<f64>,
}

/// Read the term whose four groups start at `first_group`.
pub(crate) fn term_from(
  caps: &Captures,
  first_group: usize,
) -> Option<SquaredTerm> {
  let bare = caps.get(first_group);
  let bracketed = caps.get(first_group + 1);
  let var = bare.or(bracketed)?.as_str().chars().next()?;
  let (center, has_offset) = match caps.get(first_group + 2) {
    // (x-2) is centred at +2
    Some(offset) => (-offset.as_str().parse::<f64>().ok()?, true),
    None => (0.0, false),
  };
  let denominator = caps
    .get(first_group + 3)
    .filter(|m| !m.as_str().is_empty())
    .and_then(|m| m.as_str().parse::<f64>().ok());
  Some(SquaredTerm {
    var,
    center,
    has_offset,
    denominator,
  })
}

/// Whether `name` appears in `text` as a whole identifier.
pub(crate) fn mentions(text: &str, name: &str) -> bool {
  text
    .split(|c: char| !(c.is_alphanumeric() || c == '_'))
    .any(|token| token == name)
}
