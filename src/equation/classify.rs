use super::{
  CIRCLE, ELLIPSE, EquationForm, HYPERBOLA, NormalizedEquation, mentions,
  term_from,
};

/// Text a rule looks at: the normalized equation and a copy with every
/// parenthesis removed.
struct Candidate<'a> {
  text: &'a str,
  stripped: String,
}

struct ClassifyRule {
  form: EquationForm,
  matches: fn(&Candidate) -> bool,
}

/// Ordered rule table; the first match wins and `Implicit` is the fallback.
static RULES: [ClassifyRule; 6] = [
  ClassifyRule {
    form: EquationForm::ExplicitY,
    matches: bare_expression,
  },
  ClassifyRule {
    form: EquationForm::ExplicitY,
    matches: solved_for_y,
  },
  ClassifyRule {
    form: EquationForm::ExplicitX,
    matches: solved_for_x,
  },
  ClassifyRule {
    form: EquationForm::Circle,
    matches: circle,
  },
  ClassifyRule {
    form: EquationForm::Ellipse,
    matches: ellipse,
  },
  ClassifyRule {
    form: EquationForm::Hyperbola,
    matches: hyperbola,
  },
];

pub fn classify(equation: &NormalizedEquation) -> EquationForm {
  let candidate = Candidate {
    text: equation.as_str(),
    stripped: equation.without_parens(),
  };
  let form = RULES
    .iter()
    .find(|rule| (rule.matches)(&candidate))
    .map(|rule| rule.form)
    .unwrap_or(EquationForm::Implicit);
  log::debug!("classified {:?} as {form}", candidate.text);
  form
}

/// No `=` at all and no `y`: an expression in `x`.
fn bare_expression(c: &Candidate) -> bool {
  !c.text.is_empty() && !c.text.contains('=') && !mentions(c.text, "y")
}

fn solved_for(text: &str, var: &str) -> bool {
  text
    .strip_prefix(var)
    .and_then(|rest| rest.strip_prefix('='))
    .is_some_and(|rhs| {
      !rhs.is_empty() && !rhs.contains('=') && !mentions(rhs, var)
    })
}

fn solved_for_y(c: &Candidate) -> bool {
  solved_for(c.text, "y")
}

fn solved_for_x(c: &Candidate) -> bool {
  solved_for(c.text, "x")
}

/// `(x-h)**2+(y-k)**2=r` with unit coefficients. A bare `x**2+y**2=1`
/// is left to the ellipse rule.
fn circle(c: &Candidate) -> bool {
  let Some(caps) = CIRCLE.captures(c.text) else {
    return false;
  };
  let (Some(first), Some(second)) = (term_from(&caps, 1), term_from(&caps, 5))
  else {
    return false;
  };
  if first.var == second.var {
    return false;
  }
  let rhs = caps
    .get(9)
    .and_then(|m| m.as_str().parse::<f64>().ok())
    .unwrap_or(0.0);
  let rhs = if caps.get(10).is_some() { rhs * rhs } else { rhs };
  first.has_offset || second.has_offset || rhs != 1.0
}

fn conic_pattern(c: &Candidate, pattern: &regex::Regex) -> bool {
  [c.text, c.stripped.as_str()].into_iter().any(|text| {
    pattern.captures(text).is_some_and(|caps| {
      match (term_from(&caps, 1), term_from(&caps, 5)) {
        (Some(a), Some(b)) => a.var != b.var,
        _ => false,
      }
    })
  })
}

fn ellipse(c: &Candidate) -> bool {
  conic_pattern(c, &ELLIPSE)
}

fn hyperbola(c: &Candidate) -> bool {
  conic_pattern(c, &HYPERBOLA)
}
