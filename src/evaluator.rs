use std::f64::consts::{E, PI, TAU};

use crate::EvalError;
use crate::syntax::{self, BinaryOperator, Expr, UnaryOperator};

/// Variable values an expression is evaluated against.
///
/// Plotters rebind the same one or two variables thousands of times per
/// render, so this is a small vector with in-place updates rather than a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
  vars: Vec<(String, f64)>,
}

impl Bindings {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: &str, value: f64) -> Self {
    self.set(name, value);
    self
  }

  pub fn set(&mut self, name: &str, value: f64) {
    match self.vars.iter_mut().find(|(n, _)| n == name) {
      Some((_, v)) => *v = value,
      None => self.vars.push((name.to_string(), value)),
    }
  }

  pub fn get(&self, name: &str) -> Option<f64> {
    self
      .vars
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| *v)
  }
}

impl FromIterator<(String, f64)> for Bindings {
  fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
    let mut bindings = Self::new();
    for (name, value) in iter {
      bindings.set(&name, value);
    }
    bindings
  }
}

/// Named constants. A binding with the same name takes precedence.
pub fn constant(name: &str) -> Option<f64> {
  match name {
    "pi" | "π" => Some(PI),
    "e" => Some(E),
    "tau" => Some(TAU),
    "phi" => Some((1.0 + 5f64.sqrt()) / 2.0),
    _ => None,
  }
}

/// Built-in functions, resolved by name at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
  Sin,
  Cos,
  Tan,
  Sec,
  Csc,
  Cot,
  Asin,
  Acos,
  Atan,
  Sinh,
  Cosh,
  Tanh,
  Asinh,
  Acosh,
  Atanh,
  Sqrt,
  Cbrt,
  Abs,
  Exp,
  Ln,
  Log,
  Log10,
  Log2,
  Floor,
  Ceil,
  Round,
  Sign,
  Atan2,
  Pow,
  Min,
  Max,
  Mod,
}

const FUNCTIONS: &[(&str, Function)] = &[
  ("sin", Function::Sin),
  ("cos", Function::Cos),
  ("tan", Function::Tan),
  ("sec", Function::Sec),
  ("csc", Function::Csc),
  ("cot", Function::Cot),
  ("asin", Function::Asin),
  ("acos", Function::Acos),
  ("atan", Function::Atan),
  ("sinh", Function::Sinh),
  ("cosh", Function::Cosh),
  ("tanh", Function::Tanh),
  ("asinh", Function::Asinh),
  ("acosh", Function::Acosh),
  ("atanh", Function::Atanh),
  ("sqrt", Function::Sqrt),
  ("cbrt", Function::Cbrt),
  ("abs", Function::Abs),
  ("exp", Function::Exp),
  ("ln", Function::Ln),
  ("log", Function::Log),
  ("log10", Function::Log10),
  ("log2", Function::Log2),
  ("floor", Function::Floor),
  ("ceil", Function::Ceil),
  ("round", Function::Round),
  ("sign", Function::Sign),
  ("atan2", Function::Atan2),
  ("pow", Function::Pow),
  ("min", Function::Min),
  ("max", Function::Max),
  ("mod", Function::Mod),
];

impl Function {
  pub fn lookup(name: &str) -> Option<Self> {
    FUNCTIONS
      .iter()
      .find(|(n, _)| *n == name)
      .map(|(_, f)| *f)
  }

  pub fn name(self) -> &'static str {
    FUNCTIONS
      .iter()
      .find(|(_, f)| *f == self)
      .map(|(n, _)| *n)
      .unwrap_or("?")
  }

  /// Every function name the engine knows, used by the normalizer to keep
  /// a name attached to its argument list.
  pub fn names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|(n, _)| *n)
  }

  pub fn is_trigonometric(self) -> bool {
    matches!(
      self,
      Function::Sin
        | Function::Cos
        | Function::Tan
        | Function::Sec
        | Function::Csc
        | Function::Cot
        | Function::Asin
        | Function::Acos
        | Function::Atan
        | Function::Atan2
    )
  }

  /// Accepted argument counts as an inclusive range.
  fn arity(self) -> (usize, usize) {
    match self {
      Function::Log => (1, 2),
      Function::Atan2 | Function::Pow | Function::Mod => (2, 2),
      Function::Min | Function::Max => (1, usize::MAX),
      _ => (1, 1),
    }
  }

  pub(crate) fn check_arity(self, got: usize) -> Result<(), EvalError> {
    let (min, max) = self.arity();
    if got < min || got > max {
      return Err(EvalError::Arity {
        name: self.name(),
        expected: if max == min {
          min.to_string()
        } else if max == usize::MAX {
          format!("at least {min}")
        } else {
          format!("{min} to {max}")
        },
        got,
      });
    }
    Ok(())
  }

  fn apply(self, args: &[f64]) -> f64 {
    let x = args.first().copied().unwrap_or(f64::NAN);
    let y = args.get(1).copied();
    match self {
      Function::Sin => x.sin(),
      Function::Cos => x.cos(),
      Function::Tan => x.tan(),
      Function::Sec => 1.0 / x.cos(),
      Function::Csc => 1.0 / x.sin(),
      Function::Cot => 1.0 / x.tan(),
      Function::Asin => x.asin(),
      Function::Acos => x.acos(),
      Function::Atan => x.atan(),
      Function::Sinh => x.sinh(),
      Function::Cosh => x.cosh(),
      Function::Tanh => x.tanh(),
      Function::Asinh => x.asinh(),
      Function::Acosh => x.acosh(),
      Function::Atanh => x.atanh(),
      Function::Sqrt => x.sqrt(),
      Function::Cbrt => x.cbrt(),
      Function::Abs => x.abs(),
      Function::Exp => x.exp(),
      Function::Ln => x.ln(),
      // log(x) is the natural log, log(x, b) uses base b
      Function::Log => match y {
        Some(base) => x.ln() / base.ln(),
        None => x.ln(),
      },
      Function::Log10 => x.log10(),
      Function::Log2 => x.log2(),
      Function::Floor => x.floor(),
      Function::Ceil => x.ceil(),
      Function::Round => x.round(),
      Function::Sign => {
        if x.is_nan() || x == 0.0 {
          x
        } else {
          x.signum()
        }
      }
      Function::Atan2 => x.atan2(y.unwrap_or(f64::NAN)),
      Function::Pow => x.powf(y.unwrap_or(f64::NAN)),
      Function::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
      Function::Max => {
        args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
      }
      Function::Mod => x.rem_euclid(y.unwrap_or(f64::NAN)),
    }
  }
}

fn factorial(n: f64) -> f64 {
  if n < 0.0 || n.fract() != 0.0 {
    return f64::NAN;
  }
  if n > 170.0 {
    return f64::INFINITY;
  }
  (2..=n as u32).fold(1.0, |acc, k| acc * k as f64)
}

/// Evaluate a parsed expression.
///
/// Out-of-domain arithmetic yields `NaN` or an infinity, never an error.
/// The only evaluation-time error is an identifier that is neither bound
/// nor a known constant.
pub fn eval_expr(expr: &Expr, bindings: &Bindings) -> Result<f64, EvalError> {
  match expr {
    Expr::Real(v) => Ok(*v),
    Expr::Identifier(name) => bindings
      .get(name)
      .or_else(|| constant(name))
      .ok_or_else(|| EvalError::UndefinedSymbol(name.clone())),
    Expr::UnaryOp { op, operand } => {
      let v = eval_expr(operand, bindings)?;
      Ok(match op {
        UnaryOperator::Minus => -v,
        UnaryOperator::Factorial => factorial(v),
      })
    }
    Expr::BinaryOp { op, left, right } => {
      let a = eval_expr(left, bindings)?;
      let b = eval_expr(right, bindings)?;
      Ok(match op {
        BinaryOperator::Plus => a + b,
        BinaryOperator::Minus => a - b,
        BinaryOperator::Times => a * b,
        BinaryOperator::Divide => a / b,
        BinaryOperator::Power => a.powf(b),
      })
    }
    Expr::FunctionCall { func, args } => {
      let values = args
        .iter()
        .map(|a| eval_expr(a, bindings))
        .collect::<Result<Vec<_>, _>>()?;
      Ok(func.apply(&values))
    }
  }
}

/// A parsed expression ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
  source: String,
  root: Expr,
}

impl Expression {
  pub fn parse(source: &str) -> Result<Self, EvalError> {
    Ok(Self {
      source: source.to_string(),
      root: syntax::parse(source)?,
    })
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn eval(&self, bindings: &Bindings) -> Result<f64, EvalError> {
    eval_expr(&self.root, bindings)
  }

  /// Identifiers that are not named constants, deduplicated, in source
  /// order.
  pub fn free_variables(&self) -> Vec<&str> {
    let mut vars: Vec<&str> = Vec::new();
    self.root.for_each_identifier(&mut |name| {
      if constant(name).is_none() && !vars.contains(&name) {
        vars.push(name);
      }
    });
    vars
  }
}

/// One-shot parse and evaluate.
pub fn evaluate(source: &str, bindings: &Bindings) -> Result<f64, EvalError> {
  Expression::parse(source)?.eval(bindings)
}
