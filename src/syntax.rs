use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::evaluator::Function;
use crate::EvalError;

#[derive(Parser)]
#[grammar = "expr.pest"]
pub struct ExprParser;

/// Parsed numeric expression.
///
/// Function names are resolved while parsing, so an `Expr` never refers to
/// an unknown function. Identifiers stay symbolic until evaluation, where
/// they are looked up in the bindings first and the constant table second.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Real(f64),
  Identifier(String),
  UnaryOp {
    op: UnaryOperator,
    operand: Box<Expr>,
  },
  BinaryOp {
    op: BinaryOperator,
    left: Box<Expr>,
    right: Box<Expr>,
  },
  FunctionCall {
    func: Function,
    args: Vec<Expr>,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  Minus,
  Factorial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  Plus,
  Minus,
  Times,
  Divide,
  Power,
}

impl Expr {
  /// Visit every identifier in the tree, in source order.
  pub fn for_each_identifier<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
    match self {
      Expr::Real(_) => {}
      Expr::Identifier(name) => f(name),
      Expr::UnaryOp { operand, .. } => operand.for_each_identifier(f),
      Expr::BinaryOp { left, right, .. } => {
        left.for_each_identifier(f);
        right.for_each_identifier(f);
      }
      Expr::FunctionCall { args, .. } => {
        for arg in args {
          arg.for_each_identifier(f);
        }
      }
    }
  }
}

/// Parse a normalized infix expression into an [`Expr`].
pub fn parse(input: &str) -> Result<Expr, EvalError> {
  if input.trim().is_empty() {
    return Err(EvalError::EmptyInput);
  }
  let mut pairs =
    ExprParser::parse(Rule::Program, input).map_err(Box::new)?;
  let program = pairs.next().ok_or(EvalError::EmptyInput)?;
  let sum = program
    .into_inner()
    .next()
    .ok_or(EvalError::EmptyInput)?;
  pair_to_expr(sum)
}

fn pair_to_expr(pair: Pair<Rule>) -> Result<Expr, EvalError> {
  match pair.as_rule() {
    Rule::Sum | Rule::Product => fold_left(pair),
    Rule::Unary => {
      let mut inner: Vec<Pair<Rule>> = pair.into_inner().collect();
      let power = inner
        .pop()
        .ok_or_else(|| EvalError::Syntax("dangling sign".into()))?;
      let negations = inner.iter().filter(|p| p.as_str() == "-").count();
      let expr = pair_to_expr(power)?;
      Ok(if negations % 2 == 1 {
        Expr::UnaryOp {
          op: UnaryOperator::Minus,
          operand: Box::new(expr),
        }
      } else {
        expr
      })
    }
    Rule::Power => {
      let mut inner = pair.into_inner();
      let base = next_operand(&mut inner)?;
      match inner.next() {
        Some(exponent) => Ok(Expr::BinaryOp {
          op: BinaryOperator::Power,
          left: Box::new(base),
          right: Box::new(pair_to_expr(exponent)?),
        }),
        None => Ok(base),
      }
    }
    Rule::Postfix => {
      let mut inner = pair.into_inner();
      let mut expr = next_operand(&mut inner)?;
      for _ in inner {
        expr = Expr::UnaryOp {
          op: UnaryOperator::Factorial,
          operand: Box::new(expr),
        };
      }
      Ok(expr)
    }
    Rule::Call => {
      let mut inner = pair.into_inner();
      let name = inner
        .next()
        .ok_or_else(|| EvalError::Syntax("call without a name".into()))?
        .as_str();
      let func = Function::lookup(name)
        .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
      let args = inner.map(pair_to_expr).collect::<Result<Vec<_>, _>>()?;
      func.check_arity(args.len())?;
      Ok(Expr::FunctionCall { func, args })
    }
    Rule::Number => pair
      .as_str()
      .parse::<f64>()
      .map(Expr::Real)
      .map_err(|e| EvalError::Syntax(format!("{}: {e}", pair.as_str()))),
    Rule::Identifier => Ok(Expr::Identifier(pair.as_str().to_string())),
    other => Err(EvalError::Syntax(format!("unexpected {other:?}"))),
  }
}

fn next_operand(
  inner: &mut pest::iterators::Pairs<Rule>,
) -> Result<Expr, EvalError> {
  let pair = inner
    .next()
    .ok_or_else(|| EvalError::Syntax("missing operand".into()))?;
  pair_to_expr(pair)
}

/// Fold `a op b op c` left to right for the additive and multiplicative
/// levels of the grammar.
fn fold_left(pair: Pair<Rule>) -> Result<Expr, EvalError> {
  let mut inner = pair.into_inner();
  let mut acc = next_operand(&mut inner)?;
  while let Some(op) = inner.next() {
    let op = match op.as_str() {
      "+" => BinaryOperator::Plus,
      "-" => BinaryOperator::Minus,
      "*" => BinaryOperator::Times,
      "/" => BinaryOperator::Divide,
      other => {
        return Err(EvalError::Syntax(format!("unknown operator {other}")));
      }
    };
    let rhs = next_operand(&mut inner)?;
    acc = Expr::BinaryOp {
      op,
      left: Box::new(acc),
      right: Box::new(rhs),
    };
  }
  Ok(acc)
}
