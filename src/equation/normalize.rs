use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::evaluator::{Function, constant};

/// Power operator understood by the expression engine.
pub const POWER_OPERATOR: &str = "**";

static Y_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^\s*y\s*=\s*").expect("valid y-prefix pattern")
});

/// Equation text in canonical infix form: no whitespace, `^` rewritten to
/// [`POWER_OPERATOR`], juxtaposition turned into explicit `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedEquation(String);

impl NormalizedEquation {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Number of `=` signs.
  pub fn relation_count(&self) -> usize {
    self.0.matches('=').count()
  }

  /// Left- and right-hand side, split at the first `=`.
  pub fn sides(&self) -> (&str, Option<&str>) {
    match self.0.split_once('=') {
      Some((lhs, rhs)) => (lhs, Some(rhs)),
      None => (&self.0, None),
    }
  }

  /// Same text with every parenthesis removed. Only the classifier looks at
  /// this; it loses grouping and must never be evaluated.
  pub fn without_parens(&self) -> String {
    self.0.chars().filter(|c| !matches!(c, '(' | ')')).collect()
  }

  /// `lhs=rhs` rearranged to `(lhs)-(rhs)`. A bare expression is already
  /// in zero form; more than one `=` has none.
  pub fn zero_form(&self) -> Option<String> {
    match self.relation_count() {
      0 => Some(self.0.clone()),
      1 => {
        let (lhs, rhs) = self.sides();
        let rhs = rhs.unwrap_or_default();
        if lhs.is_empty() || rhs.is_empty() {
          return None;
        }
        Some(format!("({lhs})-({rhs})"))
      }
      _ => None,
    }
  }
}

impl fmt::Display for NormalizedEquation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for NormalizedEquation {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

/// Rewrite raw user text into a [`NormalizedEquation`]. Never fails; junk
/// in gives junk out and the engine rejects it later.
pub fn normalize(raw: &str) -> NormalizedEquation {
  let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
  let powered = compact.replace('^', POWER_OPERATOR);
  NormalizedEquation(insert_multiplication(&powered))
}

/// Like [`normalize`], but drops a leading `y =` first. Used for
/// polynomial-style input where only the right-hand side matters.
pub fn normalize_rhs(raw: &str) -> NormalizedEquation {
  normalize(&Y_PREFIX.replace(raw, ""))
}

/// Like [`normalize`], but a leading `y =` in either case is read as the
/// solved-for variable and written back as `y=`.
pub fn normalize_explicit(raw: &str) -> NormalizedEquation {
  if Y_PREFIX.is_match(raw) {
    NormalizedEquation(format!("y={}", normalize_rhs(raw).0))
  } else {
    normalize(raw)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
  Number,
  Name,
  Function,
  Open,
  Close,
  Other,
}

fn needs_star(prev: Token, next: Token) -> bool {
  use Token::*;
  matches!(
    (prev, next),
    (Number, Name | Function | Open)
      | (Name, Number | Name | Function | Open)
      | (Close, Number | Name | Function | Open)
  )
}

fn push_token(out: &mut String, prev: &mut Token, kind: Token, text: &str) {
  if needs_star(*prev, kind) {
    out.push('*');
  }
  out.push_str(text);
  *prev = kind;
}

fn is_known_name(word: &str) -> bool {
  Function::lookup(word).is_some() || constant(word).is_some()
}

fn is_single_letter_name(c: char) -> bool {
  matches!(c, 'x' | 'y') || constant(&c.to_string()).is_some()
}

/// Split a run of letters such as `xy` or `xsin` into known names and
/// single-letter variables. Runs that cannot be split completely this way
/// (`theta`) are left whole so the engine reports them by their real name.
fn split_word(word: &str) -> Vec<String> {
  if is_known_name(word) || word.chars().count() == 1 {
    return vec![word.to_string()];
  }
  let chars: Vec<char> = word.chars().collect();
  let mut pieces = Vec::new();
  let mut pos = 0;
  while pos < chars.len() {
    let longest = (pos + 1..=chars.len()).rev().find(|&end| {
      end - pos > 1
        && is_known_name(&chars[pos..end].iter().collect::<String>())
    });
    match longest {
      Some(end) => {
        pieces.push(chars[pos..end].iter().collect());
        pos = end;
      }
      None if is_single_letter_name(chars[pos]) => {
        pieces.push(chars[pos].to_string());
        pos += 1;
      }
      None => return vec![word.to_string()],
    }
  }
  pieces
}

fn insert_multiplication(text: &str) -> String {
  let chars: Vec<char> = text.chars().collect();
  let mut out = String::with_capacity(text.len() + 8);
  let mut prev = Token::Other;
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];
    if c.is_ascii_digit() || c == '.' {
      let start = i;
      while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
        i += 1;
      }
      let number: String = chars[start..i].iter().collect();
      push_token(&mut out, &mut prev, Token::Number, &number);
    } else if c.is_alphabetic() {
      let start = i;
      while i < chars.len() && chars[i].is_alphabetic() {
        i += 1;
      }
      // digits that belong to a function name: log10(, log2(, atan2(
      let mut end = i;
      while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
      }
      if end > i && chars.get(end) == Some(&'(') {
        let candidate: String = chars[start..end].iter().collect();
        if Function::lookup(&candidate).is_some() {
          i = end;
        }
      }
      let word: String = chars[start..i].iter().collect();
      let opens_call = chars.get(i) == Some(&'(');
      let pieces = split_word(&word);
      let last = pieces.len() - 1;
      for (n, piece) in pieces.iter().enumerate() {
        let is_call =
          n == last && opens_call && Function::lookup(piece).is_some();
        let kind = if is_call {
          Token::Function
        } else {
          Token::Name
        };
        push_token(&mut out, &mut prev, kind, piece);
      }
    } else {
      let kind = match c {
        '(' => Token::Open,
        ')' => Token::Close,
        _ => Token::Other,
      };
      let mut buf = [0u8; 4];
      push_token(&mut out, &mut prev, kind, c.encode_utf8(&mut buf));
      i += 1;
    }
  }
  out
}

/// Human-readable form of a normalized equation: `^` for powers, implied
/// multiplication left implicit, spaces around binary operators.
pub fn format_equation(normalized: &str) -> String {
  let text = normalized.replace(POWER_OPERATOR, "^");
  let chars: Vec<char> = text.chars().collect();
  let mut out = String::with_capacity(text.len() * 2);
  let mut prev: Option<char> = None;

  for (i, &c) in chars.iter().enumerate() {
    match c {
      '*' => {
        let next = chars.get(i + 1).copied();
        let between_numbers = prev.is_some_and(|p| p.is_ascii_digit())
          && next.is_some_and(|n| n.is_ascii_digit() || n == '.');
        if between_numbers {
          out.push_str(" * ");
        }
      }
      '+' | '-' | '/' | '=' => {
        let unary = c == '-'
          && prev.is_none_or(|p| {
            matches!(p, '(' | '=' | '+' | '-' | '*' | '/' | '^' | ',')
          });
        if unary {
          out.push(c);
        } else {
          out.push(' ');
          out.push(c);
          out.push(' ');
        }
      }
      _ => out.push(c),
    }
    prev = Some(c);
  }
  out.split_whitespace().collect::<Vec<_>>().join(" ")
}
