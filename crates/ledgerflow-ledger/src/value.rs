use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One element of a tuple returned by a ledger read.
///
/// Integers wider than 64 bits arrive as decimal `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
  Bool(bool),
  Uint(u64),
  Int(i64),
  Text(String),
}

impl RawValue {
  /// Read as a record count. Negative counts saturate to zero.
  pub fn as_count(&self) -> Result<u64, LedgerError> {
    match self {
      RawValue::Uint(n) => Ok(*n),
      RawValue::Int(n) => Ok((*n).max(0) as u64),
      RawValue::Text(s) => parse_unsigned(s).ok_or_else(|| self.coercion("count")),
      RawValue::Bool(_) => Err(self.coercion("count")),
    }
  }

  /// Read as a record id, rendered in decimal.
  pub fn as_id(&self) -> Result<String, LedgerError> {
    match self {
      RawValue::Uint(n) => Ok(n.to_string()),
      RawValue::Int(n) if *n >= 0 => Ok(n.to_string()),
      RawValue::Text(s) if is_decimal(s.trim()) => Ok(canonical_decimal(s.trim())),
      _ => Err(self.coercion("id")),
    }
  }

  /// Read as display text. Every value has one.
  pub fn as_label(&self) -> String {
    self.to_string()
  }

  /// Truthiness: `false`, `0` and the empty string are falsy.
  pub fn is_truthy(&self) -> bool {
    match self {
      RawValue::Bool(b) => *b,
      RawValue::Uint(n) => *n != 0,
      RawValue::Int(n) => *n != 0,
      RawValue::Text(s) => !s.is_empty(),
    }
  }

  fn coercion(&self, expected: &'static str) -> LedgerError {
    LedgerError::Coercion {
      value: self.to_string(),
      expected,
    }
  }
}

impl fmt::Display for RawValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RawValue::Bool(b) => write!(f, "{}", b),
      RawValue::Uint(n) => write!(f, "{}", n),
      RawValue::Int(n) => write!(f, "{}", n),
      RawValue::Text(s) => f.write_str(s),
    }
  }
}

impl From<u64> for RawValue {
  fn from(value: u64) -> Self {
    RawValue::Uint(value)
  }
}

impl From<i64> for RawValue {
  fn from(value: i64) -> Self {
    RawValue::Int(value)
  }
}

impl From<bool> for RawValue {
  fn from(value: bool) -> Self {
    RawValue::Bool(value)
  }
}

impl From<&str> for RawValue {
  fn from(value: &str) -> Self {
    RawValue::Text(value.to_string())
  }
}

impl From<String> for RawValue {
  fn from(value: String) -> Self {
    RawValue::Text(value)
  }
}

fn is_decimal(s: &str) -> bool {
  !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip leading zeros so "007" and "7" name the same record.
fn canonical_decimal(s: &str) -> String {
  let trimmed = s.trim_start_matches('0');
  if trimmed.is_empty() {
    "0".to_string()
  } else {
    trimmed.to_string()
  }
}

fn parse_unsigned(s: &str) -> Option<u64> {
  let s = s.trim();
  if !is_decimal(s) {
    return None;
  }
  // Counts beyond u64 cannot be iterated anyway
  Some(s.parse::<u64>().unwrap_or(u64::MAX))
}
