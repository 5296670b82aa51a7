use std::fmt;

use serde_json::{Map, Value};

/// A value a resolver "threw" instead of returning.
///
/// Any `std::error::Error` converts into `Thrown` with `?`. Thrown JSON
/// values are kept as is; `Value::Null` is the nullish throw.
#[derive(Debug)]
pub enum Thrown {
  Value(Value),
  Error(Box<dyn std::error::Error + Send + Sync>),
}

impl Thrown {
  /// A thrown `null`.
  pub fn nullish() -> Self {
    Thrown::Value(Value::Null)
  }

  /// A plain error with the given message.
  pub fn msg(message: impl Into<String>) -> Self {
    Thrown::Error(message.into().into())
  }

  pub fn value(value: impl Into<Value>) -> Self {
    Thrown::Value(value.into())
  }

  pub fn is_nullish(&self) -> bool {
    matches!(self, Thrown::Value(Value::Null))
  }
}

impl<E> From<E> for Thrown
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn from(error: E) -> Self {
    Thrown::Error(Box::new(error))
  }
}

impl fmt::Display for Thrown {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Thrown::Value(Value::String(message)) => f.write_str(message),
      Thrown::Value(value) => write!(f, "{value}"),
      Thrown::Error(error) => write!(f, "{error}"),
    }
  }
}

/// A GraphQL error with structured extensions.
///
/// Thrown by a resolver, it is reported as `GraphQLError` with its
/// extensions intact rather than flattened into a message.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphQlError {
  pub message: String,
  pub extensions: Map<String, Value>,
}

impl GraphQlError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      extensions: Map::new(),
    }
  }

  pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.extensions.insert(key.into(), value.into());
    self
  }
}

impl fmt::Display for GraphQlError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.message)
  }
}

impl std::error::Error for GraphQlError {}
