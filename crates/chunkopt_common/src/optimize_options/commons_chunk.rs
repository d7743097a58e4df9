use std::{fmt::Debug, sync::Arc};

use arcstr::ArcStr;
use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

use crate::Module;

/// Receives a module and the number of candidate chunks containing it.
pub type MinChunksPredicate = Arc<dyn Fn(&Module, usize) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum MinChunks {
  Count(usize),
  /// Never extract a module; the commons chunk only gets created and wired up.
  Infinity,
  Predicate(MinChunksPredicate),
}

impl Debug for MinChunks {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Count(count) => f.debug_tuple("Count").field(count).finish(),
      Self::Infinity => f.write_str("Infinity"),
      Self::Predicate(_) => f.write_str("Predicate(..)"),
    }
  }
}

impl<'de> Deserialize<'de> for MinChunks {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    match Value::deserialize(deserializer)? {
      Value::Number(n) => n
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .map(Self::Count)
        .ok_or_else(|| D::Error::custom(format!("`minChunks` must be a non-negative integer, got {n}"))),
      Value::String(s) if s == "Infinity" => Ok(Self::Infinity),
      other => Err(D::Error::custom(format!(
        "`minChunks` must be a non-negative integer or \"Infinity\", got {other}"
      ))),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AsyncCommons {
  #[default]
  Disabled,
  Enabled,
  /// Enabled, and the async commons chunk gets this name.
  Named(ArcStr),
}

impl AsyncCommons {
  pub fn is_enabled(&self) -> bool {
    !matches!(self, Self::Disabled)
  }

  pub fn name(&self) -> Option<&ArcStr> {
    match self {
      Self::Named(name) => Some(name),
      Self::Disabled | Self::Enabled => None,
    }
  }
}

impl<'de> Deserialize<'de> for AsyncCommons {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    match Value::deserialize(deserializer)? {
      Value::Bool(false) => Ok(Self::Disabled),
      Value::Bool(true) => Ok(Self::Enabled),
      Value::String(name) => Ok(Self::Named(name.into())),
      other => Err(D::Error::custom(format!("`async` must be a boolean or a string, got {other}"))),
    }
  }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonsChunkOptions {
  pub name: Option<String>,
  /// Ignored when `name` is set.
  pub names: Option<Vec<String>>,
  /// Filename template for the commons chunk.
  pub filename: Option<String>,
  pub min_chunks: Option<MinChunks>,
  /// Only extract from chunks with these names.
  pub chunks: Option<Vec<String>>,
  /// Extract from the children of the commons chunk instead of from entry chunks.
  pub children: Option<bool>,
  #[serde(rename = "async")]
  pub async_commons: Option<AsyncCommons>,
  pub min_size: Option<u64>,
}

#[test]
fn test_deserialize_min_chunks() {
  let parse = |json: &str| serde_json::from_str::<MinChunks>(json);
  assert!(matches!(parse("3"), Ok(MinChunks::Count(3))));
  assert!(matches!(parse("\"Infinity\""), Ok(MinChunks::Infinity)));
  assert!(parse("-1").is_err());
  assert!(parse("1.5").is_err());
  assert!(parse("[2]").is_err());
}

#[test]
fn test_deserialize_async_commons() {
  let parse = |json: &str| serde_json::from_str::<AsyncCommons>(json);
  assert_eq!(parse("false").unwrap(), AsyncCommons::Disabled);
  assert_eq!(parse("true").unwrap(), AsyncCommons::Enabled);
  assert_eq!(parse("\"shared\"").unwrap(), AsyncCommons::Named(arcstr::literal!("shared")));
  assert!(parse("1").is_err());
}
