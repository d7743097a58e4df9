use serde::Deserialize;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceOrderOptions {
  /// Rank modules used by entry chunks first. Makes entry chunks smaller at the cost of overall
  /// size.
  pub prefer_entry: Option<bool>,
}
