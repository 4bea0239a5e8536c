//! Optional range and collection metadata attached to elements.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How a range value should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RangeType {
  Int,
  Float,
  Percent,
}

/// Range metadata for sliders, progress bars and similar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeInfo {
  pub kind: RangeType,
  pub min: f32,
  pub max: f32,
  pub current: f32,
}

/// Metadata for an element that lays out its children as a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollectionInfo {
  pub row_count: u32,
  pub column_count: u32,
  pub hierarchical: bool,
}

/// Metadata for an element that is one item of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CollectionItemInfo {
  pub row_index: u32,
  pub row_span: u32,
  pub column_index: u32,
  pub column_span: u32,
  pub heading: bool,
  pub selected: bool,
}
