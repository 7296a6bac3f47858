//! Cellular signal timelines
//!
//! A [`CellMoment`] carries up to three independent substreams recorded from
//! the telephony stack: registered cell info, neighboring cells, and the
//! coarse cell location. Recorders emit them separately, so moments are
//! frequently partial and get merged with [`CellMoment::merge`].

use serde::{Deserialize, Serialize};

/// Radio access technology of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Radio {
    Gsm,
    Cdma,
    Wcdma,
    Tdscdma,
    Lte,
    Nr,
}

/// A visible cell tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellInfo {
    pub radio: Radio,
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub mcc: Option<u16>,
    #[serde(default)]
    pub mnc: Option<u16>,
    /// Location/tracking area code
    #[serde(default)]
    pub area: Option<i32>,
    #[serde(default)]
    pub cid: Option<i64>,
    #[serde(default)]
    pub dbm: Option<i32>,
}

/// A neighboring cell as reported by legacy telephony APIs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighboringCell {
    pub radio: Radio,
    #[serde(default)]
    pub area: Option<i32>,
    #[serde(default)]
    pub cid: Option<i64>,
    #[serde(default)]
    pub rssi: Option<i32>,
}

/// Coarse location of the serving cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellLocation {
    pub area: i32,
    pub cid: i64,
    #[serde(default)]
    pub psc: Option<i32>,
}

/// One telephony sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMoment {
    /// Seconds since the recording started
    pub elapsed: f32,
    #[serde(default)]
    pub cell: Vec<CellInfo>,
    #[serde(default)]
    pub neighboring: Vec<NeighboringCell>,
    #[serde(default)]
    pub location: Option<CellLocation>,
}

impl CellMoment {
    pub fn new(elapsed: f32) -> Self {
        Self {
            elapsed,
            ..Default::default()
        }
    }

    /// Same substream presence pattern as `other`
    pub fn is_same_type_of(&self, other: &CellMoment) -> bool {
        self.cell.is_empty() == other.cell.is_empty()
            && self.neighboring.is_empty() == other.neighboring.is_empty()
            && self.location.is_none() == other.location.is_none()
    }

    /// Fill the gaps of `self` with `other`
    ///
    /// Non-empty fields win; when both sides carry a field, `self` wins.
    /// The timestamp is always taken from `self`.
    pub fn merge(&self, other: &CellMoment) -> CellMoment {
        CellMoment {
            elapsed: self.elapsed,
            cell: if self.cell.is_empty() {
                other.cell.clone()
            } else {
                self.cell.clone()
            },
            neighboring: if self.neighboring.is_empty() {
                other.neighboring.clone()
            } else {
                self.neighboring.clone()
            },
            location: self.location.clone().or_else(|| other.location.clone()),
        }
    }
}

/// A recorded telephony timeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellTimeline {
    #[serde(default)]
    pub id: String,
    pub moments: Vec<CellMoment>,
}

impl CellTimeline {
    pub fn new(id: impl Into<String>, moments: Vec<CellMoment>) -> Self {
        Self {
            id: id.into(),
            moments,
        }
    }

    /// Seconds between the first and last moment
    pub fn timespan(&self) -> f32 {
        match (self.moments.first(), self.moments.last()) {
            (Some(first), Some(last)) => last.elapsed - first.elapsed,
            _ => 0.0,
        }
    }
}
