//! Bin keys and composite group keys.
//!
//! A `BinKey` is the discrete, ordered unit a raw value bins into; a
//! `GroupKey` is the ordered tuple of bin keys that decides which chart cell
//! an event merges into. Both hash and compare bit-exactly so the forward
//! aggregation and the reverse selection lookup can never disagree.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Label shared by the missing bucket and by legitimate "(Empty)" category
/// codes. The two stay distinguishable through the rank, never the label.
pub const EMPTY_BUCKET_LABEL: &str = "(Empty)";

/// Sortable rank of a bin.
///
/// Ordering: numeric ranks first (by value), then text ranks
/// (alphabetically), with the missing bucket always last.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinRank {
    Number(f64),
    Text(String),
    Missing,
}

impl PartialEq for BinRank {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BinRank::Number(a), BinRank::Number(b)) => a.to_bits() == b.to_bits(),
            (BinRank::Text(a), BinRank::Text(b)) => a == b,
            (BinRank::Missing, BinRank::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for BinRank {}

impl Hash for BinRank {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            BinRank::Number(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            BinRank::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
            BinRank::Missing => 2u8.hash(state),
        }
    }
}

impl Ord for BinRank {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (BinRank::Number(a), BinRank::Number(b)) => a.total_cmp(b),
            (BinRank::Text(a), BinRank::Text(b)) => a.cmp(b),
            (BinRank::Missing, BinRank::Missing) => Ordering::Equal,
            (BinRank::Missing, _) => Ordering::Greater,
            (_, BinRank::Missing) => Ordering::Less,
            (BinRank::Number(_), BinRank::Text(_)) => Ordering::Less,
            (BinRank::Text(_), BinRank::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for BinRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A discrete bin: a sortable rank plus the label the chart displays.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BinKey {
    rank: BinRank,
    label: String,
}

impl BinKey {
    pub fn number(rank: f64, label: impl Into<String>) -> Self {
        Self {
            rank: BinRank::Number(rank),
            label: label.into(),
        }
    }

    /// A dynamically discovered categorical bin; rank falls back to the
    /// label itself, giving alphabetical order.
    pub fn text(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            rank: BinRank::Text(label.clone()),
            label,
        }
    }

    /// The reserved bucket for values that are absent or uncomputable.
    pub fn missing() -> Self {
        Self {
            rank: BinRank::Missing,
            label: EMPTY_BUCKET_LABEL.to_string(),
        }
    }

    pub fn rank(&self) -> &BinRank {
        &self.rank
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.rank, BinRank::Missing)
    }

    pub fn numeric_rank(&self) -> Option<f64> {
        match self.rank {
            BinRank::Number(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for BinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// The slot a bin key occupies inside a group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySlot {
    XAxis,
    ColorBy,
    SeriesBy,
    Name,
    Trellis(usize),
}

/// The composite aggregation key: an ordered tuple of (slot, bin) pairs.
///
/// Two events map to the same `GroupKey` iff they belong in the same chart
/// cell/series. The same key shape is used symmetrically for selection
/// lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    entries: Vec<(KeySlot, BinKey)>,
}

impl GroupKey {
    pub fn new(entries: Vec<(KeySlot, BinKey)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, slot: KeySlot) -> Option<&BinKey> {
        self.entries
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, bin)| bin)
    }

    pub fn entries(&self) -> &[(KeySlot, BinKey)] {
        &self.entries
    }

    /// Trellis bins in declaration order.
    pub fn trellis_bins(&self) -> Vec<&BinKey> {
        self.entries
            .iter()
            .filter(|(slot, _)| matches!(slot, KeySlot::Trellis(_)))
            .map(|(_, bin)| bin)
            .collect()
    }
}
