//! Typed filter state and its reducer.

use mathhelper_common::number::normalize_number_text;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive bounds on the number of known solutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    /// Bounds given in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn contains(&self, count: usize) -> bool {
        self.min <= count && count <= self.max
    }
}

/// The active display criteria. A `None`/empty field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Case-sensitive prefix of the equation text.
    pub search: Option<String>,
    /// Canonical solution values; a record must know at least one of them.
    pub solutions: Vec<String>,
    pub solutions_count: Option<CountRange>,
}

/// Every way the filter state can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Search(String),
    ClearSearch,
    AddSolution(String),
    RemoveSolution(String),
    CountRange { min: usize, max: usize },
    /// Move the lower bound, never past the upper one.
    CountMin(usize),
    /// Move the upper bound, never below the lower one.
    CountMax(usize),
    /// Set the range only if none is set yet.
    InitCountRange { min: usize, max: usize },
    ClearCountRange,
    Reset,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self.search.is_none() && self.solutions.is_empty() && self.solutions_count.is_none()
    }

    /// Returns the filter state after `update`.
    pub fn apply(mut self, update: FilterUpdate) -> Self {
        debug!(?update, "Applying filter update");
        match update {
            FilterUpdate::Search(prefix) => self.search = Some(prefix),
            FilterUpdate::ClearSearch => self.search = None,
            FilterUpdate::AddSolution(value) => {
                let value = normalize_number_text(&value);
                if !value.is_empty() && !self.solutions.contains(&value) {
                    self.solutions.push(value);
                }
            }
            FilterUpdate::RemoveSolution(value) => {
                let value = normalize_number_text(&value);
                self.solutions.retain(|v| *v != value);
            }
            FilterUpdate::CountRange { min, max } => {
                self.solutions_count = Some(CountRange::new(min, max));
            }
            FilterUpdate::CountMin(min) => {
                let max = self.solutions_count.map_or(usize::MAX, |r| r.max);
                self.solutions_count = Some(CountRange { min: min.min(max), max });
            }
            FilterUpdate::CountMax(max) => {
                let min = self.solutions_count.map_or(0, |r| r.min);
                self.solutions_count = Some(CountRange { min, max: max.max(min) });
            }
            FilterUpdate::InitCountRange { min, max } => {
                if self.solutions_count.is_none() {
                    self.solutions_count = Some(CountRange::new(min, max));
                }
            }
            FilterUpdate::ClearCountRange => self.solutions_count = None,
            FilterUpdate::Reset => return Self::default(),
        }
        self
    }

    /// Applies a batch of updates in order.
    pub fn apply_all(self, updates: impl IntoIterator<Item = FilterUpdate>) -> Self {
        updates.into_iter().fold(self, Filters::apply)
    }
}
