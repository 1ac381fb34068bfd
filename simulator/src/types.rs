//! Health states and per-state tables.
//!
//! [`HealthState`] owns the one canonical ordering of states. Every positional
//! vector in the model (costs, utilities, transition rows) is stored in a
//! [`StateTable`] keyed by `HealthState`, so the ordering can never disagree
//! between two parallel arrays.
//!
//! Ordering contract (v1): `Well = 0`, `Stroke = 1`, `PostStroke = 2`, `Dead = 3`.
//! Adding or reordering variants changes [`HealthState::ALL`] and therefore every
//! table at once.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Number of health states.
pub const NUM_STATES: usize = 4;

/// Clinical state of a patient during one cycle.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HealthState {
    Well = 0,
    /// Transient: a patient spends exactly one cycle here.
    Stroke = 1,
    PostStroke = 2,
    /// Absorbing.
    Dead = 3,
}

impl HealthState {
    /// All states in canonical order.
    pub const ALL: [HealthState; NUM_STATES] = [
        HealthState::Well,
        HealthState::Stroke,
        HealthState::PostStroke,
        HealthState::Dead,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`HealthState::index`]. Returns `None` past the last state.
    pub fn from_index(index: usize) -> Option<HealthState> {
        Self::ALL.get(index).copied()
    }

    /// Absorbing states never transition again once entered.
    #[inline(always)]
    pub fn is_absorbing(self) -> bool {
        matches!(self, HealthState::Dead)
    }

    pub fn name(self) -> &'static str {
        match self {
            HealthState::Well => "Well",
            HealthState::Stroke => "Stroke",
            HealthState::PostStroke => "Post-Stroke",
            HealthState::Dead => "Dead",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size table with one entry per [`HealthState`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTable<T>([T; NUM_STATES]);

impl<T> StateTable<T> {
    /// Build from values listed in canonical state order.
    pub const fn new(values: [T; NUM_STATES]) -> Self {
        Self(values)
    }

    /// Build by evaluating `f` once per state.
    pub fn from_fn(mut f: impl FnMut(HealthState) -> T) -> Self {
        Self(std::array::from_fn(|i| f(HealthState::ALL[i])))
    }

    pub fn as_array(&self) -> &[T; NUM_STATES] {
        &self.0
    }

    /// `(state, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (HealthState, &T)> {
        HealthState::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> StateTable<U> {
        StateTable(std::array::from_fn(|i| f(&self.0[i])))
    }
}

impl<T: Default> Default for StateTable<T> {
    fn default() -> Self {
        Self(std::array::from_fn(|_| T::default()))
    }
}

impl<T> Index<HealthState> for StateTable<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, state: HealthState) -> &T {
        &self.0[state.index()]
    }
}

impl<T> IndexMut<HealthState> for StateTable<T> {
    #[inline(always)]
    fn index_mut(&mut self, state: HealthState) -> &mut T {
        &mut self.0[state.index()]
    }
}

/// Annual cost and utility of spending a full cycle in one state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateAttributes {
    pub annual_cost: f64,
    pub annual_utility: f64,
}

/// Build the per-state attribute table from cost and utility arrays listed in
/// canonical state order.
pub fn state_attributes(
    costs: [f64; NUM_STATES],
    utilities: [f64; NUM_STATES],
) -> StateTable<StateAttributes> {
    StateTable::from_fn(|s| StateAttributes {
        annual_cost: costs[s.index()],
        annual_utility: utilities[s.index()],
    })
}

/// Treatment policy applied to a cohort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Therapy {
    /// Control policy: baseline transitions, no treatment cost.
    None,
    /// Anticoagulation: reduced recurrence risk at an annual drug cost.
    Anticoagulation,
}

impl Therapy {
    pub fn name(self) -> &'static str {
        match self {
            Therapy::None => "No Therapy",
            Therapy::Anticoagulation => "Anticoagulation",
        }
    }
}

impl fmt::Display for Therapy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_follows_canonical_order() {
        for (i, s) in HealthState::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(HealthState::from_index(i), Some(*s));
        }
        assert_eq!(HealthState::from_index(NUM_STATES), None);
    }

    #[test]
    fn test_only_dead_is_absorbing() {
        let absorbing: Vec<_> = HealthState::ALL
            .iter()
            .filter(|s| s.is_absorbing())
            .collect();
        assert_eq!(absorbing, vec![&HealthState::Dead]);
    }

    #[test]
    fn test_state_attributes_align_with_states() {
        let table = state_attributes([0.0, 5000.0, 200.0, 0.0], [1.0, 0.8865, 0.9, 0.0]);
        assert_eq!(table[HealthState::Stroke].annual_cost, 5000.0);
        assert_eq!(table[HealthState::PostStroke].annual_utility, 0.9);
        assert_eq!(table[HealthState::Dead].annual_utility, 0.0);
    }
}
