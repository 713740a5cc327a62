//! Record selection by stability, ancestry and particle type.

use std::collections::BTreeSet;

use m2x_core::errors::M2xError;
use m2x_core::Line;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ancestry::produced_from;
use crate::record::{ParticleRecord, RecordStore, RecordSubset};

/// Set of signed particle-type codes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSet(BTreeSet<i64>);

impl TypeSet {
    /// Creates a set from any collection of type ids.
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Returns whether `type_id` is a member.
    pub fn contains(&self, type_id: i64) -> bool {
        self.0.contains(&type_id)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }

    /// Members present in both sets.
    pub fn overlap(&self, other: &TypeSet) -> Vec<i64> {
        self.0.intersection(&other.0).copied().collect()
    }

    /// Electrons, muons and charged pions: the default visible content.
    pub fn charged_leptons_and_pions() -> Self {
        Self::new([11, -11, 13, -13, 211, -211])
    }

    /// Neutrinos and the dark-sector codes 40 and 3000: the default invisible content.
    pub fn neutrinos_and_dark() -> Self {
        Self::new([12, -12, 14, -14, 16, -16, 40, 3000])
    }
}

impl FromIterator<i64> for TypeSet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Records whose first parent is the sentinel line `1`.
pub fn initial_states(store: &RecordStore) -> RecordSubset<'_> {
    store
        .iter()
        .filter(|record| record.parent_line() == 1)
        .collect()
}

/// Final-state records descending from the record at `ancestor`.
///
/// Empty when `ancestor` is not a line of the store. Fails only when a parent
/// chain of a final-state record does not terminate.
pub fn final_states_of(ancestor: Line, store: &RecordStore) -> Result<RecordSubset<'_>, M2xError> {
    if store.get(ancestor).is_none() {
        debug!(%ancestor, "ancestor line not present in event");
        return Ok(RecordSubset::default());
    }
    let mut selected = Vec::new();
    for record in store.iter().filter(|record| record.is_final()) {
        if produced_from(record, ancestor, store)? {
            selected.push(record);
        }
    }
    Ok(selected.into_iter().collect())
}

/// Records of `subset` whose type id is in `types`, in their original order.
pub fn by_type<'a>(types: &TypeSet, subset: &RecordSubset<'a>) -> RecordSubset<'a> {
    subset
        .iter()
        .filter(|record| types.contains(record.type_id()))
        .collect()
}

/// Visible/invisible split of one branch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition<'a> {
    /// Records whose type id is in the visible set.
    pub visible: RecordSubset<'a>,
    /// Records whose type id is in the invisible set.
    pub invisible: RecordSubset<'a>,
    /// Records in neither set; they contribute to no group sum.
    pub unclassified: RecordSubset<'a>,
}

/// Splits `subset` by the caller's visible and invisible type sets.
///
/// A type listed in both sets is treated as visible.
pub fn partition<'a>(
    subset: &RecordSubset<'a>,
    visible: &TypeSet,
    invisible: &TypeSet,
) -> Partition<'a> {
    let mut groups: [Vec<&'a ParticleRecord>; 3] = Default::default();
    for record in subset.iter() {
        let slot = if visible.contains(record.type_id()) {
            0
        } else if invisible.contains(record.type_id()) {
            1
        } else {
            2
        };
        groups[slot].push(record);
    }
    let [visible, invisible, unclassified] = groups;
    Partition {
        visible: visible.into_iter().collect(),
        invisible: invisible.into_iter().collect(),
        unclassified: unclassified.into_iter().collect(),
    }
}
