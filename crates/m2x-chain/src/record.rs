use m2x_core::errors::M2xError;
use m2x_core::ids::is_sentinel;
use m2x_core::{FourMomentum, Line};
use serde::{Deserialize, Serialize};

/// Particle entry as delivered by an event reader, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParticle {
    /// Signed particle-type code.
    pub type_id: i64,
    /// Status flag; `1` marks a final, stable particle.
    pub status: i32,
    /// Lines of the first and second mother.
    pub parent_lines: (u32, u32),
    /// Momentum components `(px, py, pz, e)`; trailing entries are ignored.
    pub momentum: Vec<f64>,
    /// Declared rest mass.
    pub mass: f64,
}

/// Immutable particle record stored at a fixed line of a [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleRecord {
    line: Line,
    type_id: i64,
    status: i32,
    parent_lines: (u32, u32),
    momentum: FourMomentum,
    mass: f64,
}

impl ParticleRecord {
    /// Line of this record within its event.
    pub fn line(&self) -> Line {
        self.line
    }

    /// Signed particle-type code.
    pub fn type_id(&self) -> i64 {
        self.type_id
    }

    /// Raw status flag.
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Whether the record is a final, stable state.
    pub fn is_final(&self) -> bool {
        self.status == 1
    }

    /// Line of the immediate progenitor (the first mother).
    pub fn parent_line(&self) -> u32 {
        self.parent_lines.0
    }

    /// Line of the second mother, kept for reporting only.
    pub fn second_parent_line(&self) -> u32 {
        self.parent_lines.1
    }

    /// Whether the first mother is one of the incoming sentinels.
    pub fn has_sentinel_parent(&self) -> bool {
        is_sentinel(self.parent_lines.0)
    }

    /// Stored four-momentum.
    pub fn momentum(&self) -> FourMomentum {
        self.momentum
    }

    /// Declared rest mass, as stored.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Rest mass recomputed from the stored momentum.
    pub fn computed_mass(&self) -> Option<f64> {
        self.momentum.invariant_mass()
    }
}

/// Outcome of looking up a record's immediate progenitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParentRef<'a> {
    /// The parent is an incoming particle; ancestry walks stop here.
    InitialState(Line),
    /// The parent record exists in the store.
    Found(&'a ParticleRecord),
    /// The referenced line is not in the store.
    Orphan(u32),
}

/// Ordered arena of the records of one event, keyed by line.
///
/// Slot `i` holds line `i + 1`, so lookups by line are constant time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecordStore {
    records: Vec<ParticleRecord>,
}

impl RecordStore {
    /// Builds the store from raw entries, numbering lines from 1 in input order.
    ///
    /// Fails when an entry carries fewer than four momentum components. Parent
    /// references are not validated here.
    pub fn from_raw(raw: Vec<RawParticle>) -> Result<Self, M2xError> {
        let mut records = Vec::with_capacity(raw.len());
        for (index, particle) in raw.into_iter().enumerate() {
            let line = Line::from_index(index);
            let momentum = FourMomentum::from_slice(&particle.momentum)
                .map_err(|err| err.with_context("line", line))?;
            records.push(ParticleRecord {
                line,
                type_id: particle.type_id,
                status: particle.status,
                parent_lines: particle.parent_lines,
                momentum,
                mass: particle.mass,
            });
        }
        Ok(Self { records })
    }

    /// Number of records in the event.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the event holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record stored at `line`.
    pub fn get(&self, line: Line) -> Option<&ParticleRecord> {
        line.index().and_then(|idx| self.records.get(idx))
    }

    /// Record stored at a raw line reference.
    pub fn get_raw(&self, line: u32) -> Option<&ParticleRecord> {
        self.get(Line::from_raw(line))
    }

    /// Records in line order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &ParticleRecord> + '_ {
        self.records.iter()
    }

    /// Lines in ascending order.
    pub fn lines(&self) -> impl ExactSizeIterator<Item = Line> + '_ {
        self.records.iter().map(|record| record.line)
    }

    /// Resolves the immediate progenitor of `record`.
    pub fn parent_of(&self, record: &ParticleRecord) -> ParentRef<'_> {
        let parent = record.parent_line();
        if is_sentinel(parent) {
            return ParentRef::InitialState(Line::from_raw(parent));
        }
        match self.get_raw(parent) {
            Some(found) => ParentRef::Found(found),
            None => ParentRef::Orphan(parent),
        }
    }

    /// View over every record of the store.
    pub fn all(&self) -> RecordSubset<'_> {
        self.records.iter().collect()
    }
}

/// Ordered, borrowed selection of records from one [`RecordStore`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSubset<'a> {
    records: Vec<&'a ParticleRecord>,
}

impl<'a> RecordSubset<'a> {
    /// Number of selected records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Selected records in their original order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a ParticleRecord> + '_ {
        self.records.iter().copied()
    }

    /// Selected record at a position of the view.
    pub fn get(&self, position: usize) -> Option<&'a ParticleRecord> {
        self.records.get(position).copied()
    }

    /// Lines of the selected records.
    pub fn lines(&self) -> Vec<Line> {
        self.iter().map(ParticleRecord::line).collect()
    }

    /// Type ids of the selected records.
    pub fn type_ids(&self) -> Vec<i64> {
        self.iter().map(ParticleRecord::type_id).collect()
    }

    /// Four-momenta of the selected records.
    pub fn momenta(&self) -> Vec<FourMomentum> {
        self.iter().map(ParticleRecord::momentum).collect()
    }

    /// Total four-momentum of the selection; zero when empty.
    pub fn sum(&self) -> FourMomentum {
        self.iter().map(ParticleRecord::momentum).sum()
    }
}

impl<'a> FromIterator<&'a ParticleRecord> for RecordSubset<'a> {
    fn from_iter<I: IntoIterator<Item = &'a ParticleRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for RecordSubset<'a> {
    type Item = &'a ParticleRecord;
    type IntoIter = std::vec::IntoIter<&'a ParticleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
