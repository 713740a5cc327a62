#![deny(missing_docs)]

//! Per-event particle records and the decay-chain queries built on them.
//!
//! A [`RecordStore`] is built once per event from the reader's raw entries and
//! never mutated. [`produced_from`] walks parent references iteratively with a
//! step bound, and the selectors in [`select`] return ordered borrowed views
//! over the store.

pub mod ancestry;
mod record;
pub mod select;

pub use ancestry::{lineage, produced_from};
pub use record::{ParentRef, ParticleRecord, RawParticle, RecordStore, RecordSubset};
pub use select::{by_type, final_states_of, initial_states, partition, Partition, TypeSet};
