//! Parent-chain resolution.
//!
//! Walks are iterative and bounded by the number of records in the store. A
//! well-formed event only references earlier lines, so a walk that needs more
//! steps than there are records is following a reference cycle and is
//! reported as [`M2xError::Ancestry`].

use m2x_core::errors::{ErrorInfo, M2xError};
use m2x_core::Line;
use tracing::trace;

use crate::record::{ParentRef, ParticleRecord, RecordStore};

/// Returns whether `candidate` descends from the record at `ancestor`.
///
/// Records whose parent is an incoming sentinel are never produced from
/// anything. An orphaned parent reference ends the walk with `false`.
pub fn produced_from(
    candidate: &ParticleRecord,
    ancestor: Line,
    store: &RecordStore,
) -> Result<bool, M2xError> {
    let mut current = candidate;
    let mut steps = 0usize;
    loop {
        match store.parent_of(current) {
            ParentRef::InitialState(_) => return Ok(false),
            _ if current.parent_line() == ancestor.as_raw() => return Ok(true),
            ParentRef::Orphan(missing) => {
                trace!(line = %current.line(), missing, "orphaned parent reference");
                return Ok(false);
            }
            ParentRef::Found(parent) => current = parent,
        }
        steps += 1;
        if steps > store.len() {
            return Err(cycle_error(candidate, steps).with_context("ancestor", ancestor));
        }
    }
}

/// Lines of every stored progenitor of `candidate`, nearest first.
///
/// The walk stops at an incoming sentinel or an orphaned reference, neither of
/// which is included.
pub fn lineage(candidate: &ParticleRecord, store: &RecordStore) -> Result<Vec<Line>, M2xError> {
    let mut chain = Vec::new();
    let mut current = candidate;
    while let ParentRef::Found(parent) = store.parent_of(current) {
        chain.push(parent.line());
        if chain.len() > store.len() {
            return Err(cycle_error(candidate, chain.len()));
        }
        current = parent;
    }
    Ok(chain)
}

fn cycle_error(candidate: &ParticleRecord, steps: usize) -> M2xError {
    M2xError::Ancestry(
        ErrorInfo::new("ancestry-cycle", "parent chain does not terminate")
            .with_context("line", candidate.line())
            .with_context("steps", steps)
            .with_hint("parent references must point to earlier lines"),
    )
}
