//! Record line identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Parent references that mark the two incoming particles of an event.
pub const INITIAL_SENTINELS: [u32; 2] = [1, 2];

/// 1-based position of a particle entry within its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(u32);

impl Line {
    /// Creates a line from its raw integer representation.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the line.
    pub const fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the 0-based arena slot for this line, or `None` for line `0`.
    pub fn index(&self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    /// Creates the line stored at the given 0-based arena slot.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Returns whether this line is one of the initial-state sentinels.
    pub fn is_sentinel(&self) -> bool {
        is_sentinel(self.0)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns whether a raw parent reference terminates an ancestry walk.
pub fn is_sentinel(raw: u32) -> bool {
    INITIAL_SENTINELS.contains(&raw)
}
