#![allow(dead_code)]

use m2x_chain::{RawParticle, RecordStore};

pub fn particle(type_id: i64, status: i32, parent: u32, momentum: [f64; 4]) -> RawParticle {
    RawParticle {
        type_id,
        status,
        parent_lines: (parent, if parent == 1 { 2 } else { parent }),
        momentum: momentum.to_vec(),
        mass: 0.0,
    }
}

pub const VISIBLE_1: [f64; 4] = [-3.3470, -0.2686, 1.8677, 3.8437];
pub const VISIBLE_2: [f64; 4] = [1.0035, -0.2445, 0.340724, 1.0927];
pub const INVISIBLE_1: [f64; 4] = [1.2, 0.3, 0.5, 1.33];
pub const INVISIBLE_2: [f64; 4] = [1.1435, 0.2131, -0.4, 1.23];

/// e- e+ -> tau- tau+, each tau decaying straight to one lepton and one neutrino.
pub fn ditau_raw() -> Vec<RawParticle> {
    vec![
        particle(11, -1, 0, [0.0, 0.0, 7.0, 7.0]),
        particle(-11, -1, 0, [0.0, 0.0, -4.0, 4.0]),
        particle(15, 2, 1, add(VISIBLE_1, INVISIBLE_1)),
        particle(-15, 2, 1, add(VISIBLE_2, INVISIBLE_2)),
        particle(11, 1, 3, VISIBLE_1),
        particle(12, 1, 3, INVISIBLE_1),
        particle(-13, 1, 4, VISIBLE_2),
        particle(-14, 1, 4, INVISIBLE_2),
    ]
}

pub fn ditau_store() -> RecordStore {
    RecordStore::from_raw(ditau_raw()).expect("ditau fixture")
}

pub fn add(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]]
}
