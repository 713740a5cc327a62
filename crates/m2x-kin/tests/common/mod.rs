#![allow(dead_code)]

use m2x_chain::{RawParticle, RecordStore};

pub const VISIBLE_1: [f64; 4] = [-3.3470, -0.2686, 1.8677, 3.8437];
pub const VISIBLE_2: [f64; 4] = [1.0035, -0.2445, 0.340724, 1.0927];
pub const INVISIBLE_1: [f64; 4] = [1.2, 0.3, 0.5, 1.33];
pub const INVISIBLE_2: [f64; 4] = [1.1435, 0.2131, -0.4, 1.23];
pub const TAU_MASS: f64 = 1.77686;

pub fn particle(
    type_id: i64,
    status: i32,
    parent: u32,
    momentum: [f64; 4],
    mass: f64,
) -> RawParticle {
    RawParticle {
        type_id,
        status,
        parent_lines: (parent, if parent == 1 { 2 } else { parent }),
        momentum: momentum.to_vec(),
        mass,
    }
}

pub fn add(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]]
}

/// e- e+ -> tau- tau+ with tau- -> e- nu_e and tau+ -> mu+ nu_mu~.
pub fn ditau_raw() -> Vec<RawParticle> {
    vec![
        particle(11, -1, 0, [0.0, 0.0, 7.0, 7.0], 0.0),
        particle(-11, -1, 0, [0.0, 0.0, -4.0, 4.0], 0.0),
        particle(15, 2, 1, add(VISIBLE_1, INVISIBLE_1), TAU_MASS),
        particle(-15, 2, 1, add(VISIBLE_2, INVISIBLE_2), TAU_MASS),
        particle(11, 1, 3, VISIBLE_1, 0.000511),
        particle(12, 1, 3, INVISIBLE_1, 0.0),
        particle(-13, 1, 4, VISIBLE_2, 0.105658),
        particle(-14, 1, 4, INVISIBLE_2, 0.0),
    ]
}

pub fn ditau_store() -> RecordStore {
    RecordStore::from_raw(ditau_raw()).expect("ditau fixture")
}

/// The ditau event with a third particle produced directly from the beams.
pub fn three_initial_raw() -> Vec<RawParticle> {
    let mut raw = ditau_raw();
    raw.push(particle(22, 1, 1, [0.0, 0.5, 0.0, 0.5], 0.0));
    raw
}
