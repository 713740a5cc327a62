use m2x_core::errors::M2xError;
use m2x_core::rng::RngHandle;
use m2x_core::FourMomentum;
use proptest::prelude::*;
use rand::seq::SliceRandom;

fn momenta() -> impl Strategy<Value = Vec<FourMomentum>> {
    prop::collection::vec(
        (
            -100.0f64..100.0,
            -100.0f64..100.0,
            -100.0f64..100.0,
            0.0f64..400.0,
        ),
        0..16,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(px, py, pz, e)| FourMomentum::new(px, py, pz, e))
            .collect()
    })
}

proptest! {
    #[test]
    fn sum_is_invariant_under_permutation(
        (original, shuffled) in momenta()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let a: FourMomentum = original.iter().sum();
        let b: FourMomentum = shuffled.iter().sum();
        prop_assert!(a.approx_eq(&b, 1e-9), "{a:?} vs {b:?}");
    }

    #[test]
    fn invariant_mass_defined_exactly_for_timelike_vectors(
        px in -50.0f64..50.0,
        py in -50.0f64..50.0,
        pz in -50.0f64..50.0,
        e in 0.0f64..100.0,
    ) {
        let p = FourMomentum::new(px, py, pz, e);
        let p3 = px * px + py * py + pz * pz;
        match p.invariant_mass() {
            None => prop_assert!(e * e < p3),
            Some(mass) => {
                prop_assert!(e * e >= p3);
                prop_assert!((mass - (e * e - p3).sqrt()).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn randomized_orderings_of_fixed_multiset_sum_identically() {
    // quarter-integer components keep every partial sum exact
    let multiset: Vec<FourMomentum> = (0..12)
        .map(|i| {
            let x = i as f64 * 0.25;
            FourMomentum::new(x - 1.5, 2.0 - x, x * 0.5, 10.0 + x)
        })
        .collect();
    let reference: FourMomentum = multiset.iter().sum();
    let mut rng = RngHandle::from_seed(2024);
    for _ in 0..64 {
        let mut shuffled = multiset.clone();
        shuffled.shuffle(rng.inner_mut());
        let total: FourMomentum = shuffled.into_iter().sum();
        assert_eq!(total, reference);
    }
}

#[test]
fn empty_sum_is_zero_vector() {
    let empty: Vec<FourMomentum> = Vec::new();
    let total: FourMomentum = empty.iter().sum();
    assert_eq!(total, FourMomentum::zero());
}

#[test]
fn addition_is_componentwise() {
    let mut a = FourMomentum::new(1.0, 2.0, 3.0, 4.0);
    let b = FourMomentum::new(0.5, -2.0, 1.0, 1.0);
    assert_eq!(a + b, FourMomentum::new(1.5, 0.0, 4.0, 5.0));
    assert_eq!(a + b, b + a);
    a += b;
    assert_eq!(a, FourMomentum::new(1.5, 0.0, 4.0, 5.0));
}

#[test]
fn lightlike_and_spacelike_masses() {
    assert_eq!(FourMomentum::new(3.0, 0.0, 4.0, 5.0).invariant_mass(), Some(0.0));
    assert_eq!(FourMomentum::new(3.0, 0.0, 4.0, 4.999).invariant_mass(), None);
    let m = FourMomentum::new(0.0, 0.0, 0.0, 1.77686).invariant_mass().unwrap();
    assert!((m - 1.77686).abs() < 1e-12);
}

#[test]
fn short_slices_are_rejected() {
    let err = FourMomentum::from_slice(&[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(err, M2xError::Record(info) if info.code == "short-momentum"));
}

#[test]
fn transverse_components_are_px_py() {
    let p = FourMomentum::new(-3.347, -0.2686, 1.8677, 3.8437);
    assert_eq!(p.transverse(), [-3.347, -0.2686]);
    assert_eq!(p.to_array(), [-3.347, -0.2686, 1.8677, 3.8437]);
}
