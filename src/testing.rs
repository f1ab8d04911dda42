//! Helpers shared by unit tests.

use rand::Rng;

use crate::topology::{MixId, MixSet};
use crate::underlay::{UnderlayLink, UnderlayModel};

/// Every pair of `n` nodes linked, latencies in `[1_000, 120_000)`
pub(crate) fn complete_underlay<R: Rng>(n: usize, rng: &mut R) -> Vec<UnderlayLink> {
    let mut links = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            links.push(UnderlayLink::new(a, b, rng.gen_range(1_000..120_000)));
        }
    }
    links
}

pub(crate) fn mix_set(links: Vec<UnderlayLink>) -> MixSet {
    let model = UnderlayModel::from_links(&links).expect("valid test underlay");
    MixSet::from_underlay(model, 420)
}

/// Three mixes with A-B=10, B-C=20, A-C=15
pub(crate) fn triangle_set() -> MixSet {
    mix_set(vec![
        UnderlayLink::new(0, 1, 10),
        UnderlayLink::new(1, 2, 20),
        UnderlayLink::new(0, 2, 15),
    ])
}

/// No self-neighbors, symmetric latencies, degree at most `cap`
pub(crate) fn assert_overlay_invariants(mixes: &MixSet, cap: usize) {
    for mix in mixes.iter() {
        assert!(!mix.is_neighbor(mix.id), "mix {} neighbors itself", mix.id);
        assert!(
            mix.degree() <= cap,
            "mix {} has degree {} above cap {}",
            mix.id,
            mix.degree(),
            cap
        );
        for (&other, &latency) in mix.neighbors() {
            assert_eq!(
                mixes.get(other).neighbor_latency(mix.id),
                Some(latency),
                "edge {}-{} is not symmetric",
                mix.id,
                other
            );
        }
    }
}

/// Acyclic paths and per-group probabilities summing to one
pub(crate) fn assert_path_invariants(mixes: &MixSet) {
    use std::collections::BTreeMap;

    for mix in mixes.iter() {
        let mut sums: BTreeMap<(MixId, MixId), f64> = BTreeMap::new();
        for path in &mix.paths {
            assert!(path.probability > 0.0);
            assert_ne!(path.first_relay, mix.id);
            assert_ne!(path.first_relay, path.rendezvous);
            if let Some(second) = path.second_relay {
                assert_ne!(second, mix.id);
                assert_ne!(second, path.rendezvous);
                assert_ne!(second, path.first_relay);
            }
            *sums.entry((mix.id, path.rendezvous)).or_insert(0.0) += path.probability;
        }
        for (key, sum) in sums {
            assert!((sum - 1.0).abs() < 1e-9, "group {:?} sums to {}", key, sum);
        }
    }
}
