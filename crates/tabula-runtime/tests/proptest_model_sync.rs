//! Property test: under arbitrary update sequences, the scene's piece set
//! always equals the most recently applied identity set — no orphans, no
//! missing pieces — and z-ranks stay a total order without ties.

use std::time::Instant;

use proptest::prelude::*;
use rustc_hash::FxHashSet;
use tabula_core::geometry::{Rect, Size};
use tabula_core::piece::{FaceState, PieceId, PieceKind};
use tabula_layout::{FanConfig, GridConfig, LayoutPolicy, StackConfig};
use tabula_runtime::{Arena, PieceUpdate};
use tabula_scene::KindMetrics;

/// Small identity universe so update batches overlap heavily.
const UNIVERSE: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fn arb_batch() -> impl Strategy<Value = Vec<PieceUpdate>> {
    prop::collection::hash_set(0usize..UNIVERSE.len(), 0..UNIVERSE.len()).prop_map(|picked| {
        let mut indices: Vec<usize> = picked.into_iter().collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .map(|i| {
                PieceUpdate::new(
                    PieceId::new(UNIVERSE[i]).expect("non-empty"),
                    PieceKind::Card,
                    FaceState::FaceUp,
                )
            })
            .collect()
    })
}

fn arb_policy() -> impl Strategy<Value = LayoutPolicy> {
    prop_oneof![
        Just(LayoutPolicy::Fan(FanConfig::default())),
        Just(LayoutPolicy::Stacked(StackConfig::default())),
        Just(LayoutPolicy::Grid(GridConfig::default())),
    ]
}

proptest! {
    #[test]
    fn scene_set_equals_latest_update(
        batches in prop::collection::vec((arb_batch(), arb_policy()), 1..12),
    ) {
        let mut arena = Arena::new(
            Rect::from_size(400.0, 200.0),
            KindMetrics::new(Size::new(40.0, 60.0)),
        );
        let t0 = Instant::now();

        for (batch, policy) in batches {
            arena.apply_model_update(&batch, policy, t0).unwrap();

            let expected: FxHashSet<&str> = batch.iter().map(|u| u.id.as_str()).collect();
            let snapshot = arena.snapshot();
            let actual: FxHashSet<&str> = snapshot.iter().map(|s| s.id.as_str()).collect();
            prop_assert_eq!(&actual, &expected);
            prop_assert_eq!(snapshot.len(), expected.len());

            // Total z order, no ties; paint order is z descending with the
            // topmost piece (rank 0) last.
            let mut ranks = FxHashSet::default();
            let mut prev: Option<u32> = None;
            for s in &snapshot {
                prop_assert!(ranks.insert(s.z), "duplicate z {}", s.z);
                if let Some(p) = prev {
                    prop_assert!(s.z < p, "snapshot not in paint order");
                }
                prev = Some(s.z);
            }
            if let Some(top) = snapshot.last() {
                prop_assert_eq!(top.z, 0);
            }
        }
    }
}
