#![forbid(unsafe_code)]

//! The authoritative scene graph.
//!
//! # Invariants
//!
//! 1. Exactly one record per identity: inserts of a present identity and
//!    removals of an absent one are rejected, never silently merged.
//! 2. Z-ranks are re-derived wholesale by [`SceneGraph::apply_layout`], so
//!    they always form the solver's total order (no ties).
//! 3. Hit-testing uses each piece's *current* transform, so during a
//!    transition the test matches what is visually rendered, not the target.
//!
//! # Failure Modes
//!
//! - A layout result that does not cover the scene's identity set exactly is
//!   a policy violation; the scene is left untouched (no partial
//!   application).

use rustc_hash::FxHashMap;
use tracing::debug;

use tabula_core::error::{ArenaError, Result};
use tabula_core::geometry::{Point, Transform};
use tabula_core::piece::{FaceState, Piece, PieceId};
use tabula_layout::LayoutResult;

use crate::metrics::KindMetrics;

/// One entry: the piece record plus its current layout target.
///
/// The target is tracked separately from the (possibly mid-transition)
/// current transform so layout diffing compares targets, not render state.
#[derive(Debug, Clone)]
struct Entry {
    piece: Piece,
    target: Transform,
}

/// A piece whose layout target changed in the latest applied layout.
///
/// `old` is the piece's current (rendered) transform — the correct start for
/// a transition — and `new` is the fresh target.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotDiff {
    pub id: PieceId,
    pub old: Transform,
    pub new: Transform,
}

/// Owner of the authoritative piece set.
#[derive(Debug, Default)]
pub struct SceneGraph {
    entries: FxHashMap<PieceId, Entry>,
    metrics: KindMetrics,
}

impl SceneGraph {
    /// Create an empty scene with the given footprint table.
    #[must_use]
    pub fn new(metrics: KindMetrics) -> Self {
        Self {
            entries: FxHashMap::default(),
            metrics,
        }
    }

    /// Number of pieces in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an identity is present.
    #[must_use]
    pub fn contains(&self, id: &PieceId) -> bool {
        self.entries.contains_key(id)
    }

    /// Borrow a piece record.
    #[must_use]
    pub fn piece(&self, id: &PieceId) -> Option<&Piece> {
        self.entries.get(id).map(|e| &e.piece)
    }

    /// The footprint table used for hit-testing.
    #[must_use]
    pub fn metrics(&self) -> &KindMetrics {
        &self.metrics
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Insert a new piece. Its current transform becomes its initial target.
    ///
    /// # Errors
    ///
    /// [`ArenaError::DuplicateIdentity`] if the identity is already present.
    pub fn insert(&mut self, piece: Piece) -> Result<()> {
        if self.entries.contains_key(&piece.id) {
            return Err(ArenaError::DuplicateIdentity {
                id: piece.id.clone(),
            });
        }
        debug!(piece = %piece.id, kind = ?piece.kind, "piece inserted");
        let target = piece.transform;
        self.entries.insert(piece.id.clone(), Entry { piece, target });
        Ok(())
    }

    /// Remove a piece, returning its final record.
    ///
    /// Callers owning an interaction controller must cancel any drag on this
    /// identity *before* removal completes; the façade enforces that order.
    ///
    /// # Errors
    ///
    /// [`ArenaError::UnknownIdentity`] if the identity is absent.
    pub fn remove(&mut self, id: &PieceId) -> Result<Piece> {
        match self.entries.remove(id) {
            Some(entry) => {
                debug!(piece = %id, "piece removed");
                Ok(entry.piece)
            }
            None => Err(ArenaError::UnknownIdentity { id: id.clone() }),
        }
    }

    /// Overwrite a piece's current (rendered) transform.
    ///
    /// Used by the tick loop to apply interpolated transition frames, and at
    /// drag commit to pin the manual position.
    ///
    /// # Errors
    ///
    /// [`ArenaError::UnknownIdentity`] if the identity is absent.
    pub fn set_transform(&mut self, id: &PieceId, transform: Transform) -> Result<()> {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.piece.transform = transform;
                Ok(())
            }
            None => Err(ArenaError::UnknownIdentity { id: id.clone() }),
        }
    }

    /// Pin a manual placement: both the current transform and the layout
    /// target move to `transform`.
    ///
    /// Used at drag commit. Because the target moves too, the next applied
    /// layout diffs against the manual position and supersedes it with a
    /// normal transition.
    ///
    /// # Errors
    ///
    /// [`ArenaError::UnknownIdentity`] if the identity is absent.
    pub fn pin_manual(&mut self, id: &PieceId, transform: Transform) -> Result<()> {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.piece.transform = transform;
                entry.target = transform;
                Ok(())
            }
            None => Err(ArenaError::UnknownIdentity { id: id.clone() }),
        }
    }

    /// A piece's current layout target (equal to its transform when no
    /// transition is in flight).
    #[must_use]
    pub fn target(&self, id: &PieceId) -> Option<Transform> {
        self.entries.get(id).map(|e| e.target)
    }

    /// Update a piece's face state.
    ///
    /// # Errors
    ///
    /// [`ArenaError::UnknownIdentity`] if the identity is absent.
    pub fn set_face(&mut self, id: &PieceId, face: FaceState) -> Result<()> {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.piece.face = face;
                Ok(())
            }
            None => Err(ArenaError::UnknownIdentity { id: id.clone() }),
        }
    }

    // -----------------------------------------------------------------------
    // Layout application
    // -----------------------------------------------------------------------

    /// Apply a fresh layout: re-rank z atomically and report target changes.
    ///
    /// Validation happens before any mutation, so on error the scene retains
    /// its prior consistent state.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::UnknownIdentity`] if the result names an identity the
    ///   scene does not contain.
    /// - [`ArenaError::PolicyViolation`] if the result fails to cover every
    ///   scene identity (a partial layout would leave stale z-ranks).
    pub fn apply_layout(&mut self, layout: &LayoutResult) -> Result<Vec<SlotDiff>> {
        for (id, _) in layout.iter() {
            if !self.entries.contains_key(id) {
                return Err(ArenaError::UnknownIdentity { id: id.clone() });
            }
        }
        if layout.len() != self.entries.len() {
            return Err(ArenaError::policy(format!(
                "layout covers {} of {} pieces",
                layout.len(),
                self.entries.len()
            )));
        }

        let mut diffs = Vec::new();
        for (id, slot) in layout.iter() {
            // Presence checked above.
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            if entry.target != slot.transform {
                diffs.push(SlotDiff {
                    id: id.clone(),
                    old: entry.piece.transform,
                    new: slot.transform,
                });
                entry.target = slot.transform;
            }
            entry.piece.z = slot.z;
        }

        debug!(moved = diffs.len(), total = self.entries.len(), "layout applied");
        Ok(diffs)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Topmost piece whose current bounds contain the point.
    ///
    /// Bounds come from the piece's *current* interpolated transform and its
    /// kind footprint, so mid-transition hit-tests match the rendered frame.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&PieceId> {
        self.hit_test_excluding(point, None)
    }

    /// Hit test that ignores one identity.
    ///
    /// Used while that piece is rendered somewhere other than its
    /// authoritative transform (under the pointer during a drag).
    #[must_use]
    pub fn hit_test_excluding(&self, point: Point, skip: Option<&PieceId>) -> Option<&PieceId> {
        self.entries
            .values()
            .filter(|e| skip != Some(&e.piece.id))
            .filter(|e| {
                e.piece
                    .transform
                    .bounds(self.metrics.size_of(e.piece.kind))
                    .contains(point)
            })
            .min_by_key(|e| e.piece.z)
            .map(|e| &e.piece.id)
    }

    /// All pieces in paint order: z descending, topmost (rank 0) last.
    #[must_use]
    pub fn pieces_by_z(&self) -> Vec<&Piece> {
        let mut pieces: Vec<&Piece> = self.entries.values().map(|e| &e.piece).collect();
        pieces.sort_by_key(|p| std::cmp::Reverse(p.z));
        pieces
    }
}

#[cfg(test)]
mod tests {
    use super::SceneGraph;
    use crate::metrics::KindMetrics;
    use rustc_hash::FxHashMap;
    use tabula_core::error::ArenaError;
    use tabula_core::geometry::{Point, Rect, Size, Transform};
    use tabula_core::piece::{FaceState, Piece, PieceId, PieceKind};
    use tabula_layout::policy::LayoutPolicy;
    use tabula_layout::solver::compute_layout;

    fn scene() -> SceneGraph {
        SceneGraph::new(KindMetrics::new(Size::new(40.0, 60.0)))
    }

    fn piece(name: &str, x: f32, y: f32, z: u32) -> Piece {
        Piece::new(
            PieceId::new(name).unwrap(),
            PieceKind::Card,
            FaceState::FaceUp,
            Transform::at(Point::new(x, y)),
            z,
        )
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut scene = scene();
        scene.insert(piece("a", 0.0, 0.0, 0)).unwrap();
        assert!(matches!(
            scene.insert(piece("a", 1.0, 1.0, 1)),
            Err(ArenaError::DuplicateIdentity { .. })
        ));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn remove_unknown_is_reported() {
        let mut scene = scene();
        assert!(matches!(
            scene.remove(&PieceId::new("ghost").unwrap()),
            Err(ArenaError::UnknownIdentity { .. })
        ));
    }

    #[test]
    fn hit_test_returns_topmost() {
        let mut scene = scene();
        scene.insert(piece("bottom", 0.0, 0.0, 1)).unwrap();
        scene.insert(piece("top", 10.0, 10.0, 0)).unwrap();
        // (15, 15) is inside both footprints; top wins by rank.
        assert_eq!(
            scene.hit_test(Point::new(15.0, 15.0)).unwrap().as_str(),
            "top"
        );
        // (5, 5) only hits bottom.
        assert_eq!(
            scene.hit_test(Point::new(5.0, 5.0)).unwrap().as_str(),
            "bottom"
        );
        assert!(scene.hit_test(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn hit_test_excluding_skips_the_named_piece() {
        let mut scene = scene();
        scene.insert(piece("bottom", 0.0, 0.0, 1)).unwrap();
        scene.insert(piece("top", 10.0, 10.0, 0)).unwrap();
        let top = PieceId::new("top").unwrap();
        assert_eq!(
            scene
                .hit_test_excluding(Point::new(15.0, 15.0), Some(&top))
                .unwrap()
                .as_str(),
            "bottom"
        );
        // (45, 65) lies only inside "top"'s footprint.
        assert!(
            scene
                .hit_test_excluding(Point::new(45.0, 65.0), Some(&top))
                .is_none()
        );
    }

    #[test]
    fn apply_layout_diffs_only_moved_targets() {
        let mut scene = scene();
        let a = PieceId::new("a").unwrap();
        let b = PieceId::new("b").unwrap();
        scene.insert(piece("a", 0.0, 0.0, 0)).unwrap();
        scene.insert(piece("b", 42.0, 17.0, 1)).unwrap();

        // Free-form layout that keeps "b" in place and moves "a".
        let mut positions = FxHashMap::default();
        positions.insert(a.clone(), Point::new(100.0, 0.0));
        positions.insert(b.clone(), Point::new(42.0, 17.0));
        let layout = compute_layout(
            &[a.clone(), b.clone()],
            &LayoutPolicy::FreeForm { positions },
            Rect::from_size(300.0, 100.0),
        )
        .unwrap();

        let diffs = scene.apply_layout(&layout).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].id, a);
        assert_eq!(diffs[0].old, Transform::at(Point::new(0.0, 0.0)));
        assert_eq!(diffs[0].new, Transform::at(Point::new(100.0, 0.0)));

        // Z re-ranked for everyone: "b" is last in sequence, so on top.
        assert_eq!(scene.piece(&a).unwrap().z, 1);
        assert_eq!(scene.piece(&b).unwrap().z, 0);
    }

    #[test]
    fn partial_layout_leaves_scene_untouched() {
        let mut scene = scene();
        let a = PieceId::new("a").unwrap();
        scene.insert(piece("a", 0.0, 0.0, 3)).unwrap();
        scene.insert(piece("b", 10.0, 0.0, 4)).unwrap();

        let layout = compute_layout(
            std::slice::from_ref(&a),
            &LayoutPolicy::default(),
            Rect::from_size(300.0, 100.0),
        )
        .unwrap();

        assert!(matches!(
            scene.apply_layout(&layout),
            Err(ArenaError::PolicyViolation { .. })
        ));
        // Prior z survives the rejected application.
        assert_eq!(scene.piece(&a).unwrap().z, 3);
    }

    #[test]
    fn layout_naming_stranger_is_unknown_identity() {
        let mut scene = scene();
        scene.insert(piece("a", 0.0, 0.0, 0)).unwrap();
        let stranger = PieceId::new("stranger").unwrap();
        let layout = compute_layout(
            &[stranger],
            &LayoutPolicy::default(),
            Rect::from_size(300.0, 100.0),
        )
        .unwrap();
        assert!(matches!(
            scene.apply_layout(&layout),
            Err(ArenaError::UnknownIdentity { .. })
        ));
    }

    #[test]
    fn pieces_by_z_is_paint_order() {
        let mut scene = scene();
        scene.insert(piece("c", 0.0, 0.0, 0)).unwrap();
        scene.insert(piece("a", 0.0, 0.0, 2)).unwrap();
        scene.insert(piece("b", 0.0, 0.0, 1)).unwrap();
        // Bottom (highest rank) painted first, topmost (rank 0) last.
        let order: Vec<&str> = scene.pieces_by_z().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, ["a", "b", "c"]);
    }
}
