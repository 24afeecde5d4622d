#![forbid(unsafe_code)]

//! The arena façade: the only surface toolkit glue calls.
//!
//! `apply_model_update` runs solver → scene diff → transition scheduling;
//! `tick` advances transitions once per frame; pointer events feed the drag
//! controller; intents flow out through a subscribed handler or a pollable
//! queue.
//!
//! # Invariants
//!
//! 1. The scene's piece set always equals the most recently applied identity
//!    set (no orphans, no missing pieces).
//! 2. `apply_model_update` is all-or-nothing: every failure path returns
//!    before the first mutation.
//! 3. A piece removed mid-drag yields exactly one `MoveCancelled` and no
//!    dangling transition.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use tabula_core::easing::Easing;
use tabula_core::error::{ArenaError, Result};
use tabula_core::geometry::{Point, Rect, Transform};
use tabula_core::piece::{FaceState, Piece, PieceId, PieceKind};
use tabula_layout::{LayoutPolicy, compute_layout};
use tabula_scene::{KindMetrics, SceneGraph, TransitionScheduler};

use crate::drag::{DragConfig, DragController, DragOutcome};
use crate::intent::{DropPolicy, Intent, RejectAll};

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// One piece's authoritative state in a model update.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceUpdate {
    pub id: PieceId,
    pub kind: PieceKind,
    pub face: FaceState,
}

impl PieceUpdate {
    /// Convenience constructor.
    #[must_use]
    pub fn new(id: PieceId, kind: PieceKind, face: FaceState) -> Self {
        Self { id, kind, face }
    }
}

/// What one `apply_model_update` did, for host-side logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    pub inserted: usize,
    pub removed: usize,
    pub moved: usize,
}

/// Read-only per-piece state sufficient to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub kind: PieceKind,
    pub face: FaceState,
    pub transform: Transform,
    pub z: u32,
}

/// Timing and interaction knobs for one arena.
#[derive(Debug, Clone, Copy)]
pub struct ArenaConfig {
    /// Duration of layout transitions.
    pub transition_duration: Duration,
    /// Easing applied to layout transitions.
    pub easing: Easing,
    /// Drag recognition thresholds.
    pub drag: DragConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            transition_duration: Duration::from_millis(200),
            easing: Easing::EaseInOut,
            drag: DragConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// A bounded viewport and its managed collection of visual pieces.
pub struct Arena {
    viewport: Rect,
    config: ArenaConfig,
    scene: SceneGraph,
    scheduler: TransitionScheduler,
    drag: DragController,
    order: Vec<PieceId>,
    policy: LayoutPolicy,
    drop_policy: Box<dyn DropPolicy>,
    handler: Option<Box<dyn FnMut(Intent)>>,
    queue: VecDeque<Intent>,
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("viewport", &self.viewport)
            .field("pieces", &self.scene.len())
            .field("transitions", &self.scheduler.len())
            .field("dragging", &self.drag.is_dragging())
            .finish_non_exhaustive()
    }
}

impl Arena {
    /// Create an arena with default configuration.
    #[must_use]
    pub fn new(viewport: Rect, metrics: KindMetrics) -> Self {
        Self::with_config(viewport, metrics, ArenaConfig::default())
    }

    /// Create an arena with explicit configuration.
    #[must_use]
    pub fn with_config(viewport: Rect, metrics: KindMetrics, config: ArenaConfig) -> Self {
        Self {
            viewport,
            scene: SceneGraph::new(metrics),
            scheduler: TransitionScheduler::new(),
            drag: DragController::new(config.drag),
            config,
            order: Vec::new(),
            policy: LayoutPolicy::default(),
            drop_policy: Box::new(RejectAll),
            handler: None,
            queue: VecDeque::new(),
        }
    }

    /// Viewport bounds.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Authoritative model order as of the last applied update.
    #[must_use]
    pub fn order(&self) -> &[PieceId] {
        &self.order
    }

    /// Current layout policy.
    #[must_use]
    pub fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    /// Borrow a piece record.
    #[must_use]
    pub fn piece(&self, id: &PieceId) -> Option<&Piece> {
        self.scene.piece(id)
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Number of transitions currently in flight.
    #[must_use]
    pub fn transitions_in_flight(&self) -> usize {
        self.scheduler.len()
    }

    /// Topmost piece under a point, matching the rendered frame.
    ///
    /// The dragged piece, if any, is tested at its pointer-tracking preview
    /// (where it is drawn, on top), not at its authoritative transform.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&PieceId> {
        if let Some((id, rendered)) = self.drag.preview() {
            if let Some(piece) = self.scene.piece(id) {
                let bounds = rendered.bounds(self.scene.metrics().size_of(piece.kind));
                if bounds.contains(point) {
                    return Some(id);
                }
                return self.scene.hit_test_excluding(point, Some(id));
            }
        }
        self.scene.hit_test(point)
    }

    /// Install the host's drop-target policy.
    pub fn set_drop_policy(&mut self, policy: impl DropPolicy + 'static) {
        self.drop_policy = Box::new(policy);
    }

    /// Subscribe to intent events. Replaces any previous handler; intents
    /// queued before subscription stay in the poll queue.
    pub fn on_intent(&mut self, handler: impl FnMut(Intent) + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Drain intents accumulated while no handler was subscribed.
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        self.queue.drain(..).collect()
    }

    fn emit(&mut self, intent: Intent) {
        match self.handler.as_mut() {
            Some(handler) => handler(intent),
            None => self.queue.push_back(intent),
        }
    }

    // -----------------------------------------------------------------------
    // Model updates
    // -----------------------------------------------------------------------

    /// Apply an authoritative model update.
    ///
    /// Creates pieces whose identity is new (spawned directly at their
    /// slot), removes pieces absent from the update (force-cancelling any
    /// drag on them), updates face state, and schedules transitions for
    /// every piece whose target moved.
    ///
    /// # Errors
    ///
    /// Solver errors ([`ArenaError::DuplicateIdentity`],
    /// [`ArenaError::PolicyViolation`]) are returned before any state
    /// changes; the scene keeps its prior consistent state.
    pub fn apply_model_update(
        &mut self,
        updates: &[PieceUpdate],
        policy: LayoutPolicy,
        now: Instant,
    ) -> Result<UpdateSummary> {
        let ids: Vec<PieceId> = updates.iter().map(|u| u.id.clone()).collect();
        let layout = compute_layout(&ids, &policy, self.viewport)?;

        if let LayoutPolicy::FreeForm { positions } = &policy {
            for id in ids.iter().filter(|id| !positions.contains_key(*id)) {
                warn!(piece = %id, "free-form layout missing a position; using viewport origin");
            }
        }

        let mut summary = UpdateSummary::default();

        // Removals first: a drag must never outlive its piece.
        let keep: FxHashSet<&PieceId> = ids.iter().collect();
        let stale: Vec<PieceId> = self
            .order
            .iter()
            .filter(|id| !keep.contains(*id))
            .cloned()
            .collect();
        for id in &stale {
            if self.drag.notify_removed(id) {
                self.emit(Intent::MoveCancelled(id.clone()));
            }
            self.scheduler.cancel(id);
            self.scene.remove(id)?;
            summary.removed += 1;
        }

        // Insertions and face updates.
        for update in updates {
            if self.scene.contains(&update.id) {
                self.scene.set_face(&update.id, update.face)?;
            } else {
                // Slot presence is guaranteed: the layout was solved for
                // exactly these identities.
                let slot = layout.get(&update.id).copied().ok_or_else(|| {
                    ArenaError::policy(format!("no slot for inserted piece {}", update.id))
                })?;
                self.scene.insert(Piece::new(
                    update.id.clone(),
                    update.kind,
                    update.face,
                    slot.transform,
                    slot.z,
                ))?;
                summary.inserted += 1;
            }
        }

        // Diff targets and animate the movers.
        let diffs = self.scene.apply_layout(&layout)?;
        summary.moved = diffs.len();
        for diff in diffs {
            self.scheduler.begin(
                diff.id,
                diff.old,
                diff.new,
                self.config.transition_duration,
                self.config.easing,
                now,
            );
        }

        self.order = ids;
        self.policy = policy;
        debug!(
            inserted = summary.inserted,
            removed = summary.removed,
            moved = summary.moved,
            "model update applied"
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Frame tick
    // -----------------------------------------------------------------------

    /// Advance transitions once per render tick.
    ///
    /// Completed transitions pin their piece exactly to its target.
    pub fn tick(&mut self, now: Instant) {
        for (id, update) in self.scheduler.advance(now) {
            // Removals cancel transitions, so this only misses if the two
            // structures fall out of sync; report rather than crash.
            if self.scene.set_transform(&id, update.transform).is_err() {
                warn!(piece = %id, "transition targeted a piece no longer in the scene");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// Pointer pressed at a point.
    pub fn pointer_pressed(&mut self, point: Point) {
        self.drag.on_press(point, &self.scene);
    }

    /// Pointer moved to a point.
    pub fn pointer_moved(&mut self, point: Point) {
        self.drag.on_move(point);
    }

    /// Pointer released at a point.
    ///
    /// Resolves the interaction: emits `Select`, `MoveCommitted` (pinning
    /// the manual position so the next model update animates from it), or
    /// `MoveCancelled` (scheduling the return transition).
    ///
    /// # Errors
    ///
    /// [`ArenaError::UnknownIdentity`] if a commit decision referenced a
    /// piece no longer in the scene. The drag resolves to cancelled and the
    /// intent stream stays consistent; the error is the report to the model
    /// layer.
    pub fn pointer_released(&mut self, point: Point, now: Instant) -> Result<()> {
        match self.drag.on_release(point, self.drop_policy.as_ref()) {
            DragOutcome::None => Ok(()),
            DragOutcome::Selected(id) => {
                self.emit(Intent::Select(id));
                Ok(())
            }
            DragOutcome::Committed {
                id,
                context,
                rendered,
            } => {
                if self.scene.contains(&id) {
                    // Pin the manual position (transform and target), so the
                    // next model update's layout supersedes it with a normal
                    // transition.
                    self.scene.pin_manual(&id, rendered)?;
                    self.scheduler.cancel(&id);
                    self.emit(Intent::MoveCommitted { id, context });
                    Ok(())
                } else {
                    warn!(piece = %id, "commit decision for unknown identity; cancelling");
                    self.emit(Intent::MoveCancelled(id.clone()));
                    Err(ArenaError::UnknownIdentity { id })
                }
            }
            DragOutcome::Cancelled {
                id,
                rendered,
                origin,
            } => {
                self.emit(Intent::MoveCancelled(id.clone()));
                // Animate back to the authoritative slot. If a model update
                // re-targeted the piece mid-drag, the live target wins over
                // the stale pre-drag origin.
                let back_to = self.scene.target(&id).unwrap_or(origin);
                if self.scene.contains(&id) {
                    // The visible start is the drag preview, not any
                    // in-flight transition's sample; drop that first so the
                    // supersede rule cannot reintroduce a snap.
                    self.scheduler.cancel(&id);
                    self.scheduler.begin(
                        id,
                        rendered,
                        back_to,
                        self.config.transition_duration,
                        self.config.easing,
                        now,
                    );
                }
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Render snapshot
    // -----------------------------------------------------------------------

    /// Per-piece state in paint order: bottom first, topmost (z rank 0) last.
    ///
    /// The dragged piece, if any, is rendered at the pointer and hoisted to
    /// the top without touching authoritative state; snapshot `z` ranks are
    /// re-derived so they agree with the hoisted order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PieceSnapshot> {
        let mut snapshots: Vec<PieceSnapshot> = self
            .scene
            .pieces_by_z()
            .into_iter()
            .map(|p| PieceSnapshot {
                id: p.id.clone(),
                kind: p.kind,
                face: p.face,
                transform: p.transform,
                z: p.z,
            })
            .collect();

        if let Some((dragged, rendered)) = self.drag.preview() {
            if let Some(index) = snapshots.iter().position(|s| &s.id == dragged) {
                let mut snapshot = snapshots.remove(index);
                snapshot.transform = rendered;
                snapshots.push(snapshot);
                let count = snapshots.len();
                for (i, snapshot) in snapshots.iter_mut().enumerate() {
                    snapshot.z = (count - 1 - i) as u32;
                }
            }
        }

        snapshots
    }
}
