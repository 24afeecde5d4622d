#![forbid(unsafe_code)]

//! Drag interaction state machine.
//!
//! One potential drag at a time:
//! `Idle → Armed(id) → Dragging(id) → {committed | cancelled} → Idle`.
//!
//! # Invariants
//!
//! 1. A release below the dead-zone threshold is a plain selection; a drag
//!    and a selection never both come out of one press/release pair.
//! 2. While dragging, only the *rendered* transform tracks the pointer; the
//!    scene's authoritative transform is untouched until commit, so layout
//!    recomputation mid-drag does not fight the user's hand.
//! 3. A drag never outlives its piece: [`DragController::notify_removed`]
//!    force-cancels before the removal completes.
//!
//! # Failure Modes
//!
//! - Press with a drag already in progress: ignored (single-pointer model).
//! - Move/release with no armed piece: no-op, [`DragOutcome::None`].

use tracing::debug;

use tabula_core::geometry::{Point, Transform, Vec2};
use tabula_core::piece::PieceId;
use tabula_scene::SceneGraph;

use crate::intent::{DropContext, DropDecision, DropPolicy};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for drag recognition.
#[derive(Debug, Clone, Copy)]
pub struct DragConfig {
    /// Euclidean distance the pointer must travel from the press point
    /// before a drag starts (default: 4.0 arena units).
    pub dead_zone: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self { dead_zone: 4.0 }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    /// Pressed on a piece, pointer still inside the dead zone.
    Armed {
        id: PieceId,
        press: Point,
        grab: Vec2,
        origin: Transform,
    },
    /// Past the dead zone; the piece renders under the pointer.
    Dragging {
        id: PieceId,
        grab: Vec2,
        origin: Transform,
        pointer: Point,
    },
}

/// How a release (or forced cancel) resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Nothing was armed.
    None,
    /// Released inside the dead zone: plain selection.
    Selected(PieceId),
    /// Released past the dead zone over an accepting drop target.
    /// `rendered` is the piece's on-screen transform at release, to be
    /// pinned into the scene as the committed manual position.
    Committed {
        id: PieceId,
        context: DropContext,
        rendered: Transform,
    },
    /// Released past the dead zone and rejected (or cancelled). `rendered`
    /// is where the piece was drawn; `origin` is the pre-drag authoritative
    /// transform to animate back to.
    Cancelled {
        id: PieceId,
        rendered: Transform,
        origin: Transform,
    },
}

/// Turns pointer input into selection and drag decisions.
#[derive(Debug, Default)]
pub struct DragController {
    config: DragConfig,
    phase: Phase,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

impl DragController {
    /// Create a controller with the given thresholds.
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Whether a drag is in progress (past the dead zone).
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The identity being dragged, if any.
    #[must_use]
    pub fn dragged_id(&self) -> Option<&PieceId> {
        match &self.phase {
            Phase::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The dragged piece's rendered transform, tracking the pointer.
    #[must_use]
    pub fn preview(&self) -> Option<(&PieceId, Transform)> {
        match &self.phase {
            Phase::Dragging {
                id,
                grab,
                origin,
                pointer,
            } => {
                let mut rendered = *origin;
                rendered.position = *pointer - *grab;
                Some((id, rendered))
            }
            _ => None,
        }
    }

    /// Pointer pressed: hit-test the scene and arm the topmost piece.
    pub fn on_press(&mut self, point: Point, scene: &SceneGraph) {
        if !matches!(self.phase, Phase::Idle) {
            return;
        }
        let Some(id) = scene.hit_test(point) else {
            return;
        };
        // Hit-test guarantees presence.
        let Some(piece) = scene.piece(id) else {
            return;
        };
        self.phase = Phase::Armed {
            id: id.clone(),
            press: point,
            grab: point - piece.transform.position,
            origin: piece.transform,
        };
    }

    /// Pointer moved: cross the dead zone or track the drag.
    pub fn on_move(&mut self, point: Point) {
        if let Phase::Dragging { pointer, .. } = &mut self.phase {
            *pointer = point;
            return;
        }

        let crossed = matches!(
            &self.phase,
            Phase::Armed { press, .. } if press.distance(point) >= self.config.dead_zone
        );
        if crossed {
            if let Phase::Armed {
                id, grab, origin, ..
            } = std::mem::take(&mut self.phase)
            {
                debug!(piece = %id, "drag started");
                self.phase = Phase::Dragging {
                    id,
                    grab,
                    origin,
                    pointer: point,
                };
            }
        }
    }

    /// Pointer released: resolve to selection, commit, or cancel.
    pub fn on_release(&mut self, point: Point, policy: &dyn DropPolicy) -> DragOutcome {
        match std::mem::take(&mut self.phase) {
            Phase::Idle => DragOutcome::None,
            Phase::Armed { id, .. } => DragOutcome::Selected(id),
            Phase::Dragging {
                id, grab, origin, ..
            } => {
                let mut rendered = origin;
                rendered.position = point - grab;
                match policy.evaluate(&id, point) {
                    DropDecision::Accept(context) => {
                        debug!(piece = %id, zone = %context.zone, "drag committed");
                        DragOutcome::Committed {
                            id,
                            context,
                            rendered,
                        }
                    }
                    DropDecision::Reject => {
                        debug!(piece = %id, "drag rejected");
                        DragOutcome::Cancelled {
                            id,
                            rendered,
                            origin,
                        }
                    }
                }
            }
        }
    }

    /// The piece was removed externally. Force-cancels any drag on it.
    ///
    /// Returns `true` if a started drag was cancelled (the caller must emit
    /// `MoveCancelled`); an armed-but-not-dragging press resets silently.
    pub fn notify_removed(&mut self, id: &PieceId) -> bool {
        match &self.phase {
            Phase::Armed { id: armed, .. } if armed == id => {
                self.phase = Phase::Idle;
                false
            }
            Phase::Dragging { id: dragged, .. } if dragged == id => {
                debug!(piece = %id, "drag force-cancelled by removal");
                self.phase = Phase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Reset to idle without reporting anything.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }
}
