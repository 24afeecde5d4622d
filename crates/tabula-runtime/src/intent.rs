#![forbid(unsafe_code)]

//! Outbound intent events and the drop-target policy seam.
//!
//! An [`Intent`] describes a user action's *outcome* for the external model
//! to ratify or reject; the engine never mutates the model itself. The
//! [`DropPolicy`] trait is the inbound half of the same contract: the host
//! decides whether a release point accepts a dragged piece.

use serde::{Deserialize, Serialize};

use tabula_core::geometry::Point;
use tabula_core::piece::PieceId;

// ---------------------------------------------------------------------------
// Intents
// ---------------------------------------------------------------------------

/// Destination context attached to a committed move.
///
/// Produced by the host's [`DropPolicy`]; the engine treats it as opaque and
/// hands it back unchanged in [`Intent::MoveCommitted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropContext {
    /// Host-meaningful zone label (e.g. a pile or slot name).
    pub zone: String,
    /// The release point the decision was made for.
    pub point: Point,
}

impl DropContext {
    /// Create a context for a zone at a release point.
    #[must_use]
    pub fn new(zone: impl Into<String>, point: Point) -> Self {
        Self {
            zone: zone.into(),
            point,
        }
    }
}

/// An event emitted by the interaction layer for the external model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// A press-and-release below the drag dead-zone: plain selection.
    Select(PieceId),
    /// A drag released over an accepting drop target.
    MoveCommitted { id: PieceId, context: DropContext },
    /// A drag that ended without a committed move: rejected drop, explicit
    /// cancel, or the piece vanishing mid-drag.
    MoveCancelled(PieceId),
}

// ---------------------------------------------------------------------------
// Drop policy
// ---------------------------------------------------------------------------

/// The host's verdict on a release point.
#[derive(Debug, Clone, PartialEq)]
pub enum DropDecision {
    /// Accept the move; `context` travels with the committed intent.
    Accept(DropContext),
    /// Reject the move; the piece transitions back to its pre-drag slot.
    Reject,
}

/// Host-supplied drop-target policy, consulted when a drag is released.
pub trait DropPolicy {
    /// Decide whether `id` may land at `point`.
    fn evaluate(&self, id: &PieceId, point: Point) -> DropDecision;
}

/// Policy that accepts every drop into a single named zone.
#[derive(Debug, Clone)]
pub struct AcceptAll {
    zone: String,
}

impl AcceptAll {
    /// Accept everything into `zone`.
    #[must_use]
    pub fn new(zone: impl Into<String>) -> Self {
        Self { zone: zone.into() }
    }
}

impl DropPolicy for AcceptAll {
    fn evaluate(&self, _id: &PieceId, point: Point) -> DropDecision {
        DropDecision::Accept(DropContext::new(self.zone.clone(), point))
    }
}

/// Policy that rejects every drop. The default when the host supplies none:
/// without a model to ratify moves, every drag snaps back.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAll;

impl DropPolicy for RejectAll {
    fn evaluate(&self, _id: &PieceId, _point: Point) -> DropDecision {
        DropDecision::Reject
    }
}
