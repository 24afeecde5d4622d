#![forbid(unsafe_code)]

//! Transition scheduler: time-based interpolation of piece transforms.
//!
//! # Invariants
//!
//! 1. At most one active transition per identity (last-writer-wins; no
//!    per-piece queuing).
//! 2. Superseding an in-flight transition starts from its *current
//!    interpolated* transform, never the stale original start, so there is
//!    no visual snap.
//! 3. A completed transition pins the transform exactly to its target; no
//!    residual float drift survives completion.
//!
//! # Failure Modes
//!
//! - Zero duration: the transition completes (and pins) on the next
//!   `advance`, same as a duration that has already elapsed.
//! - `advance` with a `now` earlier than a transition's start clamps
//!   progress to zero rather than extrapolating backwards.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::trace;

use tabula_core::easing::Easing;
use tabula_core::geometry::Transform;
use tabula_core::piece::PieceId;

/// One in-flight interpolation.
#[derive(Debug, Clone, Copy)]
struct Active {
    from: Transform,
    to: Transform,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl Active {
    /// Normalized progress at `now`, clamped to [0, 1].
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        t.clamp(0.0, 1.0)
    }

    /// Interpolated transform at `now`; exactly `to` at completion.
    fn sample(&self, now: Instant) -> Transform {
        let t = self.progress(now);
        if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(self.to, self.easing.eval(t))
        }
    }

    fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// One frame's output for one piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionUpdate {
    pub transform: Transform,
    /// True exactly once, on the frame the transition completes.
    pub completed: bool,
}

/// Drives all active transitions. Owned by the arena's tick loop.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    active: FxHashMap<PieceId, Active>,
}

impl TransitionScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or supersede) the transition for an identity.
    ///
    /// If a transition is already in flight for `id`, its current
    /// interpolated transform at `now` replaces `from`.
    pub fn begin(
        &mut self,
        id: PieceId,
        from: Transform,
        to: Transform,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) {
        let from = match self.active.get(&id) {
            Some(existing) => existing.sample(now),
            None => from,
        };
        trace!(piece = %id, ?duration, "transition begun");
        self.active.insert(
            id,
            Active {
                from,
                to,
                start: now,
                duration,
                easing,
            },
        );
    }

    /// Cancel the transition for an identity, if any.
    ///
    /// Returns whether one was active.
    pub fn cancel(&mut self, id: &PieceId) -> bool {
        self.active.remove(id).is_some()
    }

    /// Whether an identity has an in-flight transition.
    #[must_use]
    pub fn is_active(&self, id: &PieceId) -> bool {
        self.active.contains_key(id)
    }

    /// Number of in-flight transitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no transitions are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Sample one identity's interpolated transform without advancing.
    #[must_use]
    pub fn sample(&self, id: &PieceId, now: Instant) -> Option<Transform> {
        self.active.get(id).map(|a| a.sample(now))
    }

    /// Advance all transitions to `now`.
    ///
    /// Returns one update per active transition; completed ones are removed
    /// and their update carries the exact target transform.
    pub fn advance(&mut self, now: Instant) -> Vec<(PieceId, TransitionUpdate)> {
        let mut updates = Vec::with_capacity(self.active.len());
        for (id, active) in &self.active {
            let completed = active.is_complete(now);
            updates.push((
                id.clone(),
                TransitionUpdate {
                    transform: active.sample(now),
                    completed,
                },
            ));
        }
        self.active.retain(|_, a| !a.is_complete(now));
        updates
    }
}
