#![forbid(unsafe_code)]

//! The layout solver: ordered identities → slot mapping.
//!
//! # Failure Modes
//!
//! - Duplicate identity in the input sequence → [`ArenaError::DuplicateIdentity`]
//!   (a duplicate would force a z-order tie).
//! - Non-positive fan radius or grid cell → [`ArenaError::PolicyViolation`].
//! - An empty viewport is *not* an error: layouts may overlap or fall outside
//!   the viewport; clipping belongs to the paint layer.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use tabula_core::error::{ArenaError, Result};
use tabula_core::geometry::{Point, Rect, Transform};
use tabula_core::piece::PieceId;

use crate::policy::{FanConfig, GridConfig, LayoutPolicy, StackConfig};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One target placement produced by the solver.
///
/// Slots are produced fresh on every solve and never mutated; a new solve
/// supersedes the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSlot {
    /// Target transform for the eligible piece.
    pub transform: Transform,
    /// Target z-rank; numerically lower renders on top.
    pub z: u32,
}

/// The complete identity → slot mapping for one solve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    slots: FxHashMap<PieceId, LayoutSlot>,
}

impl LayoutResult {
    /// Look up the slot for an identity.
    #[must_use]
    pub fn get(&self, id: &PieceId) -> Option<&LayoutSlot> {
        self.slots.get(id)
    }

    /// Iterate all (identity, slot) pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&PieceId, &LayoutSlot)> {
        self.slots.iter()
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the result is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Compute target slots for an ordered identity sequence.
///
/// Pure and deterministic: identical inputs produce identical mappings.
/// Z-ranks count down with sequence index: the last identity in the
/// sequence carries rank 0 and renders on top under every policy.
///
/// # Errors
///
/// See the module-level failure modes.
pub fn compute_layout(
    ids: &[PieceId],
    policy: &LayoutPolicy,
    viewport: Rect,
) -> Result<LayoutResult> {
    let mut seen = FxHashSet::with_capacity_and_hasher(ids.len(), Default::default());
    for id in ids {
        if !seen.insert(id) {
            return Err(ArenaError::DuplicateIdentity { id: id.clone() });
        }
    }

    let mut slots =
        FxHashMap::with_capacity_and_hasher(ids.len(), Default::default());

    for (index, id) in ids.iter().enumerate() {
        let transform = match policy {
            LayoutPolicy::Fan(config) => fan_transform(config, viewport, index, ids.len())?,
            LayoutPolicy::Stacked(config) => stack_transform(config, viewport, index),
            LayoutPolicy::Grid(config) => grid_transform(config, viewport, index)?,
            LayoutPolicy::FreeForm { positions } => free_form_transform(positions, id, viewport),
        };
        slots.insert(
            id.clone(),
            LayoutSlot {
                transform,
                z: (ids.len() - 1 - index) as u32,
            },
        );
    }

    Ok(LayoutResult { slots })
}

fn fan_transform(
    config: &FanConfig,
    viewport: Rect,
    index: usize,
    count: usize,
) -> Result<Transform> {
    if config.radius <= 0.0 {
        return Err(ArenaError::policy(format!(
            "fan radius must be positive, got {}",
            config.radius
        )));
    }

    // Pivot sits below the viewport so the arc bulges upward into it.
    let pivot = Point::new(viewport.x + viewport.width / 2.0, viewport.bottom() + config.radius);

    let angle = if count <= 1 {
        0.0
    } else {
        let step = config.spread / (count as f32 - 1.0);
        -config.spread / 2.0 + step * index as f32
    };

    let position = Point::new(
        pivot.x + config.radius * angle.sin(),
        pivot.y - config.radius * angle.cos(),
    );

    Ok(Transform::at(position).with_rotation(angle))
}

fn stack_transform(config: &StackConfig, viewport: Rect, index: usize) -> Transform {
    let base = viewport.center();
    Transform::at(base + config.offset.scaled(index as f32))
}

fn grid_transform(config: &GridConfig, viewport: Rect, index: usize) -> Result<Transform> {
    if config.cell.width <= 0.0 || config.cell.height <= 0.0 {
        return Err(ArenaError::policy(format!(
            "grid cell must be positive, got {}x{}",
            config.cell.width, config.cell.height
        )));
    }

    let pitch_x = config.cell.width + config.gap;
    let pitch_y = config.cell.height + config.gap;

    // At least one column even when the viewport is narrower than a cell.
    let columns = (((viewport.width + config.gap) / pitch_x).floor() as usize).max(1);

    let row = index / columns;
    let col = index % columns;

    Ok(Transform::at(Point::new(
        viewport.x + col as f32 * pitch_x,
        viewport.y + row as f32 * pitch_y,
    )))
}

fn free_form_transform(
    positions: &FxHashMap<PieceId, Point>,
    id: &PieceId,
    viewport: Rect,
) -> Transform {
    match positions.get(id) {
        Some(point) => Transform::at(*point),
        // Unpositioned identity: land at the viewport origin. The façade
        // logs this; the solver stays pure.
        None => Transform::at(Point::new(viewport.x, viewport.y)),
    }
}
