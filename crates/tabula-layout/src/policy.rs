#![forbid(unsafe_code)]

//! Named layout strategies and their tuning knobs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use tabula_core::geometry::{Point, Size, Vec2};
use tabula_core::piece::PieceId;

/// A named strategy mapping an ordered piece sequence to target transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutPolicy {
    /// Positions along an arc, used for hand-like displays.
    Fan(FanConfig),
    /// All pieces share a base position; z differs by index.
    Stacked(StackConfig),
    /// Row/column wrap at viewport width.
    Grid(GridConfig),
    /// Host-specified position per identity. Identities missing from the
    /// map land at the viewport origin.
    FreeForm {
        positions: FxHashMap<PieceId, Point>,
    },
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self::Grid(GridConfig::default())
    }
}

/// Arc placement for hand-like fans.
///
/// Pieces sit on a circle of `radius` whose pivot is centered horizontally
/// below the viewport; `spread` is the total arc angle in radians, and each
/// piece is rotated tangent to the arc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanConfig {
    /// Arc radius in arena units.
    pub radius: f32,
    /// Total arc angle in radians across all pieces.
    pub spread: f32,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            radius: 240.0,
            spread: 1.0,
        }
    }
}

/// Offset stacking: piece `i` sits at `base + offset * i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Per-index offset from the viewport center.
    pub offset: Vec2,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            offset: Vec2::new(2.0, 2.0),
        }
    }
}

/// Row/column placement wrapping at the viewport's right edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cell footprint each piece occupies.
    pub cell: Size,
    /// Gap between cells, both axes.
    pub gap: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell: Size::new(60.0, 90.0),
            gap: 8.0,
        }
    }
}
