#![forbid(unsafe_code)]

//! Tabula public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for hosts. It
//! re-exports the types toolkit-binding glue needs: construct an
//! [`Arena`], feed it model updates and pointer events, drive [`Arena::tick`]
//! once per frame, and paint from [`Arena::snapshot`].

// --- Core re-exports -------------------------------------------------------

pub use tabula_core::easing::Easing;
pub use tabula_core::error::{ArenaError, Result};
pub use tabula_core::geometry::{Point, Rect, Size, Transform, Vec2};
pub use tabula_core::piece::{FaceState, Piece, PieceId, PieceKind};

// --- Layout re-exports -----------------------------------------------------

pub use tabula_layout::{
    FanConfig, GridConfig, LayoutPolicy, LayoutResult, LayoutSlot, StackConfig, compute_layout,
};

// --- Scene re-exports ------------------------------------------------------

pub use tabula_scene::{KindMetrics, SceneGraph, SlotDiff, TransitionScheduler, TransitionUpdate};

// --- Runtime re-exports ----------------------------------------------------

pub use tabula_runtime::{
    AcceptAll, Arena, ArenaConfig, DragConfig, DropContext, DropDecision, DropPolicy, Intent,
    PieceSnapshot, PieceUpdate, RejectAll, UpdateSummary,
};
