#![forbid(unsafe_code)]

//! Layout policies and the pure layout solver.
//!
//! # Role in Tabula
//! Given an ordered identity sequence, a [`LayoutPolicy`], and a viewport,
//! [`compute_layout`] produces one [`LayoutSlot`] per identity: a target
//! transform plus a z-rank. The solver is a pure function — deterministic
//! for identical inputs, no side effects — which is what makes transition
//! diffing and golden tests possible.
//!
//! # Invariants
//!
//! 1. Identical inputs produce identical slot mappings across calls.
//! 2. Every input identity gets exactly one slot; zero identities yield an
//!    empty result.
//! 3. Z-ranks are a total order with no ties, counting down with sequence
//!    index: the last identity in the sequence carries rank 0 (top).
//! 4. A viewport smaller than one footprint still yields a valid (possibly
//!    overlapping) layout; clipping is a rendering concern.

pub mod policy;
pub mod solver;

pub use policy::{FanConfig, GridConfig, LayoutPolicy, StackConfig};
pub use solver::{LayoutResult, LayoutSlot, compute_layout};

pub use tabula_core::geometry::{Point, Rect, Size, Transform};
