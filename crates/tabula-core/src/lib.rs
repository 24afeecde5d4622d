#![forbid(unsafe_code)]

//! Core: geometric primitives, the piece model, easing curves, and errors.
//!
//! # Role in Tabula
//! `tabula-core` is the value-type layer. Every other crate builds on the
//! types defined here; none of them carry behavior beyond construction,
//! validation, and interpolation.
//!
//! # Primary responsibilities
//! - **Geometry**: float-space points, sizes, rects, and piece transforms.
//! - **Piece model**: validated identities, kinds, and face states.
//! - **Easing**: pure progress curves for the transition scheduler.
//! - **Errors**: the `ArenaError` taxonomy shared by all public operations.
//!
//! # How it fits in the system
//! The layout solver (`tabula-layout`) consumes identities and produces
//! transforms; the scene graph (`tabula-scene`) owns pieces and samples
//! easing curves; the runtime (`tabula-runtime`) surfaces errors from all
//! of them through one façade.

pub mod easing;
pub mod error;
pub mod geometry;
pub mod piece;

pub use easing::Easing;
pub use error::{ArenaError, Result};
pub use geometry::{Point, Rect, Size, Transform, Vec2};
pub use piece::{FaceState, Piece, PieceId, PieceKind};
