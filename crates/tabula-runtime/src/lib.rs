#![forbid(unsafe_code)]

//! Runtime: drag interaction and the arena façade.
//!
//! # Role in Tabula
//! `tabula-runtime` is the single surface toolkit-binding glue is expected
//! to call. [`Arena`] wires the layout solver, scene graph, transition
//! scheduler, and [`DragController`] into three inbound seams — model
//! updates, pointer events, and the render tick — and one outbound seam,
//! [`Intent`] events.
//!
//! # Concurrency
//! Single-threaded cooperative: one rendering/interaction thread owns the
//! arena. Callers marshal external model updates onto that thread; the
//! engine performs no locking and no blocking work.

pub mod arena;
pub mod drag;
pub mod intent;

pub use arena::{Arena, ArenaConfig, PieceSnapshot, PieceUpdate, UpdateSummary};
pub use drag::{DragConfig, DragController, DragOutcome};
pub use intent::{AcceptAll, DropContext, DropDecision, DropPolicy, Intent, RejectAll};
