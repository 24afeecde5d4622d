#![forbid(unsafe_code)]

//! Scene graph and transition scheduler.
//!
//! # Role in Tabula
//! `tabula-scene` owns the authoritative piece set. The [`SceneGraph`] is
//! the only mutator of piece records; everything else references pieces by
//! identity. The [`TransitionScheduler`] drives time-based interpolation
//! from old to new layout targets without blocking interaction.
//!
//! # Primary responsibilities
//! - **SceneGraph**: insert/remove, layout diffing, z-order, hit-testing.
//! - **KindMetrics**: kind-keyed footprints used for hit-test bounds.
//! - **TransitionScheduler**: per-piece last-writer-wins interpolation.
//!
//! # How it fits in the system
//! The façade (`tabula-runtime`) feeds solver output into
//! [`SceneGraph::apply_layout`], turns the returned diffs into transitions,
//! and writes each [`TransitionUpdate`] back into the scene on every tick.

pub mod graph;
pub mod metrics;
pub mod transition;

pub use graph::{SceneGraph, SlotDiff};
pub use metrics::KindMetrics;
pub use transition::{TransitionScheduler, TransitionUpdate};
