#![forbid(unsafe_code)]

//! Kind-keyed footprint policy.
//!
//! One [`KindMetrics`] table replaces a per-kind widget subclass hierarchy:
//! the scene asks it for a footprint when hit-testing, and host paint layers
//! can share the same table for measuring.

use rustc_hash::FxHashMap;

use tabula_core::geometry::Size;
use tabula_core::piece::PieceKind;

/// Footprint lookup by piece kind, with a default for unlisted kinds.
#[derive(Debug, Clone)]
pub struct KindMetrics {
    sizes: FxHashMap<PieceKind, Size>,
    default: Size,
}

impl KindMetrics {
    /// Create a table with the given default footprint.
    #[must_use]
    pub fn new(default: Size) -> Self {
        Self {
            sizes: FxHashMap::default(),
            default,
        }
    }

    /// Register a footprint for a kind (builder pattern).
    #[must_use]
    pub fn with_kind(mut self, kind: PieceKind, size: Size) -> Self {
        self.sizes.insert(kind, size);
        self
    }

    /// Footprint for a kind, falling back to the default.
    #[inline]
    #[must_use]
    pub fn size_of(&self, kind: PieceKind) -> Size {
        self.sizes.get(&kind).copied().unwrap_or(self.default)
    }
}

impl Default for KindMetrics {
    /// Card-shaped default footprint.
    fn default() -> Self {
        Self::new(Size::new(60.0, 90.0))
    }
}
