#![forbid(unsafe_code)]

//! The piece model: validated identities, kinds, and face states.
//!
//! A [`Piece`] is pure data. External collaborators reference pieces only by
//! [`PieceId`]; the scene graph is the sole owner of `Piece` records.
//!
//! # Invariants
//!
//! 1. A `PieceId` is never empty or all-whitespace (enforced at construction).
//! 2. `Piece` equality is equality of identity, nothing else.

use serde::{Deserialize, Serialize};

use crate::error::{ArenaError, Result};
use crate::geometry::Transform;

// ---------------------------------------------------------------------------
// PieceId
// ---------------------------------------------------------------------------

/// Stable identity of a piece, unique for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(String);

impl PieceId {
    /// Create a validated identity.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidPiece`] if the identity is empty or
    /// contains only whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ArenaError::InvalidPiece {
                reason: "identity must not be empty".to_string(),
            });
        }
        Ok(Self(id))
    }

    /// The identity as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// PieceKind / FaceState
// ---------------------------------------------------------------------------

/// The fixed enumeration of piece types an arena can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    /// A code/problem tile.
    Code,
    /// A playing card.
    Card,
    /// A round token.
    Token,
}

/// Visual face state of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceState {
    #[default]
    FaceUp,
    FaceDown,
    Highlighted,
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// One placeable visual item tracked by the scene graph.
///
/// `transform` is the *current* (possibly mid-transition) visual placement;
/// `z` is the authoritative z-order rank, numerically lower on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub face: FaceState,
    pub transform: Transform,
    pub z: u32,
}

impl Piece {
    /// Create a piece at the given placement.
    #[must_use]
    pub fn new(id: PieceId, kind: PieceKind, face: FaceState, transform: Transform, z: u32) -> Self {
        Self {
            id,
            kind,
            face,
            transform,
            z,
        }
    }
}

/// Equality by identity only: two records for the same id compare equal even
/// mid-transition.
impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Piece {}

#[cfg(test)]
mod tests {
    use super::{FaceState, Piece, PieceId, PieceKind};
    use crate::error::ArenaError;
    use crate::geometry::{Point, Transform};

    #[test]
    fn empty_identity_is_rejected() {
        assert!(matches!(
            PieceId::new(""),
            Err(ArenaError::InvalidPiece { .. })
        ));
        assert!(matches!(
            PieceId::new("   "),
            Err(ArenaError::InvalidPiece { .. })
        ));
    }

    #[test]
    fn valid_identity_round_trips() {
        let id = PieceId::new("ace-of-spades").unwrap();
        assert_eq!(id.as_str(), "ace-of-spades");
        assert_eq!(id.to_string(), "ace-of-spades");
    }

    #[test]
    fn piece_equality_is_identity_only() {
        let id = PieceId::new("p1").unwrap();
        let a = Piece::new(
            id.clone(),
            PieceKind::Card,
            FaceState::FaceUp,
            Transform::at(Point::new(0.0, 0.0)),
            0,
        );
        let b = Piece::new(
            id,
            PieceKind::Card,
            FaceState::FaceDown,
            Transform::at(Point::new(50.0, 50.0)),
            7,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn piece_id_serde_is_transparent() {
        let id = PieceId::new("c3").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"c3\"");
    }
}
