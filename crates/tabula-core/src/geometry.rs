#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are `f32` in arena space (origin at top-left, y down).
//! Hit-test bounds are axis-aligned: rotation affects painting only.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Point / Vec2
// ---------------------------------------------------------------------------

/// A position in arena space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Linear interpolation toward `other` at progress `t`.
    ///
    /// `t = 0.0` yields `self`, `t = 1.0` yields `other` exactly.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Vec2;

    fn sub(self, rhs: Self) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add<Vec2> for Point {
    type Output = Point;

    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl std::ops::Sub<Vec2> for Point {
    type Output = Point;

    fn sub(self, rhs: Vec2) -> Point {
        Point::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// A displacement between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub dx: f32,
    pub dy: f32,
}

impl Vec2 {
    /// Create a new displacement.
    #[inline]
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Zero displacement.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Euclidean length.
    #[must_use]
    pub fn length(self) -> f32 {
        self.dx.hypot(self.dy)
    }

    /// Scale both components.
    #[must_use]
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.dx * factor, self.dy * factor)
    }
}

// ---------------------------------------------------------------------------
// Size / Rect
// ---------------------------------------------------------------------------

/// Width and height of a footprint or viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A rectangle for viewport bounds and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f32,
    /// Top edge (inclusive).
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    ///
    /// The left/top edges are inclusive, right/bottom exclusive, so adjacent
    /// rectangles never both claim a boundary point.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// The visual placement of one piece: position, rotation, and scale.
///
/// `position` is the top-left anchor of the piece's footprint. Rotation is
/// in radians around the anchor and does not enter hit-test bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point,
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    /// Identity transform at a position.
    #[must_use]
    pub const fn at(position: Point) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    /// Set the rotation (builder pattern).
    #[must_use]
    pub const fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the scale (builder pattern).
    #[must_use]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Linear interpolation toward `other` at progress `t`.
    ///
    /// Rotation interpolates component-wise (no shortest-arc wrapping; layout
    /// policies keep rotations within one turn).
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation + (other.rotation - self.rotation) * t,
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }

    /// The axis-aligned bounds of a footprint placed under this transform.
    #[must_use]
    pub fn bounds(&self, footprint: Size) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            footprint.width * self.scale,
            footprint.height * self.scale,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Point::default())
    }
}
