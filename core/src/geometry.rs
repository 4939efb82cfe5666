//! Axis-aligned rectangles and the corner-containment collision test.

/// Axis-aligned rectangle anchored at its upper-left corner.
///
/// Screen coordinates grow rightwards along x and downwards along y, so
/// [`Hitbox::top`] is numerically smaller than [`Hitbox::bottom`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Hitbox {
    /// Creates a rectangle from its upper-left corner and extent.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Leading (left) edge of the rectangle.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Trailing (right) edge of the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Upper edge of the rectangle.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Lower edge of the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal extent of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Four corners ordered top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn corners(&self) -> [(f32, f32); 4] {
        let (left, right) = (self.left(), self.right());
        let (top, bottom) = (self.top(), self.bottom());
        [(left, top), (right, top), (left, bottom), (right, bottom)]
    }

    /// Reports whether the point lies strictly inside the rectangle.
    ///
    /// Points on an edge are outside.
    #[must_use]
    pub fn strictly_contains(&self, (x, y): (f32, f32)) -> bool {
        x > self.left() && x < self.right() && y > self.top() && y < self.bottom()
    }

    /// Returns a rectangle grown by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }
}

/// Reports whether any corner of `a` lies strictly inside `b`.
///
/// The test is deliberately one-sided: the corners of `b` are never checked
/// against `a`, so `collides(a, b)` and `collides(b, a)` may disagree. A corner
/// resting exactly on an edge of `b` does not count.
#[must_use]
pub fn collides(a: &Hitbox, b: &Hitbox) -> bool {
    a.corners().into_iter().any(|corner| b.strictly_contains(corner))
}
