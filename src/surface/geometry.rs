use serde::Serialize;
use utoipa::ToSchema;

/// A point in drawing-surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl From<[f64; 2]> for Size {
    fn from([width, height]: [f64; 2]) -> Self {
        Self::new(width, height)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    #[must_use]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Resolve a sub-rectangle given as fractions of this rectangle.
    ///
    /// `offset` and `extent` are `[fx, fy]` pairs; `[0.1, 0.15]` with
    /// `[0.7, 0.7]` is a box starting 10% in and 15% down, 70% wide and tall.
    #[must_use]
    pub fn fraction(&self, offset: [f64; 2], extent: [f64; 2]) -> Self {
        Self::new(
            self.point_at(offset),
            Size::new(extent[0] * self.size.width, extent[1] * self.size.height),
        )
    }

    /// Resolve a point given as fractions of this rectangle.
    #[must_use]
    pub fn point_at(&self, fraction: [f64; 2]) -> Point {
        Point::new(
            self.origin.x + fraction[0] * self.size.width,
            self.origin.y + fraction[1] * self.size.height,
        )
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    #[must_use]
    pub fn left_center(&self) -> Point {
        Point::new(self.left(), self.center().y)
    }

    #[must_use]
    pub fn right_center(&self) -> Point {
        Point::new(self.right(), self.center().y)
    }
}
