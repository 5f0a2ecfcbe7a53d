use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

/// Region that the quadtree can be queried with.
pub trait Shape {
    /// Inclusive containment test.
    fn contains(&self, pos: Vec2) -> bool;

    /// Whether this shape overlaps a node boundary. Used to prune subtrees.
    fn intersects_rect(&self, rect: &Rectangle) -> bool;
}

/// Axis-aligned box stored as a centre and half extents.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
}

impl Rectangle {
    pub fn new(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self { center, half_width, half_height }
    }

    /// Box covering `[0, width] x [0, height]`.
    pub fn arena(width: f32, height: f32) -> Self {
        Self::new(Vec2::new(width * 0.5, height * 0.5), width * 0.5, height * 0.5)
    }

    pub fn min(&self) -> Vec2 {
        self.center - Vec2::new(self.half_width, self.half_height)
    }

    pub fn max(&self) -> Vec2 {
        self.center + Vec2::new(self.half_width, self.half_height)
    }

    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(other.center.x - other.half_width > self.center.x + self.half_width
            || other.center.x + other.half_width < self.center.x - self.half_width
            || other.center.y - other.half_height > self.center.y + self.half_height
            || other.center.y + other.half_height < self.center.y - self.half_height)
    }

    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        circle.intersects_rect(self)
    }

    /// Child quadrant in NE, NW, SE, SW order (`0..4`). North is towards -y.
    pub fn quadrant(&self, quadrant: usize) -> Self {
        let hw = self.half_width * 0.5;
        let hh = self.half_height * 0.5;
        let dx = if quadrant & 1 == 0 { hw } else { -hw };
        let dy = if quadrant < 2 { -hh } else { hh };
        Self::new(self.center + Vec2::new(dx, dy), hw, hh)
    }

    pub fn subdivide(&self) -> [Rectangle; 4] {
        [0, 1, 2, 3].map(|i| self.quadrant(i))
    }
}

impl Shape for Rectangle {
    fn contains(&self, pos: Vec2) -> bool {
        pos.x >= self.center.x - self.half_width
            && pos.x <= self.center.x + self.half_width
            && pos.y >= self.center.y - self.half_height
            && pos.y <= self.center.y + self.half_height
    }

    fn intersects_rect(&self, rect: &Rectangle) -> bool {
        self.intersects(rect)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let r = self.radius + other.radius;
        (self.center - other.center).mag_sq() <= r * r
    }
}

impl Shape for Circle {
    fn contains(&self, pos: Vec2) -> bool {
        (pos - self.center).mag_sq() <= self.radius * self.radius
    }

    fn intersects_rect(&self, rect: &Rectangle) -> bool {
        // Distance from the circle centre to the closest point of the box.
        let dx = ((rect.center.x - self.center.x).abs() - rect.half_width).max(0.0);
        let dy = ((rect.center.y - self.center.y).abs() - rect.half_height).max(0.0);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}
