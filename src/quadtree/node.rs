use ultraviolet::Vec2;
use super::shape::Rectangle;

/// A position with an opaque payload. The simulation stores particle ids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<T> {
    pub pos: Vec2,
    pub data: T,
}

impl<T> Point<T> {
    pub fn new(pos: Vec2, data: T) -> Self {
        Self { pos, data }
    }
}

#[derive(Clone, Debug)]
pub struct Node<T> {
    /// Index of the first of four consecutive children (NE, NW, SE, SW), 0 for a leaf.
    pub children: usize,
    pub depth: usize,
    pub boundary: Rectangle,
    pub points: Vec<Point<T>>,
}

impl<T> Node<T> {
    pub fn new(boundary: Rectangle, depth: usize) -> Self {
        Self {
            children: 0,
            depth,
            boundary,
            points: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children == 0
    }

    pub fn is_branch(&self) -> bool {
        self.children != 0
    }
}
