use super::node::{Node, Point};
use super::shape::{Rectangle, Shape};
use crate::config;
use crate::profile_scope;

/// Region quadtree rebuilt from scratch every frame.
///
/// Nodes live in a flat arena. Once a node is full it subdivides into four
/// quadrants and later points descend into the first quadrant (NE, NW, SE, SW)
/// whose inclusive boundary contains them. Points already stored in a node stay
/// there, so a branch keeps `capacity` points of its own, plus any point that
/// f32 rounding left between its children's boundaries.
pub struct Quadtree<T> {
    capacity: usize,
    max_depth: usize,
    len: usize,
    pub nodes: Vec<Node<T>>,
}

impl<T: Copy> Quadtree<T> {
    pub const ROOT: usize = 0;

    pub fn new(boundary: Rectangle, capacity: usize) -> Self {
        Self::with_max_depth(boundary, capacity, config::QUADTREE_MAX_DEPTH)
    }

    pub fn with_max_depth(boundary: Rectangle, capacity: usize, max_depth: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            max_depth,
            len: 0,
            nodes: vec![Node::new(boundary, 0)],
        }
    }

    pub fn boundary(&self) -> Rectangle {
        self.nodes[Self::ROOT].boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Deepest level reached so far (root is 0).
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    fn subdivide(&mut self, node: usize) -> usize {
        let children = self.nodes.len();
        let depth = self.nodes[node].depth + 1;
        let quads = self.nodes[node].boundary.subdivide();
        #[cfg(feature = "debug_quadtree")]
        log::trace!("Quadtree::subdivide: node {} -> children {} (depth {})", node, children, depth);
        self.nodes.extend(quads.into_iter().map(|quad| Node::new(quad, depth)));
        self.nodes[node].children = children;
        children
    }

    /// Insert a point. Returns `false` without touching the tree only when the
    /// point lies outside the root boundary.
    pub fn insert(&mut self, point: Point<T>) -> bool {
        if !self.nodes[Self::ROOT].boundary.contains(point.pos) {
            return false;
        }

        let mut node = Self::ROOT;
        loop {
            let n = &self.nodes[node];
            if n.points.len() < self.capacity || n.depth >= self.max_depth {
                self.nodes[node].points.push(point);
                self.len += 1;
                return true;
            }

            let children = if n.is_leaf() {
                self.subdivide(node)
            } else {
                n.children
            };

            match (children..children + 4).find(|&c| self.nodes[c].boundary.contains(point.pos)) {
                Some(child) => node = child,
                // Rounding at quadrant edges can leave a sliver no child covers;
                // the point stays in the branch, like at the depth ceiling.
                None => {
                    self.nodes[node].points.push(point);
                    self.len += 1;
                    return true;
                }
            }
        }
    }

    /// All stored points contained by `range`.
    pub fn query<S: Shape>(&self, range: &S) -> Vec<Point<T>> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    /// Like [`Quadtree::query`] but appends into a caller-owned buffer.
    ///
    /// Visits a node's own points in insertion order before its children, and
    /// children in NE, NW, SE, SW order.
    pub fn query_into<S: Shape>(&self, range: &S, found: &mut Vec<Point<T>>) {
        profile_scope!("quadtree_query");
        let mut stack = vec![Self::ROOT];
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node];
            if !range.intersects_rect(&n.boundary) {
                continue;
            }
            found.extend(n.points.iter().filter(|p| range.contains(p.pos)).copied());
            if n.is_branch() {
                for c in (0..4).rev() {
                    stack.push(n.children + c);
                }
            }
        }
    }

    /// Every node boundary in pre-order, for tree visualisation.
    pub fn boundaries(&self) -> Vec<Rectangle> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(node) = stack.pop() {
            let n = &self.nodes[node];
            out.push(n.boundary);
            if n.is_branch() {
                for c in (0..4).rev() {
                    stack.push(n.children + c);
                }
            }
        }
        out
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }
}
