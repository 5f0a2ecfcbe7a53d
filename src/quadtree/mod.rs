pub mod node;
pub mod shape;

pub use node::{Node, Point};
pub use shape::{Circle, Rectangle, Shape};

mod quadtree;
pub use quadtree::Quadtree;
