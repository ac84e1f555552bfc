//! Tree model: nodes, snapshots and the bundled sample tree.

pub mod node;
pub mod sample;
pub mod tree;
