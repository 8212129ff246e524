pub mod translation;
pub mod tree;

pub use translation::*;
pub use tree::*;
