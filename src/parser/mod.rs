pub mod hierarchy;
pub mod types;
pub mod xml;

pub use hierarchy::HierarchyBuilder;
pub use types::{IndexedNode, RawNode};
pub use xml::NodeParser;
