use serde::{Deserialize, Serialize};

use crate::geometry::ElementBounds;

/// One `<node>` element's verbatim attribute set, plus the paths derived
/// from its position in the document tree. Immutable once parsed.
///
/// `index` is the node's position in document order over *all* `<node>`
/// elements of the dump, so ids stay stable even when a sibling is dropped
/// for a malformed bounds attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    pub index: usize,
    pub text: String,
    pub content_desc: String,
    pub resource_id: String,
    pub class_name: String,
    pub package_name: String,
    pub bounds: ElementBounds,
    pub clickable: bool,
    pub scrollable: bool,
    pub enabled: bool,
    pub focused: bool,
    pub selected: bool,
    pub focusable: bool,
    pub checkable: bool,
    pub checked: bool,
    pub password: bool,
    /// XPath within the dump, e.g. `/node[1]/node[3]/node`.
    pub xpath: String,
    /// Human-readable ancestor chain, e.g.
    /// `FrameLayout > RecyclerView[note_list] > TextView["关注"]`.
    pub node_path: String,
}

/// A `RawNode` with bounds-derived structure. Relationships are recomputed
/// from scratch by [`super::HierarchyBuilder`] whenever the node set
/// changes; they are never patched in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedNode {
    pub raw: RawNode,
    /// Position in the *surviving* node list of the tightest container, if
    /// any. Not the XML parent: the hierarchy is reconstructed from bounds
    /// alone, so flattened or reshuffled dumps still resolve correctly.
    pub parent_index: Option<usize>,
    pub child_indices: Vec<usize>,
    pub depth: usize,
}
