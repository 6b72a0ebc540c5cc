use std::collections::HashSet;

use tracing::{debug, warn};

use crate::parser::types::{IndexedNode, RawNode};

/// Hard ceiling on reconstructed tree depth. UiAutomator dumps rarely nest
/// past ~15 levels; anything deeper is treated as corrupt input and the
/// offending subtree is truncated rather than walked further.
pub const MAX_TREE_DEPTH: usize = 20;

/// Reconstructs parent/child links and depth from bounding boxes alone.
///
/// For each node the builder scans every other node; a candidate is a
/// parent only if its bounds fully contain the node's bounds (identical
/// rects excluded), and among all candidates the smallest area wins — the
/// tightest fit is the parent, which is a deliberate tie-break rule. A node
/// with no candidate is a root.
///
/// The pairwise scan is O(n²) in the node count. That is acceptable for
/// screen-sized trees (typically well under 500 nodes); reuse on much
/// larger trees should swap the scan for a spatial index rather than change
/// the containment semantics.
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn build(nodes: Vec<RawNode>) -> Vec<IndexedNode> {
        let n = nodes.len();

        let mut parents: Vec<Option<usize>> = vec![None; n];
        for i in 0..n {
            let mut best: Option<(usize, i64)> = None;
            for j in 0..n {
                if i == j || !nodes[j].bounds.contains(&nodes[i].bounds) {
                    continue;
                }
                let area = nodes[j].bounds.area();
                if best.map_or(true, |(_, best_area)| area < best_area) {
                    best = Some((j, area));
                }
            }
            parents[i] = best.map(|(j, _)| j);
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, parent) in parents.iter().enumerate() {
            if let Some(p) = *parent {
                children[p].push(i);
            }
        }

        // Depth is the number of successive parents up to a root, so it is
        // correct even when the input order is non-hierarchical. Area
        // containment with identical bounds excluded makes cycles
        // structurally impossible, but corrupt input is still guarded with
        // a visited set and the depth ceiling.
        let mut depths = vec![0usize; n];
        let mut truncated: Vec<usize> = Vec::new();
        for i in 0..n {
            let mut depth = 0usize;
            let mut visited: HashSet<usize> = HashSet::from([i]);
            let mut current = parents[i];
            while let Some(p) = current {
                if depth >= MAX_TREE_DEPTH || !visited.insert(p) {
                    warn!(
                        node = nodes[i].index,
                        depth, "ancestor chain exceeds ceiling; truncating subtree"
                    );
                    truncated.push(i);
                    break;
                }
                depth += 1;
                current = parents[p];
            }
            depths[i] = depth;
        }
        for i in truncated {
            children[i].clear();
        }

        debug!(
            nodes = n,
            roots = parents.iter().filter(|p| p.is_none()).count(),
            "hierarchy reconstructed"
        );

        nodes
            .into_iter()
            .enumerate()
            .map(|(i, raw)| IndexedNode {
                raw,
                parent_index: parents[i],
                child_indices: std::mem::take(&mut children[i]),
                depth: depths[i],
            })
            .collect()
    }
}
