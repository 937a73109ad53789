//! Structural / texture partition of the block grid.

use crate::edges::EdgeMap;
use crate::grid::Block;

/// Result of classifying a block grid against an edge map.
///
/// Every grid block lands in exactly one of the two sets.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Blocks overlapping at least one edge-significant cell. Always preserved.
    pub structural: Vec<Block>,
    /// Blocks whose footprint contains no edge-significant cell. Candidates
    /// for removal.
    pub texture: Vec<Block>,
}

/// Partition blocks into structural and texture sets.
///
/// A block is structural iff ANY cell of its `size x size` footprint in the
/// edge map is marked. The test is existential on purpose: a single edge
/// pixel is enough to protect the block, and neighboring blocks have no
/// influence on each other.
#[must_use]
pub fn classify(blocks: &[Block], edges: &EdgeMap, size: u32) -> Classification {
    let mut result = Classification::default();
    for &block in blocks {
        if footprint_has_edge(block, edges, size) {
            result.structural.push(block);
        } else {
            result.texture.push(block);
        }
    }
    result
}

fn footprint_has_edge(block: Block, edges: &EdgeMap, size: u32) -> bool {
    for dy in 0..size {
        for dx in 0..size {
            if edges.is_edge(block.col + dx, block.row + dy) {
                return true;
            }
        }
    }
    false
}
