//! Deterministic block partition of an image.
//!
//! The grid tiles the image with non-overlapping `size x size` blocks in
//! row-major order. Trailing rows/columns that cannot form a full tile are
//! dropped, so the mask and the erased image always share the classifier's
//! exact coverage.

/// A fixed-size square tile, identified by its top-left pixel coordinate.
///
/// A block owns no pixel data; it is a coordinate into whichever image or
/// mask it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    /// Top row of the block's footprint, in pixel units.
    pub row: u32,
    /// Left column of the block's footprint, in pixel units.
    pub col: u32,
}

/// Enumerate all full `size x size` blocks of a `width x height` image.
///
/// Blocks are produced row-major: the outer loop walks rows, the inner loop
/// walks columns. A block exists only if its whole footprint fits inside the
/// image, so partial tiles at the bottom/right border are never produced.
#[must_use]
pub fn block_grid(width: u32, height: u32, size: u32) -> Vec<Block> {
    let mut blocks = Vec::new();
    if size == 0 || height < size || width < size {
        return blocks;
    }
    let mut row = 0;
    while row <= height - size {
        let mut col = 0;
        while col <= width - size {
            blocks.push(Block { row, col });
            col += size;
        }
        row += size;
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_row_major_and_non_overlapping() {
        let blocks = block_grid(16, 16, 8);
        assert_eq!(
            blocks,
            vec![
                Block { row: 0, col: 0 },
                Block { row: 0, col: 8 },
                Block { row: 8, col: 0 },
                Block { row: 8, col: 8 },
            ]
        );
    }

    #[test]
    fn grid_drops_partial_tiles() {
        // 20x13 with size 8: only floor(13/8)=1 row and floor(20/8)=2 cols fit.
        let blocks = block_grid(20, 13, 8);
        assert_eq!(
            blocks,
            vec![Block { row: 0, col: 0 }, Block { row: 0, col: 8 }]
        );
    }

    #[test]
    fn grid_covers_exactly_the_truncated_extent() {
        let (w, h, size) = (37, 29, 8);
        let blocks = block_grid(w, h, size);
        assert_eq!(blocks.len() as u32, (h / size) * (w / size));

        for b in &blocks {
            assert!(b.row + size <= h);
            assert!(b.col + size <= w);
            assert_eq!(b.row % size, 0);
            assert_eq!(b.col % size, 0);
        }

        // Disjointness: distinct blocks never share a coordinate.
        for (i, a) in blocks.iter().enumerate() {
            for b in &blocks[i + 1..] {
                assert!(a.row != b.row || a.col != b.col);
            }
        }
    }

    #[test]
    fn grid_of_image_smaller_than_block_is_empty() {
        assert!(block_grid(7, 7, 8).is_empty());
        assert!(block_grid(0, 0, 8).is_empty());
        assert!(block_grid(100, 4, 8).is_empty());
    }

    #[test]
    fn grid_with_zero_size_is_empty() {
        assert!(block_grid(16, 16, 0).is_empty());
    }
}
