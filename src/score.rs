//! Removability scoring for texture blocks.
//!
//! A texture block is removable when its content is cheap to resynthesize:
//! low mean gradient magnitude AND low intensity variance over a grayscale
//! projection of the block. Both conditions are required. A thin hard edge
//! on a flat background has low variance but high gradient and must never
//! be removed, so the AND is load-bearing.

use image::RgbImage;

use crate::grid::Block;

/// Per-block statistics over the grayscale-luminance projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStats {
    /// Mean per-cell Euclidean gradient magnitude.
    pub mean_gradient: f32,
    /// Population variance of the luminance values.
    pub variance: f32,
}

/// Compute gradient and variance statistics for one block.
///
/// Luminance is `0.299 R + 0.587 G + 0.114 B`, kept in the 0-255 range so
/// the default thresholds stay meaningful. The gradient uses first
/// differences per axis (central at interior cells, one-sided at the block
/// border); per-cell magnitude is taken before averaging, never the other
/// way around.
#[must_use]
pub fn block_stats(image: &RgbImage, block: Block, size: u32) -> BlockStats {
    let luma = block_luma(image, block, size);
    BlockStats {
        mean_gradient: mean_gradient_magnitude(&luma, size as usize),
        variance: variance(&luma),
    }
}

/// Removability verdict for a scored block.
///
/// Strict comparisons on both statistics; raising either threshold can only
/// grow the removable set.
#[must_use]
pub fn is_removable(stats: BlockStats, gradient_threshold: f32, variance_threshold: f32) -> bool {
    stats.mean_gradient < gradient_threshold && stats.variance < variance_threshold
}

/// Score texture blocks and keep the removable ones.
///
/// Blocks are independent, so scoring parallelizes across them when rayon
/// is available. The returned order follows the input order either way;
/// downstream consumers do not rely on it.
#[must_use]
pub fn removable_blocks(
    image: &RgbImage,
    texture: &[Block],
    size: u32,
    gradient_threshold: f32,
    variance_threshold: f32,
) -> Vec<Block> {
    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        texture
            .par_iter()
            .copied()
            .filter(|&b| {
                is_removable(
                    block_stats(image, b, size),
                    gradient_threshold,
                    variance_threshold,
                )
            })
            .collect()
    }

    #[cfg(not(feature = "cli"))]
    {
        texture
            .iter()
            .copied()
            .filter(|&b| {
                is_removable(
                    block_stats(image, b, size),
                    gradient_threshold,
                    variance_threshold,
                )
            })
            .collect()
    }
}

/// Grayscale-luminance projection of a block's footprint, row-major.
fn block_luma(image: &RgbImage, block: Block, size: u32) -> Vec<f32> {
    let mut luma = Vec::with_capacity((size * size) as usize);
    for dy in 0..size {
        for dx in 0..size {
            let px = image.get_pixel(block.col + dx, block.row + dy);
            luma.push(
                0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]),
            );
        }
    }
    luma
}

/// Mean Euclidean gradient magnitude over a `size x size` luminance tile.
///
/// First differences per axis: `(a[i+1] - a[i-1]) / 2` at interior cells,
/// `a[1] - a[0]` / `a[n-1] - a[n-2]` at the borders. A 1x1 tile has no
/// neighbors and scores zero.
fn mean_gradient_magnitude(luma: &[f32], size: usize) -> f32 {
    if size < 2 {
        return 0.0;
    }
    let at = |y: usize, x: usize| luma[y * size + x];
    let mut total = 0.0_f32;
    for y in 0..size {
        for x in 0..size {
            let gx = if x == 0 {
                at(y, 1) - at(y, 0)
            } else if x == size - 1 {
                at(y, size - 1) - at(y, size - 2)
            } else {
                (at(y, x + 1) - at(y, x - 1)) / 2.0
            };
            let gy = if y == 0 {
                at(1, x) - at(0, x)
            } else if y == size - 1 {
                at(size - 1, x) - at(size - 2, x)
            } else {
                (at(y + 1, x) - at(y - 1, x)) / 2.0
            };
            total += (gx * gx + gy * gy).sqrt();
        }
    }
    #[allow(clippy::cast_precision_loss)]
    {
        total / (size * size) as f32
    }
}

/// Population variance of a luminance tile.
fn variance(luma: &[f32]) -> f32 {
    if luma.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = luma.len() as f32;
    let mean = luma.iter().sum::<f32>() / n;
    luma.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n
}
