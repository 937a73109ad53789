//! Mask and erased-image construction.

use image::{GrayImage, Rgb, RgbImage};

use crate::grid::Block;

/// Mask value marking an erased cell.
pub const MASK_MARKED: u8 = 255;

/// Fill color written into erased footprints.
pub const FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// Build the removal mask and the erased image for a removable set.
///
/// The mask starts all-clear and the erased image as an exact copy of the
/// source; each removable footprint is then marked in the mask and
/// overwritten with the fill color in the image. Footprints are disjoint by
/// grid construction, so application order does not matter.
///
/// Guarantee: a pixel differs between the erased image and the source iff
/// its mask cell is marked.
///
/// # Panics
///
/// Panics if a removable footprint extends past the image bounds. The block
/// grid only produces full in-bounds blocks, so this can only happen with
/// hand-built coordinates.
#[must_use]
pub fn build_mask_and_erased(
    image: &RgbImage,
    removable: &[Block],
    size: u32,
) -> (GrayImage, RgbImage) {
    let mut mask = GrayImage::new(image.width(), image.height());
    let mut erased = image.clone();

    for &block in removable {
        for dy in 0..size {
            for dx in 0..size {
                mask.put_pixel(block.col + dx, block.row + dy, image::Luma([MASK_MARKED]));
                erased.put_pixel(block.col + dx, block.row + dy, FILL);
            }
        }
    }

    (mask, erased)
}
