//! Inpainting primitives for masked-region reconstruction.
//!
//! Contract: masked pixels are replaced with values plausible given a
//! neighborhood of the configured radius; unmasked pixels pass through
//! unchanged. Two methods are provided. Fast marching resolves masked
//! pixels in increasing distance from the known region, each synthesized
//! from already-resolved neighbors. Diffusion relaxes masked pixels toward
//! the average of their 4-neighbors until convergence. The goal is
//! plausible visual continuity, not bit-exact recovery.

use std::collections::VecDeque;

use image::{GrayImage, RgbImage};

/// Convergence cutoff for diffusion, in 0-255 channel units.
const DIFFUSION_EPSILON: f32 = 0.05;
/// Iteration cap for diffusion.
const DIFFUSION_MAX_ITERS: usize = 2048;

/// Interpolation method used to synthesize masked pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum InpaintMethod {
    /// Resolve masked pixels front-by-front from the known boundary,
    /// weighting resolved neighbors by inverse squared distance.
    FastMarching,
    /// Iterative 4-neighbor averaging until the masked region stabilizes.
    Diffusion,
}

/// Synthesize the masked region of an image from its unmasked surroundings.
///
/// `image` and `mask` must share dimensions (the caller validates this; see
/// the engine's restore entry point). A mask cell is "marked" when nonzero.
/// If the mask covers the entire image there is no content to propagate and
/// the masked region comes back black.
#[must_use]
pub fn inpaint(image: &RgbImage, mask: &GrayImage, radius: u32, method: InpaintMethod) -> RgbImage {
    debug_assert_eq!(image.dimensions(), mask.dimensions());

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let masked: Vec<bool> = mask.pixels().map(|p| p[0] != 0).collect();
    if !masked.iter().any(|&m| m) {
        return image.clone();
    }

    // Channel-planar float working copy; masked pixels start at zero.
    let w = width as usize;
    let h = height as usize;
    let mut values = vec![[0.0_f32; 3]; w * h];
    for (x, y, px) in image.enumerate_pixels() {
        let idx = y as usize * w + x as usize;
        if !masked[idx] {
            values[idx] = [f32::from(px[0]), f32::from(px[1]), f32::from(px[2])];
        }
    }

    match method {
        InpaintMethod::FastMarching => fast_marching(&mut values, &masked, w, h, radius),
        InpaintMethod::Diffusion => diffuse(&mut values, &masked, w, h),
    }

    let mut out = image.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let idx = y as usize * w + x as usize;
        if masked[idx] {
            for ch in 0..3 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    px[ch] = values[idx][ch].round().clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
    out
}

/// BFS distance of every masked pixel from the known region (4-connected).
///
/// Known pixels have distance 0; masked pixels unreachable from any known
/// pixel keep `u32::MAX`.
fn distance_front(masked: &[bool], w: usize, h: usize) -> Vec<u32> {
    let mut dist = vec![u32::MAX; w * h];
    let mut queue = VecDeque::new();
    for (idx, &m) in masked.iter().enumerate() {
        if !m {
            dist[idx] = 0;
            queue.push_back(idx);
        }
    }
    while let Some(idx) = queue.pop_front() {
        let (x, y) = (idx % w, idx / w);
        let d = dist[idx] + 1;
        for (nx, ny) in neighbors4(x, y, w, h) {
            let nidx = ny * w + nx;
            if masked[nidx] && dist[nidx] == u32::MAX {
                dist[nidx] = d;
                queue.push_back(nidx);
            }
        }
    }
    dist
}

fn neighbors4(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    let mut out = [(0usize, 0usize); 4];
    let mut n = 0;
    if x > 0 {
        out[n] = (x - 1, y);
        n += 1;
    }
    if x + 1 < w {
        out[n] = (x + 1, y);
        n += 1;
    }
    if y > 0 {
        out[n] = (x, y - 1);
        n += 1;
    }
    if y + 1 < h {
        out[n] = (x, y + 1);
        n += 1;
    }
    out.into_iter().take(n)
}

/// Simplified Telea-style fast marching.
///
/// Masked pixels are visited in increasing distance from the known region
/// (ties broken by raster index for determinism) and synthesized as an
/// inverse-squared-distance weighted average of already-resolved pixels in
/// a `radius` window. Pixels with no reachable known content stay black.
fn fast_marching(values: &mut [[f32; 3]], masked: &[bool], w: usize, h: usize, radius: u32) {
    let dist = distance_front(masked, w, h);
    let r = radius.max(1) as i64;

    let mut order: Vec<usize> = (0..w * h)
        .filter(|&idx| masked[idx] && dist[idx] != u32::MAX)
        .collect();
    order.sort_by_key(|&idx| (dist[idx], idx));

    let mut resolved: Vec<bool> = masked.iter().map(|&m| !m).collect();

    for idx in order {
        let (x, y) = ((idx % w) as i64, (idx / w) as i64);
        let mut acc = [0.0_f32; 3];
        let mut weight_sum = 0.0_f32;

        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                    continue;
                }
                #[allow(clippy::cast_sign_loss)]
                let nidx = ny as usize * w + nx as usize;
                if !resolved[nidx] {
                    continue;
                }
                #[allow(clippy::cast_precision_loss)]
                let d2 = (dx * dx + dy * dy) as f32;
                let weight = 1.0 / d2;
                for ch in 0..3 {
                    acc[ch] += weight * values[nidx][ch];
                }
                weight_sum += weight;
            }
        }

        if weight_sum > 0.0 {
            for ch in 0..3 {
                values[idx][ch] = acc[ch] / weight_sum;
            }
        }
        resolved[idx] = true;
    }
}

/// Jacobi relaxation of the masked region toward its 4-neighbor average.
fn diffuse(values: &mut [[f32; 3]], masked: &[bool], w: usize, h: usize) {
    let masked_indices: Vec<usize> = (0..w * h).filter(|&idx| masked[idx]).collect();

    for _ in 0..DIFFUSION_MAX_ITERS {
        let snapshot = values.to_vec();
        let mut max_delta = 0.0_f32;

        for &idx in &masked_indices {
            let (x, y) = (idx % w, idx / w);
            let mut acc = [0.0_f32; 3];
            let mut count = 0.0_f32;
            for (nx, ny) in neighbors4(x, y, w, h) {
                let nidx = ny * w + nx;
                for ch in 0..3 {
                    acc[ch] += snapshot[nidx][ch];
                }
                count += 1.0;
            }
            if count == 0.0 {
                continue;
            }
            for ch in 0..3 {
                let new = acc[ch] / count;
                max_delta = max_delta.max((new - values[idx][ch]).abs());
                values[idx][ch] = new;
            }
        }

        if max_delta < DIFFUSION_EPSILON {
            break;
        }
    }
}
