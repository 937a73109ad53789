//! Content-adaptive block pruning of raster images.
//!
//! The pipeline partitions an image into fixed-size blocks, keeps every
//! block near a detected edge, scores the remaining texture blocks for
//! removability (low mean gradient AND low variance), erases the removable
//! ones behind a single-channel mask, and later reconstructs the erased
//! regions by inpainting from the surrounding content. Removal and
//! restoration are separate phases exchanging only two artifacts: a lossless
//! PNG mask and the erased image.
//!
//! # Quick Start
//!
//! ```no_run
//! use block_prune::{PruneConfig, PruneEngine};
//!
//! let engine = PruneEngine::new(PruneConfig::default()).expect("valid config");
//!
//! let img = image::open("photo.jpg").unwrap().to_rgb8();
//! let reduction = engine.reduce(&img);
//! reduction.mask.save("photo_mask.png").unwrap();
//! reduction.image.save("photo_reduced.jpg").unwrap();
//! ```
//!
//! # Restoring
//!
//! Restoration only needs the two artifacts, so it can run in a completely
//! separate process:
//!
//! ```no_run
//! use block_prune::{PruneConfig, PruneEngine};
//!
//! let engine = PruneEngine::new(PruneConfig::default()).expect("valid config");
//! let reduced = image::open("photo_reduced.jpg").unwrap().to_rgb8();
//! let mask = image::open("photo_mask.png").unwrap().to_luma8();
//! let restored = engine.restore(&reduced, &mask).unwrap();
//! restored.save("photo_restored.jpg").unwrap();
//! ```

#![deny(missing_docs)]

pub mod classify;
pub mod edges;
mod engine;
pub mod error;
pub mod grid;
pub mod inpaint;
pub mod mask;
pub mod score;

pub use engine::{
    default_mask_path, default_reduced_path, default_restored_path, save_image, BlockCounts,
    PruneConfig, PruneEngine, ReduceReport, Reduction, RestoreReport,
};
pub use error::{Error, Result};
pub use inpaint::InpaintMethod;
