//! Pruning engine: configuration, the two pipeline phases, and the file
//! boundary between them.
//!
//! REMOVE and RESTORE are independent entry points sharing only the artifact
//! contract: a lossless single-channel mask plus a (possibly lossy) erased
//! image. RESTORE can run in a separate process given only those two files.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};

use crate::classify::{classify, Classification};
use crate::edges::detect_edges;
use crate::error::{Error, Result};
use crate::grid::block_grid;
use crate::inpaint::{inpaint, InpaintMethod};
use crate::mask::build_mask_and_erased;
use crate::score::removable_blocks;

/// Options controlling both pruning phases.
#[derive(Debug, Clone)]
pub struct PruneConfig {
    /// Side length of the square block tiles. Must be > 0.
    pub block_size: u32,
    /// Canny low hysteresis threshold. Must be > 0 and <= `edge_high`.
    pub edge_low: f32,
    /// Canny high hysteresis threshold.
    pub edge_high: f32,
    /// Mean gradient magnitude below which a texture block may be removed.
    pub gradient_threshold: f32,
    /// Luminance variance below which a texture block may be removed.
    pub variance_threshold: f32,
    /// Neighborhood radius handed to the inpainting primitive. Must be > 0.
    pub inpaint_radius: u32,
    /// Interpolation method for reconstruction.
    pub inpaint_method: InpaintMethod,
    /// JPEG quality used when writing lossy outputs (1-100).
    pub jpeg_quality: u8,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            block_size: 8,
            edge_low: 100.0,
            edge_high: 200.0,
            gradient_threshold: 5.0,
            variance_threshold: 500.0,
            inpaint_radius: 3,
            inpaint_method: InpaintMethod::FastMarching,
            jpeg_quality: 90,
        }
    }
}

impl PruneConfig {
    /// Validate all fields before any pixel processing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be > 0".into()));
        }
        if self.edge_low <= 0.0 {
            return Err(Error::InvalidConfig("edge_low must be > 0".into()));
        }
        if self.edge_low > self.edge_high {
            return Err(Error::InvalidConfig(format!(
                "edge_low ({}) must not exceed edge_high ({})",
                self.edge_low, self.edge_high
            )));
        }
        if self.gradient_threshold < 0.0 {
            return Err(Error::InvalidConfig(
                "gradient_threshold must be >= 0".into(),
            ));
        }
        if self.variance_threshold < 0.0 {
            return Err(Error::InvalidConfig(
                "variance_threshold must be >= 0".into(),
            ));
        }
        if self.inpaint_radius == 0 {
            return Err(Error::InvalidConfig("inpaint_radius must be > 0".into()));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(Error::InvalidConfig(
                "jpeg_quality must be in 1..=100".into(),
            ));
        }
        Ok(())
    }
}

/// How the block grid split up during a REMOVE run.
#[derive(Debug, Clone, Copy)]
pub struct BlockCounts {
    /// All full-size blocks in the grid.
    pub total: usize,
    /// Blocks overlapping a detected edge.
    pub structural: usize,
    /// Blocks with no detected edge.
    pub texture: usize,
    /// Texture blocks passing both removability thresholds.
    pub removable: usize,
}

/// In-memory output of the REMOVE phase.
#[derive(Debug)]
pub struct Reduction {
    /// Single-channel mask, marked over every erased footprint.
    pub mask: GrayImage,
    /// Copy of the source with removable footprints filled white.
    pub image: RgbImage,
    /// Grid statistics for reporting.
    pub counts: BlockCounts,
}

/// Outcome of a file-level REMOVE run.
#[derive(Debug)]
pub struct ReduceReport {
    /// Size of the input file in bytes.
    pub input_bytes: u64,
    /// Where the erased image was written.
    pub image_path: PathBuf,
    /// Size of the erased image file in bytes.
    pub image_bytes: u64,
    /// Where the mask was written.
    pub mask_path: PathBuf,
    /// Size of the mask file in bytes.
    pub mask_bytes: u64,
    /// Grid statistics from the run.
    pub counts: BlockCounts,
}

/// Outcome of a file-level RESTORE run.
#[derive(Debug)]
pub struct RestoreReport {
    /// Where the restored image was written.
    pub output_path: PathBuf,
    /// Size of the restored image file in bytes.
    pub output_bytes: u64,
}

/// The pruning engine. Create once with a validated configuration and reuse
/// across images.
pub struct PruneEngine {
    config: PruneConfig,
}

impl PruneEngine {
    /// Create an engine, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any field is out of range.
    pub fn new(config: PruneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &PruneConfig {
        &self.config
    }

    /// Run the REMOVE phase in memory.
    ///
    /// Partitions the image into blocks, classifies them against a Canny
    /// edge map, scores the texture blocks, and erases the removable ones.
    /// The source image is never modified.
    #[must_use]
    pub fn reduce(&self, image: &RgbImage) -> Reduction {
        let cfg = &self.config;
        let grid = block_grid(image.width(), image.height(), cfg.block_size);
        let edge_map = detect_edges(image, cfg.edge_low, cfg.edge_high);
        let Classification {
            structural,
            texture,
        } = classify(&grid, &edge_map, cfg.block_size);
        let removable = removable_blocks(
            image,
            &texture,
            cfg.block_size,
            cfg.gradient_threshold,
            cfg.variance_threshold,
        );
        let (mask, erased) = build_mask_and_erased(image, &removable, cfg.block_size);

        Reduction {
            mask,
            image: erased,
            counts: BlockCounts {
                total: grid.len(),
                structural: structural.len(),
                texture: texture.len(),
                removable: removable.len(),
            },
        }
    }

    /// Run the RESTORE phase in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] when the mask and image do not
    /// share pixel dimensions; no output is produced in that case.
    pub fn restore(&self, image: &RgbImage, mask: &GrayImage) -> Result<RgbImage> {
        if image.dimensions() != mask.dimensions() {
            return Err(Error::DimensionMismatch {
                image_width: image.width(),
                image_height: image.height(),
                mask_width: mask.width(),
                mask_height: mask.height(),
            });
        }
        Ok(inpaint(
            image,
            mask,
            self.config.inpaint_radius,
            self.config.inpaint_method,
        ))
    }

    /// REMOVE at the file boundary: load, reduce, persist both artifacts.
    ///
    /// The mask must target a PNG path; its marked/clear cells have to
    /// round-trip bit-for-bit for restore to honor the removal contract.
    /// Output formats are validated before anything is written, so a
    /// failure leaves no partial artifact set behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] for a missing input,
    /// [`Error::Decode`] when the input cannot be parsed, and
    /// [`Error::UnsupportedFormat`] / [`Error::Io`] / [`Error::Image`] for
    /// output problems.
    pub fn reduce_file(
        &self,
        input: &Path,
        image_out: &Path,
        mask_out: &Path,
    ) -> Result<ReduceReport> {
        let source = load_rgb(input)?;
        let input_bytes = std::fs::metadata(input)?.len();

        if ImageFormat::from_path(mask_out).ok() != Some(ImageFormat::Png) {
            return Err(Error::UnsupportedFormat(
                "mask must be written as PNG (lossless)".into(),
            ));
        }
        // Fail on a bad erased-image extension before writing the mask.
        let _ = ImageFormat::from_path(image_out)
            .map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

        let reduction = self.reduce(&source);

        ensure_parent(image_out)?;
        ensure_parent(mask_out)?;

        // The artifact set is all-or-nothing: a write failure after the
        // first file lands must not leave a lone artifact behind.
        let written = save_image(&reduction.image, image_out, self.config.jpeg_quality)
            .and_then(|()| reduction.mask.save(mask_out).map_err(Error::from));
        if let Err(e) = written {
            let _ = std::fs::remove_file(image_out);
            let _ = std::fs::remove_file(mask_out);
            return Err(e);
        }

        Ok(ReduceReport {
            input_bytes,
            image_path: image_out.to_path_buf(),
            image_bytes: std::fs::metadata(image_out)?.len(),
            mask_path: mask_out.to_path_buf(),
            mask_bytes: std::fs::metadata(mask_out)?.len(),
            counts: reduction.counts,
        })
    }

    /// RESTORE at the file boundary: load both artifacts, inpaint, persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] / [`Error::Decode`] for input
    /// problems and [`Error::DimensionMismatch`] when the pair disagrees on
    /// dimensions; the output file is only written on success.
    pub fn restore_file(
        &self,
        image_in: &Path,
        mask_in: &Path,
        output: &Path,
    ) -> Result<RestoreReport> {
        let image = load_rgb(image_in)?;
        let mask = load_mask(mask_in)?;

        let restored = self.restore(&image, &mask)?;

        ensure_parent(output)?;
        save_image(&restored, output, self.config.jpeg_quality)?;

        Ok(RestoreReport {
            output_path: output.to_path_buf(),
            output_bytes: std::fs::metadata(output)?.len(),
        })
    }
}

/// Load an image file as RGB.
fn load_rgb(path: &Path) -> Result<RgbImage> {
    if !path.exists() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(Error::Decode)?;
    Ok(img.to_rgb8())
}

/// Load a mask file as a single-channel image.
fn load_mask(path: &Path) -> Result<GrayImage> {
    if !path.exists() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }
    let img = image::open(path).map_err(Error::Decode)?;
    Ok(img.to_luma8())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGB image with format-specific quality settings.
///
/// JPEG output uses the configured quality; PNG, WebP and BMP go through the
/// default encoder. The format is taken from the path extension.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let dyn_img = DynamicImage::ImageRgb8(img.clone());

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, jpeg_quality);
            encoder.encode_image(&dyn_img)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            dyn_img.save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Default erased-image path: `photo.jpg` becomes `photo_reduced.jpg`.
#[must_use]
pub fn default_reduced_path(input: &Path) -> PathBuf {
    sibling_with_suffix(input, "reduced", None)
}

/// Default mask path: `photo.jpg` becomes `photo_mask.png`.
#[must_use]
pub fn default_mask_path(input: &Path) -> PathBuf {
    sibling_with_suffix(input, "mask", Some("png"))
}

/// Default restored-image path: `photo_reduced.jpg` becomes
/// `photo_reduced_restored.jpg`.
#[must_use]
pub fn default_restored_path(input: &Path) -> PathBuf {
    sibling_with_suffix(input, "restored", None)
}

fn sibling_with_suffix(input: &Path, suffix: &str, force_ext: Option<&str>) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = force_ext
        .map(str::to_string)
        .unwrap_or_else(|| input.extension().unwrap_or_default().to_string_lossy().to_string());
    let parent = input.parent().unwrap_or(Path::new("."));
    if ext.is_empty() {
        parent.join(format!("{stem}_{suffix}"))
    } else {
        parent.join(format!("{stem}_{suffix}.{ext}"))
    }
}
