use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use block_prune::{
    default_mask_path, default_reduced_path, default_restored_path, InpaintMethod, PruneConfig,
    PruneEngine, Result,
};

#[derive(Parser)]
#[command(
    name = "blockprune",
    about = "Content-adaptive block pruning of raster images with inpainting-based restore",
    version,
    after_help = "Typical flow:\n  blockprune remove photo.jpg        (writes photo_reduced.jpg + photo_mask.png)\n  blockprune restore photo_reduced.jpg photo_mask.png\n\n\
                  Removal is lossy by design: erased blocks are resynthesized, not recovered."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Erase removable texture blocks, writing the erased image and its mask
    Remove {
        /// Input image file
        input: PathBuf,

        /// Erased image output (default: {name}_reduced.{ext})
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mask output, always PNG (default: {name}_mask.png)
        #[arg(short, long)]
        mask: Option<PathBuf>,

        /// Block side length in pixels
        #[arg(long, default_value_t = 8)]
        block_size: u32,

        /// Canny low hysteresis threshold
        #[arg(long, default_value_t = 100.0)]
        edge_low: f32,

        /// Canny high hysteresis threshold
        #[arg(long, default_value_t = 200.0)]
        edge_high: f32,

        /// Mean gradient magnitude ceiling for removable blocks
        #[arg(long, default_value_t = 5.0)]
        gradient_threshold: f32,

        /// Luminance variance ceiling for removable blocks
        #[arg(long, default_value_t = 500.0)]
        variance_threshold: f32,

        /// JPEG quality for the erased image (1-100)
        #[arg(long, default_value_t = 90)]
        quality: u8,
    },

    /// Rebuild the erased regions of a reduced image from its mask
    Restore {
        /// Reduced image file
        image: PathBuf,

        /// Mask file produced by the remove phase
        mask: PathBuf,

        /// Restored image output (default: {name}_restored.{ext})
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Inpainting neighborhood radius in pixels
        #[arg(short, long, default_value_t = 3)]
        radius: u32,

        /// Inpainting method
        #[arg(long, value_enum, default_value_t = InpaintMethod::FastMarching)]
        method: InpaintMethod,

        /// JPEG quality for the restored image (1-100)
        #[arg(long, default_value_t = 90)]
        quality: u8,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Remove {
            input,
            output,
            mask,
            block_size,
            edge_low,
            edge_high,
            gradient_threshold,
            variance_threshold,
            quality,
        } => {
            let config = PruneConfig {
                block_size: *block_size,
                edge_low: *edge_low,
                edge_high: *edge_high,
                gradient_threshold: *gradient_threshold,
                variance_threshold: *variance_threshold,
                jpeg_quality: *quality,
                ..PruneConfig::default()
            };
            let engine = PruneEngine::new(config)?;

            let image_out = output.clone().unwrap_or_else(|| default_reduced_path(input));
            let mask_out = mask.clone().unwrap_or_else(|| default_mask_path(input));

            let report = engine.reduce_file(input, &image_out, &mask_out)?;

            if !cli.quiet {
                let c = report.counts;
                eprintln!(
                    "[OK] {} -> {} + {}",
                    input.display(),
                    report.image_path.display(),
                    report.mask_path.display()
                );
                eprintln!(
                    "  blocks: {} total, {} structural, {} texture, {} removed",
                    c.total, c.structural, c.texture, c.removable
                );
                eprintln!(
                    "  sizes: input {:.2} KB -> image {:.2} KB + mask {:.2} KB",
                    kb(report.input_bytes),
                    kb(report.image_bytes),
                    kb(report.mask_bytes)
                );
                if report.image_bytes >= report.input_bytes {
                    eprintln!("  note: erased image is not smaller than the input; try lower thresholds or quality");
                }
            }
            Ok(())
        }

        Command::Restore {
            image,
            mask,
            output,
            radius,
            method,
            quality,
        } => {
            let config = PruneConfig {
                inpaint_radius: *radius,
                inpaint_method: *method,
                jpeg_quality: *quality,
                ..PruneConfig::default()
            };
            let engine = PruneEngine::new(config)?;

            let restored_out = output.clone().unwrap_or_else(|| default_restored_path(image));

            let report = engine.restore_file(image, mask, &restored_out)?;

            if !cli.quiet {
                eprintln!(
                    "[OK] {} + {} -> {} ({:.2} KB)",
                    image.display(),
                    mask.display(),
                    report.output_path.display(),
                    kb(report.output_bytes)
                );
            }
            Ok(())
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}
