/// Raster image to JSON point list converter main entry point
mod converter;
mod mask;
mod shape_mask;

use clap::{Parser, ValueEnum};
use constants::image_sampling::{
    DEFAULT_ALPHA_MASK_THRESHOLD, DEFAULT_EXPORT_POINT_COUNT, DEFAULT_EXPORT_SEED,
};
use converter::{ConvertOptions, ImageToPointsConverter};
use mask::MaskKind;
use point_cloud_morph::image_sampler::PixelMask;
use std::path::PathBuf;

/// Build a point list (`[[x,y,z,r,g,b], ...]`) from an image for use as a morph target.
#[derive(Parser, Debug)]
#[command(name = "image-to-points", version)]
struct Cli {
    /// Input image (PNG with alpha works best)
    input: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "face-points.json")]
    output: PathBuf,

    /// Number of points to write
    #[arg(short = 'n', long, default_value_t = DEFAULT_EXPORT_POINT_COUNT)]
    count: usize,

    /// Multiplier for x and y (1.0 keeps roughly [-0.5, 0.5])
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// How pixels are selected
    #[arg(long, value_enum, default_value_t = MaskMethod::Alpha)]
    method: MaskMethod,

    /// Minimum alpha for the alpha mask
    #[arg(long, default_value_t = DEFAULT_ALPHA_MASK_THRESHOLD)]
    alpha_threshold: u8,

    /// Write z = 0 instead of a brightness-derived depth
    #[arg(long)]
    no_z: bool,

    /// Write positions only
    #[arg(long)]
    no_color: bool,

    /// Seed for point selection
    #[arg(long, default_value_t = DEFAULT_EXPORT_SEED)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MaskMethod {
    /// Alpha at or above the threshold
    Alpha,
    /// Non-transparent pixels that are not opaque near-white background
    Visible,
    /// Largest dark shape after an Otsu threshold, filled
    Contour,
    /// Largest outline from blurred Canny edges, filled
    Edge,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if !cli.input.exists() {
        eprintln!("Input file not found: {}", cli.input.display());
        std::process::exit(1);
    }
    if cli.count == 0 {
        eprintln!("Point count must be positive");
        std::process::exit(1);
    }

    let options = ConvertOptions {
        count: cli.count,
        scale: cli.scale,
        mask: match cli.method {
            MaskMethod::Alpha => MaskKind::Pixels(PixelMask::Alpha(cli.alpha_threshold)),
            MaskMethod::Visible => MaskKind::Pixels(PixelMask::Visible),
            MaskMethod::Contour => MaskKind::Contour,
            MaskMethod::Edge => MaskKind::Edge,
        },
        use_brightness_for_z: !cli.no_z,
        include_color: !cli.no_color,
        seed: cli.seed,
    };

    let converter = ImageToPointsConverter::new(&cli.input, &cli.output, options);
    converter.convert()?;

    Ok(())
}
