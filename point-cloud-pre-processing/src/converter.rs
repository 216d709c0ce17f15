/// Image to point list conversion: mask, sample, map and write.
use crate::mask::{MaskKind, select_pixels};
use image::RgbaImage;
use point_cloud_morph::PointCloud;
use point_cloud_morph::image_sampler::pixel_to_point;
use point_cloud_morph::point_file::write_point_list;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

/// Conversion settings taken from the command line.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub count: usize,
    pub scale: f32,
    pub mask: MaskKind,
    pub use_brightness_for_z: bool,
    pub include_color: bool,
    pub seed: u64,
}

pub struct ImageToPointsConverter {
    input_path: PathBuf,
    output_path: PathBuf,
    options: ConvertOptions,
}

impl ImageToPointsConverter {
    pub fn new(input_path: &Path, output_path: &Path, options: ConvertOptions) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            options,
        }
    }

    /// Run the whole conversion and write the output file.
    pub fn convert(&self) -> Result<(), Box<dyn std::error::Error>> {
        println!("Converting {} to point list...", self.input_path.display());

        let image = image::open(&self.input_path)?.to_rgba8();
        let (width, height) = image.dimensions();
        println!("Image size: {}x{}", width, height);

        let pixels = select_pixels(&image, self.options.mask);
        if pixels.is_empty() {
            return Err(format!(
                "Mask for {} has no pixels; try another --method or an image with alpha",
                self.input_path.display()
            )
            .into());
        }
        println!("Mask pixels: {}", pixels.len());

        let cloud = sample_points(&image, &pixels, &self.options);
        write_point_list(&self.output_path, &cloud, self.options.include_color)?;

        println!(
            "Wrote {} points -> {}",
            cloud.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

/// Pick `count` points from the masked pixels.
///
/// Up to `count` distinct pixels are chosen without replacement. When the
/// mask is smaller than `count`, random already-chosen points are repeated
/// to make up the difference.
pub fn sample_points(
    image: &RgbaImage,
    pixels: &[(u32, u32)],
    options: &ConvertOptions,
) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let (width, height) = image.dimensions();
    let distinct = options.count.min(pixels.len());

    let mut positions = Vec::with_capacity(options.count);
    let mut colors = Vec::with_capacity(options.count);

    for index in rand::seq::index::sample(&mut rng, pixels.len(), distinct) {
        let (px, py) = pixels[index];
        let (mut position, color) = pixel_to_point(px, py, width, height, image.get_pixel(px, py));
        if !options.use_brightness_for_z {
            position[2] = 0.0;
        }
        position[0] *= options.scale;
        position[1] *= options.scale;
        positions.push(position);
        colors.push(color);
    }

    log::debug!(
        "Selected {} distinct pixels, padding {}",
        distinct,
        options.count - distinct
    );

    while positions.len() < options.count && distinct > 0 {
        let j = rng.random_range(0..distinct);
        positions.push(positions[j]);
        colors.push(colors[j]);
    }

    PointCloud { positions, colors }
}
