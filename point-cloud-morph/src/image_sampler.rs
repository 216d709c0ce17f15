/// Raster image to point cloud conversion by random sampling of visible pixels
use constants::image_sampling::{BACKGROUND_LUMA, LUMA_DEPTH_SCALE, MIN_VISIBLE_ALPHA};
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;
use rand::Rng;

use crate::error::{MorphError, Result};

/// Target positions with one colour per position.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl PointCloud {
    /// Cloud of `count` identical points.
    pub fn uniform(count: usize, position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            positions: vec![position; count],
            colors: vec![color; count],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Repeat or truncate so the cloud holds exactly `count` points.
    /// Slot `i` takes point `i % len`.
    pub fn fit_to(mut self, count: usize) -> Self {
        if self.is_empty() || self.len() == count {
            return self;
        }
        self.positions = self.positions.iter().copied().cycle().take(count).collect();
        self.colors = self.colors.iter().copied().cycle().take(count).collect();
        self
    }
}

/// Which pixels of an image take part in sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMask {
    /// Drop transparent pixels and opaque near-white background.
    Visible,
    /// Keep pixels whose alpha reaches the threshold.
    Alpha(u8),
}

impl PixelMask {
    pub fn contains(&self, pixel: &Rgba<u8>) -> bool {
        match *self {
            Self::Visible => is_visible(pixel),
            Self::Alpha(threshold) => pixel[3] >= threshold,
        }
    }
}

/// Perceptual brightness in `[0, 1]` of an 8-bit RGB triple.
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Visible pixels have some opacity and are not flat opaque background.
pub fn is_visible(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    a >= MIN_VISIBLE_ALPHA && (a < 255 || luma(r, g, b) < BACKGROUND_LUMA)
}

/// Coordinates of every pixel the mask keeps, in row-major order.
pub fn masked_pixels(image: &RgbaImage, mask: PixelMask) -> Vec<(u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| mask.contains(pixel))
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Map a pixel to its point position and colour.
///
/// x and y are centred and divided by the longer image side, y grows
/// upwards, and brighter pixels move towards the viewer along -z.
pub fn pixel_to_point(
    px: u32,
    py: u32,
    width: u32,
    height: u32,
    pixel: &Rgba<u8>,
) -> ([f32; 3], [f32; 3]) {
    let [r, g, b, _] = pixel.0;
    let size = width.max(height) as f32;
    let x = (px as f32 - width as f32 / 2.0) / size;
    let y = -(py as f32 - height as f32 / 2.0) / size;
    let z = -luma(r, g, b) * LUMA_DEPTH_SCALE;

    (
        [x, y, z],
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0],
    )
}

/// Sample `count` points from the visible pixels of `image`.
///
/// Each point picks a visible pixel uniformly at random with replacement,
/// so duplicates are expected. Returns `None` when nothing is visible.
pub fn sample_image<R: Rng + ?Sized>(
    image: &RgbaImage,
    count: usize,
    rng: &mut R,
) -> Option<PointCloud> {
    let visible = masked_pixels(image, PixelMask::Visible);
    if visible.is_empty() {
        return None;
    }

    let (width, height) = image.dimensions();
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    for _ in 0..count {
        let (px, py) = visible[rng.random_range(0..visible.len())];
        let (position, color) = pixel_to_point(px, py, width, height, image.get_pixel(px, py));
        positions.push(position);
        colors.push(color);
    }

    debug!(
        "Sampled {} points from {} visible pixels ({}x{})",
        count,
        visible.len(),
        width,
        height
    );

    Some(PointCloud { positions, colors })
}

/// Scale an image so neither side exceeds `max_dimension`.
///
/// Each axis is clamped on its own, which matches drawing the image into a
/// canvas of `min(w, max) x min(h, max)`.
pub fn prepare_image(image: &DynamicImage, max_dimension: u32) -> RgbaImage {
    let (width, height) = (image.width(), image.height());
    let (w, h) = (width.min(max_dimension), height.min(max_dimension));

    if (w, h) == (width, height) {
        image.to_rgba8()
    } else {
        image.resize_exact(w, h, FilterType::Triangle).to_rgba8()
    }
}

/// Decode an encoded image (PNG, JPEG, ...) from memory.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Decode, downscale and sample an encoded image in one step.
pub fn sample_image_bytes<R: Rng + ?Sized>(
    bytes: &[u8],
    count: usize,
    max_dimension: u32,
    rng: &mut R,
) -> Result<PointCloud> {
    let decoded = decode_image(bytes)?;
    let prepared = prepare_image(&decoded, max_dimension);
    sample_image(&prepared, count, rng).ok_or(MorphError::NoVisiblePixels)
}
