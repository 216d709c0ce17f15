/// Parallel pixel mask extraction
use crate::shape_mask::{contour_mask, edge_mask, filled_pixels};
use image::{Rgba, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use point_cloud_morph::image_sampler::PixelMask;
use rayon::prelude::*;

/// How the converter chooses the pixels it samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    /// Per-pixel test, see [`PixelMask`].
    Pixels(PixelMask),
    /// Largest dark shape after an Otsu threshold.
    Contour,
    /// Largest closed outline found by edge detection.
    Edge,
}

/// Pixels selected by `kind`; empty when no shape is found.
pub fn select_pixels(image: &RgbaImage, kind: MaskKind) -> Vec<(u32, u32)> {
    match kind {
        MaskKind::Pixels(mask) => masked_pixels_parallel(image, mask),
        MaskKind::Contour => contour_mask(image)
            .map(|mask| filled_pixels(&mask))
            .unwrap_or_default(),
        MaskKind::Edge => edge_mask(image)
            .map(|mask| filled_pixels(&mask))
            .unwrap_or_default(),
    }
}

/// Rows handed to each rayon task.
const ROWS_PER_TASK: usize = 64;

/// Coordinates of every pixel `mask` keeps, in row-major order.
pub fn masked_pixels_parallel(image: &RgbaImage, mask: PixelMask) -> Vec<(u32, u32)> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let row_bytes = width as usize * 4;
    let task_bytes = row_bytes * ROWS_PER_TASK;
    let tasks = (height as usize).div_ceil(ROWS_PER_TASK);

    let pb = ProgressBar::new(tasks as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} row blocks ({percent}%) {msg}")
            .unwrap()
            .progress_chars("▉▊▋▌▍▎▏ "),
    );
    pb.set_message("Building mask");

    let pixels: Vec<(u32, u32)> = image
        .as_raw()
        .par_chunks(task_bytes)
        .enumerate()
        .flat_map_iter(|(task, block)| {
            let first_row = task * ROWS_PER_TASK;
            let mut kept = Vec::new();
            for (row, row_data) in block.chunks_exact(row_bytes).enumerate() {
                let y = (first_row + row) as u32;
                for (x, px) in row_data.chunks_exact(4).enumerate() {
                    if mask.contains(&Rgba([px[0], px[1], px[2], px[3]])) {
                        kept.push((x as u32, y));
                    }
                }
            }
            pb.inc(1);
            kept
        })
        .collect();

    pb.finish_with_message("Mask built");
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use point_cloud_morph::image_sampler::masked_pixels;

    #[test]
    fn matches_sequential_scan() {
        let mut image = RgbaImage::new(37, 150);
        for (x, y, px) in image.enumerate_pixels_mut() {
            let alpha = ((x * 7 + y * 3) % 256) as u8;
            *px = Rgba([200, (y % 256) as u8, 40, alpha]);
        }

        for mask in [PixelMask::Visible, PixelMask::Alpha(128)] {
            assert_eq!(
                masked_pixels_parallel(&image, mask),
                masked_pixels(&image, mask)
            );
        }
    }

    #[test]
    fn shape_masks_ignore_alpha() {
        let image = RgbaImage::from_fn(32, 32, |x, y| {
            if (8..24).contains(&x) && (8..24).contains(&y) {
                Rgba([20, 20, 20, 255])
            } else {
                Rgba([240, 240, 240, 0])
            }
        });
        let alpha = select_pixels(&image, MaskKind::Pixels(PixelMask::Alpha(128)));
        assert_eq!(alpha.len(), 256);
        let contour = select_pixels(&image, MaskKind::Contour);
        assert!(contour.contains(&(16, 16)));
        assert!(!contour.contains(&(2, 2)));
    }

    #[test]
    fn missing_shape_selects_nothing() {
        let flat = RgbaImage::from_pixel(8, 8, Rgba([200, 200, 200, 255]));
        assert!(select_pixels(&flat, MaskKind::Edge).is_empty());
    }

    #[test]
    fn empty_image_has_no_pixels() {
        assert!(masked_pixels_parallel(&RgbaImage::new(0, 0), PixelMask::Visible).is_empty());
    }
}
