/// Whole-image masks: the largest outer shape, found by threshold or by edges
use constants::image_sampling::{EDGE_BLUR_SIGMA, EDGE_CANNY_HIGH, EDGE_CANNY_LOW};
use image::{GrayImage, Luma, RgbaImage, imageops};
use imageproc::contours::{Contour, find_contours};
use imageproc::contrast::otsu_level;
use imageproc::drawing::draw_polygon_mut;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::point::Point;

const FILLED: Luma<u8> = Luma([255]);

/// Otsu threshold with dark pixels as foreground, then the largest outer
/// contour filled.
pub fn contour_mask(image: &RgbaImage) -> Option<GrayImage> {
    let gray = imageops::grayscale(image);
    let level = otsu_level(&gray);
    let binary = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Luma([0])
        } else {
            FILLED
        }
    });
    fill_largest_contour(&binary)
}

/// Blurred Canny edges, then the largest outer contour filled.
pub fn edge_mask(image: &RgbaImage) -> Option<GrayImage> {
    let gray = imageops::grayscale(image);
    let blurred = gaussian_blur_f32(&gray, EDGE_BLUR_SIGMA);
    let edges = canny(&blurred, EDGE_CANNY_LOW, EDGE_CANNY_HIGH);
    fill_largest_contour(&edges)
}

/// Coordinates of every set pixel, in row-major order.
pub fn filled_pixels(mask: &GrayImage) -> Vec<(u32, u32)> {
    mask.enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[0] > 0)
        .map(|(x, y, _)| (x, y))
        .collect()
}

fn fill_largest_contour(binary: &GrayImage) -> Option<GrayImage> {
    let largest = find_contours::<i32>(binary)
        .into_iter()
        .filter(|contour| contour.parent.is_none())
        .max_by(|a, b| contour_area(a).total_cmp(&contour_area(b)))?;

    let mut points = largest.points;
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    let mut mask = GrayImage::new(binary.width(), binary.height());
    if points.len() < 3 {
        for p in &points {
            mask.put_pixel(p.x as u32, p.y as u32, FILLED);
        }
    } else {
        draw_polygon_mut(&mut mask, &points, FILLED);
    }
    log::debug!("Largest contour: {} points", points.len());
    Some(mask)
}

/// Shoelace area of the contour's polygon.
fn contour_area(contour: &Contour<i32>) -> f64 {
    let points: &[Point<i32>] = &contour.points;
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 / 2.0
}
