/// Procedural chunk layouts: spheres (source) and boxes (target) on a ring
use std::f64::consts::PI;
use std::ops::Range;

use constants::particles::{
    BOX_HALF_MIN, BOX_HALF_SCALE, CHUNK_RADIUS_MIN, CHUNK_RADIUS_SCALE, MAX_CHUNKS, MIN_CHUNKS,
    RING_RADIUS_BASE, RING_RADIUS_PER_CHUNK,
};
use log::debug;

use crate::error::{MorphError, Result};
use crate::image_sampler::PointCloud;

/// Scale parameters derived from a chunk count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkLayoutSpec {
    pub chunk_count: u32,
    /// Radius of the ring the chunk centres sit on.
    pub ring_radius: f32,
    /// Radius of each sphere in the source layout.
    pub chunk_radius: f32,
    /// Half edge length of each box in the target layout.
    pub box_half: f32,
}

impl ChunkLayoutSpec {
    /// Derive the ring and chunk scales for `chunk_count` chunks.
    pub fn new(chunk_count: u32) -> Self {
        debug_assert!(chunk_count >= 1, "chunk count must be at least 1");
        let n = chunk_count.max(1) as f32;
        Self {
            chunk_count,
            ring_radius: RING_RADIUS_BASE + RING_RADIUS_PER_CHUNK * n,
            chunk_radius: CHUNK_RADIUS_MIN.max(CHUNK_RADIUS_SCALE / n.sqrt()),
            box_half: BOX_HALF_MIN.max(BOX_HALF_SCALE / n.sqrt()),
        }
    }

    /// Centre of chunk `chunk` on the ring. A single chunk sits at the origin.
    pub fn center(&self, chunk: u32) -> [f32; 3] {
        if self.chunk_count <= 1 {
            return [0.0, 0.0, 0.0];
        }
        let angle = chunk as f64 / self.chunk_count as f64 * PI * 2.0;
        let r = self.ring_radius as f64;
        [(r * angle.cos()) as f32, (r * angle.sin()) as f32, 0.0]
    }
}

/// Clamp a requested chunk count into `[min, max]`.
pub fn clamp_chunk_count(requested: i64, min: u32, max: u32) -> u32 {
    requested.clamp(min as i64, max as i64) as u32
}

/// Contiguous particle ranges, one per chunk, in chunk order.
///
/// Every chunk gets `particle_count / chunk_count` particles and the last
/// one also takes the remainder, so the ranges partition `0..particle_count`.
pub fn chunk_ranges(particle_count: usize, chunk_count: u32) -> Vec<Range<usize>> {
    let chunks = chunk_count.max(1) as usize;
    let per_chunk = particle_count / chunks;

    (0..chunks)
        .map(|c| {
            let start = c * per_chunk;
            let end = if c == chunks - 1 {
                particle_count
            } else {
                start + per_chunk
            };
            start..end
        })
        .collect()
}

/// Fibonacci-style sphere shell. Deterministic for a given input.
pub fn sphere_chunk(count: usize, radius: f32, center: [f32; 3]) -> Vec<[f32; 3]> {
    let n = count as f64;
    let r = radius as f64;
    let spiral = (n * PI).sqrt();

    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f64 / n).acos();
            let theta = spiral * phi;
            [
                center[0] + (r * theta.cos() * phi.sin()) as f32,
                center[1] + (r * theta.sin() * phi.sin()) as f32,
                center[2] + (r * phi.cos()) as f32,
            ]
        })
        .collect()
}

/// Side length of the smallest cube grid holding `count` cells.
fn grid_side(count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let mut side = (count as f64).cbrt().round() as usize;
    while side.pow(3) < count {
        side += 1;
    }
    while side > 1 && (side - 1).pow(3) >= count {
        side -= 1;
    }
    side
}

/// Regular grid filling a cube of half size `half_size`.
///
/// Cells are emitted in x, then y, then z order. When the grid holds more
/// cells than `count`, the trailing cells are left out.
pub fn box_chunk(count: usize, half_size: f32, center: [f32; 3]) -> Vec<[f32; 3]> {
    let grid = grid_side(count);
    let axis = |cell: usize| -> f32 {
        if grid <= 1 {
            0.0
        } else {
            cell as f32 / (grid - 1) as f32 * 2.0 - 1.0
        }
    };

    (0..count)
        .map(|i| {
            let x = axis(i % grid);
            let y = axis((i / grid) % grid);
            let z = axis((i / (grid * grid)) % grid);
            [
                center[0] + x * half_size,
                center[1] + y * half_size,
                center[2] + z * half_size,
            ]
        })
        .collect()
}

/// Source and target position buffers of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkLayout {
    pub source: Vec<[f32; 3]>,
    pub target: Vec<[f32; 3]>,
}

/// Build the sphere (source) and box (target) layouts for `chunk_count` chunks.
///
/// Callers clamp the count; an out-of-range value is rejected. When `image`
/// is given its positions replace the box target wholesale, while the
/// sphere source is unaffected.
pub fn generate_chunk_layout(
    chunk_count: u32,
    particle_count: usize,
    image: Option<&PointCloud>,
) -> Result<ChunkLayout> {
    if !(MIN_CHUNKS..=MAX_CHUNKS).contains(&chunk_count) {
        return Err(MorphError::InvalidChunkCount {
            count: chunk_count,
            min: MIN_CHUNKS,
            max: MAX_CHUNKS,
        });
    }

    let spec = ChunkLayoutSpec::new(chunk_count);
    let mut source = Vec::with_capacity(particle_count);
    let mut target = Vec::with_capacity(particle_count);

    for (chunk, range) in chunk_ranges(particle_count, chunk_count).into_iter().enumerate() {
        let center = spec.center(chunk as u32);
        source.extend(sphere_chunk(range.len(), spec.chunk_radius, center));
        target.extend(box_chunk(range.len(), spec.box_half, center));
    }

    if let Some(cloud) = image.filter(|cloud| !cloud.is_empty()) {
        target.clear();
        target.extend(cloud.positions.iter().cycle().take(particle_count));
    }

    debug!(
        "Generated layout: {} chunks, {} particles, ring radius {:.3}",
        chunk_count, particle_count, spec.ring_radius
    );

    Ok(ChunkLayout { source, target })
}
