/// Images are scanned at no more than this many pixels per axis
pub const MAX_IMAGE_DIMENSION: u32 = 512;

/// Pixels with alpha below this are treated as transparent
pub const MIN_VISIBLE_ALPHA: u8 = 20;

/// Fully opaque pixels at or above this luma count as background
pub const BACKGROUND_LUMA: f32 = 0.98;

/// Depth offset per unit of luma (brighter pixels sit closer to the viewer)
pub const LUMA_DEPTH_SCALE: f32 = 0.2;

/// Alpha threshold used by the converter's alpha mask
pub const DEFAULT_ALPHA_MASK_THRESHOLD: u8 = 128;

/// Point count written by the converter when none is given
pub const DEFAULT_EXPORT_POINT_COUNT: usize = 24_000;

/// Seed the converter uses so repeated runs produce identical files
pub const DEFAULT_EXPORT_SEED: u64 = 42;

/// Image applied when a session starts, relative to the asset root
pub const DEFAULT_IMAGE: &str = "default.png";

/// Blur applied before edge detection (matches a 5x5 Gaussian kernel)
pub const EDGE_BLUR_SIGMA: f32 = 1.1;

/// Canny hysteresis thresholds for the converter's edge mask
pub const EDGE_CANNY_LOW: f32 = 50.0;
pub const EDGE_CANNY_HIGH: f32 = 150.0;
