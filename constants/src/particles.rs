/// Number of particles in the cloud, fixed for the whole session
pub const PARTICLE_COUNT: usize = 100_000;

/// Smallest chunk count the layout accepts
pub const MIN_CHUNKS: u32 = 1;

/// Largest chunk count the layout accepts
pub const MAX_CHUNKS: u32 = 20;

/// Chunk count used when a session starts
pub const DEFAULT_CHUNKS: u32 = 4;

/// Ring radius = RING_RADIUS_BASE + RING_RADIUS_PER_CHUNK * chunk_count
pub const RING_RADIUS_BASE: f32 = 0.4;
pub const RING_RADIUS_PER_CHUNK: f32 = 0.065;

/// Sphere radius = max(CHUNK_RADIUS_MIN, CHUNK_RADIUS_SCALE / sqrt(chunk_count))
pub const CHUNK_RADIUS_MIN: f32 = 0.1;
pub const CHUNK_RADIUS_SCALE: f32 = 0.55;

/// Box half size = max(BOX_HALF_MIN, BOX_HALF_SCALE / sqrt(chunk_count))
pub const BOX_HALF_MIN: f32 = 0.05;
pub const BOX_HALF_SCALE: f32 = 0.28;
