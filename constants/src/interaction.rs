/// Horizontal travel (px) a swipe needs before it changes the chunk count
pub const SWIPE_THRESHOLD_PX: f32 = 50.0;

/// Delay before a held chunk button starts repeating
pub const HOLD_DELAY_MS: u64 = 400;

/// Period between repeated ticks of a held chunk button
pub const HOLD_INTERVAL_MS: u64 = 80;

/// Radians of rotation per pixel of pointer drag
pub const ROTATE_SPEED: f32 = 0.005;
