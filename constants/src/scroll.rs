/// Progress at which the reveal flag turns on (no hysteresis)
pub const REVEAL_THRESHOLD: f32 = 0.99;

/// Progress at which the idle spin starts running every frame
pub const IDLE_THRESHOLD: f32 = 0.999;

/// Idle spin in radians per rendered frame
pub const IDLE_ROTATE_SPEED: f32 = 0.008;

/// Per-frame smoothing factor of the host scroll tracker
pub const SCROLL_LERP: f32 = 0.08;

/// Virtual scroll distance (px) that maps to progress 0..1
pub const SCROLL_LENGTH_PX: f32 = 3000.0;

/// Pixels scrolled per wheel line
pub const WHEEL_LINE_PX: f32 = 40.0;
