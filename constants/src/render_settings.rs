/// Start colour of the morph gradient (#ff88bb)
pub const COLOR_A: [f32; 3] = [1.0, 0x88 as f32 / 255.0, 0xbb as f32 / 255.0];

/// End colour of the morph gradient (#aaff88)
pub const COLOR_B: [f32; 3] = [0xaa as f32 / 255.0, 1.0, 0x88 as f32 / 255.0];

/// Additive glow added towards the centre of each point
pub const GLOW: f32 = 0.12;

/// Brightness with a single chunk
pub const POINT_BRIGHTNESS: f32 = 0.65;

/// Brightness with the maximum chunk count
pub const POINT_BRIGHTNESS_WHEN_MANY: f32 = 0.08;

/// Camera distance for small layouts
pub const CAMERA_BASE_Z: f32 = 1.0;

/// Camera distance grows with ring radius by this factor
pub const CAMERA_RING_FACTOR: f32 = 1.8;

pub const CAMERA_FOV_DEGREES: f32 = 60.0;

/// Scene clear colour (#0d0a14)
pub const BACKGROUND_COLOR: [f32; 3] = [0x0d as f32 / 255.0, 0x0a as f32 / 255.0, 0x14 as f32 / 255.0];

/// Screen-space point diameter in pixels
pub const POINT_SIZE_PX: f32 = 2.5;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
