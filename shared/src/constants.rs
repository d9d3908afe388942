/// Planar movement speed of the local avatar in world units per second.
pub const AVATAR_SPEED: f32 = 5.0;

/// Half-extent of the playable area on the x and z axes (meters).
///
/// The avatar's planar position is clamped to
/// `[-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT]` after every integration step.
/// The visible arena is slightly larger so the avatar never clips a wall.
pub const ARENA_HALF_EXTENT: f32 = 9.0;

/// Side length of the ground plane (meters). The four walls sit on its edges.
pub const ARENA_SIZE: f32 = 20.0;

/// Height of the four arena walls (meters).
pub const WALL_HEIGHT: f32 = 10.0;

/// Capsule radius of the avatar (meters).
pub const AVATAR_RADIUS: f32 = 0.2;

/// Total height of the avatar capsule, caps included (meters).
pub const AVATAR_HEIGHT: f32 = 1.6;

/// Resting height of the avatar's center above the ground (meters).
pub const AVATAR_CENTER_Y: f32 = 0.8;

/// Vertical field of view of the scene camera (degrees).
pub const CAMERA_FOV_DEG: f32 = 50.0;

/// Initial camera offset from the arena origin (meters).
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 2.0, 10.0];

/// How long a transient status banner stays on screen (seconds).
pub const STATUS_BANNER_SECS: f32 = 3.0;
