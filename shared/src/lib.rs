pub mod constants;
pub mod grid;
pub mod intent;
pub mod kinematics;

pub use constants::{
    ARENA_HALF_EXTENT, ARENA_SIZE, AVATAR_CENTER_Y, AVATAR_HEIGHT, AVATAR_RADIUS, AVATAR_SPEED,
    CAMERA_FOV_DEG, CAMERA_OFFSET, STATUS_BANNER_SECS, WALL_HEIGHT,
};
pub use grid::{Direction, DirectionsAvailable, GridVec, Moves, Position, border_blocks_move};
pub use intent::DirectionalIntent;
pub use kinematics::{KinematicState, planar_direction, step_kinematics};
