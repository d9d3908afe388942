//! Per-frame motion integration for the local avatar.
//!
//! # Model
//! - Motion is planar: only the x and z components of the position move.
//! - Each frame the held intent flags produce a direction of magnitude 0 or
//!   exactly 1, the frame velocity is derived from it, and the position is
//!   advanced and clamped to the arena.
//! - Velocity is recomputed from intent every frame rather than accumulated
//!   across frames, so held keys give constant-speed motion.
//!
//! The planar `Vector2` convention throughout is `x` = world x, `y` = world z.

use nalgebra as na;

use crate::constants::{ARENA_HALF_EXTENT, AVATAR_CENTER_Y, AVATAR_SPEED};
use crate::intent::DirectionalIntent;

/// Kinematic state of the avatar, owned by the integrator.
///
/// The render layer reads `position` each frame to place the avatar mesh and
/// to derive the camera focus; nothing else writes these fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicState {
    /// Velocity applied this frame, planar (x, z) in meters.
    pub velocity: na::Vector2<f32>,
    /// World position of the avatar's center.
    pub position: na::Point3<f32>,
}

impl KinematicState {
    /// The avatar's rest pose at the arena center.
    pub fn at_spawn() -> Self {
        Self {
            velocity: na::Vector2::zeros(),
            position: na::Point3::new(0.0, AVATAR_CENTER_Y, 0.0),
        }
    }
}

impl Default for KinematicState {
    fn default() -> Self {
        Self::at_spawn()
    }
}

/// Normalized planar movement direction for the held intent flags.
///
/// Magnitude is exactly 0 (no keys, or opposing keys cancelling) or exactly 1.
#[inline]
pub fn planar_direction(intent: DirectionalIntent) -> na::Vector2<f32> {
    let (x, z) = intent.planar_axes();
    let dir = na::Vector2::new(x, z);
    if dir.norm_squared() > 0.0 {
        dir.normalize()
    } else {
        dir
    }
}

/// Advance the avatar by one rendered frame.
///
/// Derives the frame velocity from `intent` at [`AVATAR_SPEED`], integrates
/// the planar position, and clamps x and z independently to
/// `[-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT]`. The y component is untouched.
///
/// Negative frame deltas are treated as zero; there are no failure modes.
#[inline]
pub fn step_kinematics(state: &mut KinematicState, intent: DirectionalIntent, dt_seconds: f32) {
    let dt = dt_seconds.max(0.0);

    state.velocity = planar_direction(intent) * (AVATAR_SPEED * dt);

    state.position.x =
        (state.position.x + state.velocity.x).clamp(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT);
    state.position.z =
        (state.position.z + state.velocity.y).clamp(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(forward: bool, backward: bool, left: bool, right: bool) -> DirectionalIntent {
        DirectionalIntent {
            forward,
            backward,
            left,
            right,
        }
    }

    #[test]
    fn direction_magnitude_is_zero_or_one() {
        let all = [false, true];
        for &f in &all {
            for &b in &all {
                for &l in &all {
                    for &r in &all {
                        let mag = planar_direction(held(f, b, l, r)).norm();
                        assert!(
                            mag == 0.0 || (mag - 1.0).abs() < 1.0e-6,
                            "magnitude {mag} for flags ({f},{b},{l},{r})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn forward_for_a_tenth_of_a_second_moves_half_a_meter_toward_negative_z() {
        let mut state = KinematicState::at_spawn();
        step_kinematics(&mut state, held(true, false, false, false), 0.1);

        assert_eq!(state.velocity, na::Vector2::new(0.0, -0.5));
        assert_eq!(state.position, na::Point3::new(0.0, 0.8, -0.5));
    }

    #[test]
    fn right_near_the_edge_clamps_to_the_boundary() {
        let mut state = KinematicState::at_spawn();
        state.position.x = 8.9;

        step_kinematics(&mut state, held(false, false, false, true), 1.0);

        // Unclamped this would land at 13.9.
        assert_eq!(state.position.x, 9.0);
    }

    #[test]
    fn clamp_invariant_holds_for_long_held_input() {
        let mut state = KinematicState::at_spawn();
        let intent = held(false, true, true, false);

        for _ in 0..600 {
            step_kinematics(&mut state, intent, 1.0 / 60.0);
            assert!(state.position.x >= -ARENA_HALF_EXTENT && state.position.x <= ARENA_HALF_EXTENT);
            assert!(state.position.z >= -ARENA_HALF_EXTENT && state.position.z <= ARENA_HALF_EXTENT);
        }

        // 10 seconds of diagonal input is plenty to reach the corner.
        assert_eq!(state.position.x, -ARENA_HALF_EXTENT);
        assert_eq!(state.position.z, ARENA_HALF_EXTENT);
    }

    #[test]
    fn no_held_keys_leaves_position_fixed() {
        let mut state = KinematicState::at_spawn();
        state.position.x = 3.0;
        state.position.z = -4.0;
        let before = state.position;

        for _ in 0..120 {
            step_kinematics(&mut state, DirectionalIntent::default(), 1.0 / 60.0);
        }

        assert_eq!(state.position, before);
        assert_eq!(state.velocity, na::Vector2::zeros());
    }

    #[test]
    fn opposing_keys_cancel_exactly() {
        let mut state = KinematicState::at_spawn();
        let before = state.position;

        step_kinematics(&mut state, held(true, true, true, true), 0.5);

        assert_eq!(state.position, before);
    }

    #[test]
    fn diagonal_speed_matches_cardinal_speed() {
        let mut cardinal = KinematicState::at_spawn();
        let mut diagonal = KinematicState::at_spawn();

        step_kinematics(&mut cardinal, held(true, false, false, false), 0.2);
        step_kinematics(&mut diagonal, held(true, false, false, true), 0.2);

        let cardinal_dist = na::distance(&KinematicState::at_spawn().position, &cardinal.position);
        let diagonal_dist = na::distance(&KinematicState::at_spawn().position, &diagonal.position);
        assert!((cardinal_dist - diagonal_dist).abs() < 1.0e-6);
    }

    #[test]
    fn negative_delta_is_a_no_op() {
        let mut state = KinematicState::at_spawn();
        let before = state.position;

        step_kinematics(&mut state, held(true, false, false, false), -0.25);

        assert_eq!(state.position, before);
    }

    #[test]
    fn y_component_never_changes() {
        let mut state = KinematicState::at_spawn();
        for _ in 0..100 {
            step_kinematics(&mut state, held(true, false, true, false), 0.016);
        }
        assert_eq!(state.position.y, AVATAR_CENTER_Y);
    }
}
