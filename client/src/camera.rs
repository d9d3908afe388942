use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use shared::{CAMERA_FOV_DEG, CAMERA_OFFSET};

use crate::avatar::Avatar;

/// How quickly the orbit focus catches up to the avatar.
const FOCUS_DECAY_RATE: f32 = 12.0;
/// Radians of rotation per pixel of mouse drag.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Fraction of the radius added or removed per scroll line.
const ZOOM_STEP: f32 = 0.1;
const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 40.0;
/// Keep the pitch shy of the poles so the view never flips.
const PITCH_LIMIT: f32 = 1.5;

/// Orbit-style camera rig: user-controlled yaw/pitch/zoom around a focus
/// point that trails the avatar.
#[derive(Resource, Debug)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub focus: Vec3,
}

impl Default for OrbitState {
    fn default() -> Self {
        let offset = Vec3::from_array(CAMERA_OFFSET);
        Self {
            yaw: 0.0,
            pitch: (offset.y / offset.length()).asin(),
            radius: offset.length(),
            focus: Vec3::ZERO,
        }
    }
}

impl OrbitState {
    /// Camera offset from the focus for the current yaw/pitch/radius.
    fn offset(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(
            self.radius * cos_pitch * sin_yaw,
            self.radius * sin_pitch,
            self.radius * cos_pitch * cos_yaw,
        )
    }
}

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<OrbitState>();
    app.add_systems(Startup, add_camera);
    app.add_systems(Update, orbit_control);
    app.add_systems(PostUpdate, follow_avatar);
}

fn add_camera(mut commands: Commands, orbit: Res<OrbitState>) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: CAMERA_FOV_DEG.to_radians(),
            ..default()
        }),
        Transform::from_translation(orbit.focus + orbit.offset())
            .looking_at(orbit.focus, Vec3::Y),
    ));
}

/// Left-drag rotates, the wheel zooms. Avatar motion moves the focus in
/// `follow_avatar`, so orbiting and walking compose.
fn orbit_control(
    mut orbit: ResMut<OrbitState>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut motions: MessageReader<MouseMotion>,
    mut wheels: MessageReader<MouseWheel>,
) {
    if buttons.pressed(MouseButton::Left) {
        for motion in motions.read() {
            orbit.yaw -= motion.delta.x * ORBIT_SENSITIVITY;
            orbit.pitch = (orbit.pitch + motion.delta.y * ORBIT_SENSITIVITY)
                .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    } else {
        motions.clear();
    }

    for wheel in wheels.read() {
        let lines = match wheel.unit {
            MouseScrollUnit::Line => wheel.y,
            MouseScrollUnit::Pixel => wheel.y / 20.0,
        };
        orbit.radius = (orbit.radius * (1.0 - lines * ZOOM_STEP)).clamp(MIN_RADIUS, MAX_RADIUS);
    }
}

fn follow_avatar(
    time: Res<Time>,
    mut orbit: ResMut<OrbitState>,
    avatar: Single<&Transform, (With<Avatar>, Without<Camera3d>)>,
    mut camera: Single<&mut Transform, With<Camera3d>>,
) {
    let target = avatar.translation;
    orbit
        .focus
        .smooth_nudge(&target, FOCUS_DECAY_RATE, time.delta_secs());

    let focus = orbit.focus;
    camera.translation = focus + orbit.offset();
    camera.look_at(focus, Vec3::Y);
}
