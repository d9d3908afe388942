use bevy::prelude::*;

use shared::{AVATAR_CENTER_Y, AVATAR_HEIGHT, AVATAR_RADIUS, KinematicState, step_kinematics};

use crate::input::IntentState;

#[derive(Component)]
pub struct Avatar;

/// Kinematic state of the local avatar. `integrate` is the single writer;
/// the camera and the avatar mesh read the resulting transform.
#[derive(Resource, Default, Debug)]
pub struct AvatarKinematics(pub KinematicState);

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<AvatarKinematics>();
    app.add_systems(Startup, spawn_avatar);
    app.add_systems(Update, integrate);
}

fn spawn_avatar(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Avatar,
        Mesh3d(meshes.add(Mesh::from(Capsule3d {
            radius: AVATAR_RADIUS,
            half_length: (AVATAR_HEIGHT - 2.0 * AVATAR_RADIUS) / 2.0,
        }))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.9, 0.3),
            ..default()
        })),
        Transform::from_xyz(0.0, AVATAR_CENTER_Y, 0.0),
    ));
}

/// Advance the avatar by this frame's delta and write the result back to the
/// scene transform, all within the same frame the renderer draws.
pub(super) fn integrate(
    time: Res<Time>,
    intent: Res<IntentState>,
    mut kinematics: ResMut<AvatarKinematics>,
    mut avatar: Single<&mut Transform, With<Avatar>>,
) {
    step_kinematics(&mut kinematics.0, intent.0, time.delta_secs());

    let position = kinematics.0.position;
    avatar.translation = Vec3::new(position.x, position.y, position.z);
}
