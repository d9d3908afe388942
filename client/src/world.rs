use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use shared::{ARENA_SIZE, WALL_HEIGHT};

pub(super) fn plugin(app: &mut App) {
    app.insert_resource(ClearColor(Color::srgb_u8(0x87, 0xce, 0xeb)));
    app.add_systems(Startup, setup);
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let arena_material = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(128, 128, 128),
        perceptual_roughness: 1.0,
        metallic: 0.0,
        ..default()
    });

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(ARENA_SIZE, ARENA_SIZE).build())),
        MeshMaterial3d(arena_material.clone()),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    // Four walls closing the arena, each facing inward. The wall plane is
    // built flat and stood upright, then yawed into place.
    let half = ARENA_SIZE / 2.0;
    let wall_mesh = meshes.add(Plane3d::default().mesh().size(ARENA_SIZE, WALL_HEIGHT).build());
    let stand_north = Quat::from_rotation_x(FRAC_PI_2);
    let stand_south = Quat::from_rotation_x(-FRAC_PI_2);
    let yaw_east = Quat::from_rotation_y(FRAC_PI_2);
    let walls = [
        (Vec3::new(0.0, WALL_HEIGHT / 2.0, -half), stand_north),
        (Vec3::new(0.0, WALL_HEIGHT / 2.0, half), stand_south),
        (Vec3::new(-half, WALL_HEIGHT / 2.0, 0.0), yaw_east * stand_north),
        (Vec3::new(half, WALL_HEIGHT / 2.0, 0.0), yaw_east * stand_south),
    ];
    for (translation, rotation) in walls {
        commands.spawn((
            Mesh3d(wall_mesh.clone()),
            MeshMaterial3d(arena_material.clone()),
            Transform {
                translation,
                rotation,
                scale: Vec3::ONE,
            },
        ));
    }

    // Lights
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 200.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 0.0).with_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
    ));
}
