use bevy::prelude::*;
use bevy_cave::drop::{DropBeacon, SupplyCrate};
use bevy_cave::tracking::{TrackedHead, TrackedWand};
use bevy_rapier3d::prelude::*;

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // ground
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Plane3d::default().mesh().size(200.0, 200.0)),
            material: materials.add(Color::rgb(0.3, 0.5, 0.3)),
            ..default()
        },
        Collider::cuboid(100.0, 0.05, 100.0),
    ));

    // the crate, hidden until a drop is committed
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::from_size(Vec3::splat(2.0))),
            material: materials.add(Color::rgb(0.6, 0.4, 0.2)),
            visibility: Visibility::Hidden,
            ..default()
        },
        SupplyCrate,
    ));

    // beacon marking the requested drop point
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cylinder::new(0.2, 3.0)),
            material: materials.add(Color::rgb(0.9, 0.1, 0.1)),
            transform: Transform::from_xyz(0.0, 1.5, 0.0),
            ..default()
        },
        DropBeacon,
    ));

    // tracked rig targets
    commands.spawn((SpatialBundle::default(), TrackedHead));
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::from_size(Vec3::new(0.05, 0.05, 0.3))),
            material: materials.add(Color::rgb(0.2, 0.2, 0.8)),
            ..default()
        },
        TrackedWand,
    ));

    commands.spawn(PointLightBundle {
        transform: Transform::from_xyz(10.0, 20.0, 10.0),
        ..default()
    });

    commands.spawn(Camera3dBundle {
        transform: Transform::from_xyz(0.0, 25.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}
