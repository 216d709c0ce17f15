use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use constants::render_settings::{BACKGROUND_COLOR, CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR};

use crate::engine::core::session::MorphSessionResource;
use crate::engine::mesh::particle_mesh::create_particle_mesh;
use crate::engine::shaders::{MorphUniform, ParticleMorphMaterial};

#[derive(Component)]
pub struct MorphCamera;

/// Outer group rotated by pointer drags.
#[derive(Component)]
pub struct DragGroup;

/// The particle mesh itself, spun around Y by scroll and idle rotation.
#[derive(Component)]
pub struct ParticlePoints;

pub fn background_color() -> ClearColor {
    let [r, g, b] = BACKGROUND_COLOR;
    ClearColor(Color::srgb(r, g, b))
}

pub fn spawn_morph_scene(
    mut commands: Commands,
    session: Res<MorphSessionResource>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ParticleMorphMaterial>>,
) {
    let params = session.0.frame_params();

    commands.spawn((
        MorphCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Tonemapping::None,
        Transform::from_xyz(0.0, 0.0, params.camera_z),
    ));

    let mesh = meshes.add(create_particle_mesh(session.0.particles()));
    let material = materials.add(ParticleMorphMaterial {
        params: MorphUniform::from_frame(&params),
    });

    commands
        .spawn((
            DragGroup,
            Name::new("DragGroup"),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|group| {
            group.spawn((
                ParticlePoints,
                Name::new("ParticlePoints"),
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_rotation(Quat::from_rotation_y(params.spin_y)),
                // Vertices move on the GPU, so bounds computed on the CPU are meaningless.
                NoFrustumCulling,
            ));
        });

    info!(
        "Spawned {} particles in {} chunks",
        session.0.particle_count(),
        session.0.chunk_count()
    );
}
