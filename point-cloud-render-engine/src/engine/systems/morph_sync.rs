/// Per-frame transfer of session state to the GPU side of the scene
use bevy::prelude::*;

use crate::engine::core::session::MorphSessionResource;
use crate::engine::mesh::particle_mesh::{write_colors, write_positions};
use crate::engine::scene::particles::{DragGroup, MorphCamera, ParticlePoints};
use crate::engine::shaders::{MorphUniform, ParticleMorphMaterial};

/// Rewrite mesh attributes the session marked dirty.
pub fn sync_particle_buffers(
    mut session: ResMut<MorphSessionResource>,
    mut meshes: ResMut<Assets<Mesh>>,
    points: Query<&Mesh3d, With<ParticlePoints>>,
) {
    let changes = session.0.take_changes();
    if !changes.any() {
        return;
    }

    let particles = session.0.particles();
    for mesh3d in &points {
        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };
        if changes.positions {
            write_positions(mesh, particles);
        }
        if changes.colors {
            write_colors(mesh, particles);
        }
    }
    debug!(
        "Particle buffers updated (positions: {}, colours: {})",
        changes.positions, changes.colors
    );
}

/// Advance the idle spin and push frame parameters to material, transforms and camera.
pub fn animate_morph(
    mut session: ResMut<MorphSessionResource>,
    mut materials: ResMut<Assets<ParticleMorphMaterial>>,
    mut points: Query<
        (&MeshMaterial3d<ParticleMorphMaterial>, &mut Transform),
        (With<ParticlePoints>, Without<DragGroup>, Without<MorphCamera>),
    >,
    mut groups: Query<&mut Transform, (With<DragGroup>, Without<MorphCamera>)>,
    mut cameras: Query<&mut Transform, (With<MorphCamera>, Without<ParticlePoints>)>,
) {
    session.0.advance_frame();
    let params = session.0.frame_params();

    for (material, mut transform) in &mut points {
        if let Some(material) = materials.get_mut(&material.0) {
            material.params = MorphUniform::from_frame(&params);
        }
        transform.rotation = Quat::from_rotation_y(params.spin_y);
    }

    for mut transform in &mut groups {
        transform.rotation = Quat::from_euler(EulerRot::XYZ, params.drag.x, params.drag.y, 0.0);
    }

    for mut transform in &mut cameras {
        transform.translation.z = params.camera_z;
    }
}
