use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{MeshVertexAttribute, PrimitiveTopology};
use bevy::render::render_resource::VertexFormat;
use point_cloud_morph::ParticleSet;

pub const ATTRIBUTE_TARGET_POSITION: MeshVertexAttribute =
    MeshVertexAttribute::new("TargetPosition", 988_540_917, VertexFormat::Float32x3);

pub const ATTRIBUTE_PARTICLE_COLOR: MeshVertexAttribute =
    MeshVertexAttribute::new("ParticleColor", 988_540_918, VertexFormat::Float32x3);

/// Two triangles per particle, corners in [-1, 1].
const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];

pub const VERTICES_PER_PARTICLE: usize = QUAD_CORNERS.len();

/// Repeat every per-particle value once per quad vertex.
pub fn expand_per_vertex(values: &[[f32; 3]]) -> Vec<[f32; 3]> {
    values
        .iter()
        .flat_map(|v| std::iter::repeat_n(*v, VERTICES_PER_PARTICLE))
        .collect()
}

/// Build the particle mesh. The main world keeps a copy so buffers can be
/// replaced in place when the session reports changes.
pub fn create_particle_mesh(particles: &ParticleSet) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());

    let corners: Vec<[f32; 2]> = (0..particles.len())
        .flat_map(|_| QUAD_CORNERS)
        .collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, expand_per_vertex(&particles.source));
    mesh.insert_attribute(ATTRIBUTE_TARGET_POSITION, expand_per_vertex(&particles.target));
    mesh.insert_attribute(ATTRIBUTE_PARTICLE_COLOR, expand_per_vertex(&particles.colors));
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, corners);
    mesh
}

/// Replace the position attributes with fresh source and target buffers.
pub fn write_positions(mesh: &mut Mesh, particles: &ParticleSet) {
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, expand_per_vertex(&particles.source));
    mesh.insert_attribute(ATTRIBUTE_TARGET_POSITION, expand_per_vertex(&particles.target));
}

pub fn write_colors(mesh: &mut Mesh, particles: &ParticleSet) {
    mesh.insert_attribute(ATTRIBUTE_PARTICLE_COLOR, expand_per_vertex(&particles.colors));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn particles() -> ParticleSet {
        ParticleSet {
            source: vec![[0.0; 3], [1.0; 3]],
            target: vec![[2.0; 3], [3.0; 3]],
            colors: vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    #[test]
    fn each_particle_becomes_a_quad() {
        let mesh = create_particle_mesh(&particles());
        assert_eq!(mesh.count_vertices(), 2 * VERTICES_PER_PARTICLE);

        let Some(VertexAttributeValues::Float32x3(targets)) =
            mesh.attribute(ATTRIBUTE_TARGET_POSITION)
        else {
            panic!("missing target attribute");
        };
        assert!(targets[..6].iter().all(|t| *t == [2.0; 3]));
        assert!(targets[6..].iter().all(|t| *t == [3.0; 3]));
    }

    #[test]
    fn colour_rewrite_leaves_positions() {
        let mut set = particles();
        let mut mesh = create_particle_mesh(&set);
        set.colors = vec![[0.5; 3]; 2];
        write_colors(&mut mesh, &set);

        let Some(VertexAttributeValues::Float32x3(colors)) =
            mesh.attribute(ATTRIBUTE_PARTICLE_COLOR)
        else {
            panic!("missing colour attribute");
        };
        assert!(colors.iter().all(|c| *c == [0.5; 3]));
        assert_eq!(mesh.count_vertices(), 12);
    }
}
