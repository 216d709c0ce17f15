/// Particle morph shader material
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::{
    RenderPipelineDescriptor, ShaderType, SpecializedMeshPipelineError,
};
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};
use constants::render_settings::POINT_SIZE_PX;
use point_cloud_morph::FrameParams;

use crate::engine::mesh::particle_mesh::{ATTRIBUTE_PARTICLE_COLOR, ATTRIBUTE_TARGET_POSITION};

const SHADER_PATH: &str = "shaders/particle_morph.wgsl";

/// Uniform block shared by the vertex and fragment stages.
#[derive(Debug, Clone, Copy, ShaderType)]
pub struct MorphUniform {
    pub color_a: Vec4,
    pub color_b: Vec4,
    /// Source to target blend, also the colour blend.
    pub mix_factor: f32,
    pub glow: f32,
    pub brightness: f32,
    /// 1.0 once per-particle colours should show through.
    pub use_vertex_color: f32,
    pub point_size: f32,
}

impl MorphUniform {
    pub fn from_frame(params: &FrameParams) -> Self {
        Self {
            color_a: Vec3::from_array(params.color_a).extend(1.0),
            color_b: Vec3::from_array(params.color_b).extend(1.0),
            mix_factor: params.mix,
            glow: params.glow,
            brightness: params.brightness,
            use_vertex_color: if params.use_vertex_color { 1.0 } else { 0.0 },
            point_size: POINT_SIZE_PX,
        }
    }
}

/// Blends source and target positions and colours by scroll progress and
/// draws each particle as a soft additive disc.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct ParticleMorphMaterial {
    #[uniform(0)]
    pub params: MorphUniform,
}

impl Material for ParticleMorphMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_TARGET_POSITION.at_shader_location(1),
            ATTRIBUTE_PARTICLE_COLOR.at_shader_location(2),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(3),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;
        if let Some(depth) = descriptor.depth_stencil.as_mut() {
            depth.depth_write_enabled = false;
        }
        Ok(())
    }
}
