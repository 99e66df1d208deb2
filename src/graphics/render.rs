use super::shader_types::PointParams;
use crate::prelude::*;
use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::MeshVertexBufferLayoutRef,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
        },
    },
};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        // points are unlit and never occlude, so no prepass or shadow pipelines
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial> {
            prepass_enabled: false,
            shadows_enabled: false,
            ..default()
        });
    }
}

/// Additive, depth-write-free billboard points with size attenuation.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
#[bind_group_data(GalaxyPointsMaterialKey)]
pub struct GalaxyPointsMaterial {
    #[uniform(0)]
    point_params: PointParams,
    alpha_mode: AlphaMode,
    depth_write: bool,
}

impl GalaxyPointsMaterial {
    pub fn new(params: &ParameterSet) -> Self {
        Self {
            point_params: PointParams::read(params),
            alpha_mode: AlphaMode::Add,
            depth_write: false,
        }
    }

    pub fn point_size(&self) -> f32 {
        self.point_params.size
    }

    pub fn size_attenuation(&self) -> bool {
        self.point_params.size_attenuation != 0
    }

    pub fn depth_write(&self) -> bool {
        self.depth_write
    }
}

impl Material for GalaxyPointsMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = key.bind_group_data.depth_write;
        }
        Ok(())
    }
}

// Pipelines are specialized on depth writes, which is all the key needs to carry.
#[derive(Eq, PartialEq, Hash, Clone)]
pub struct GalaxyPointsMaterialKey {
    depth_write: bool,
}

impl From<&GalaxyPointsMaterial> for GalaxyPointsMaterialKey {
    fn from(material: &GalaxyPointsMaterial) -> Self {
        Self {
            depth_write: material.depth_write,
        }
    }
}
