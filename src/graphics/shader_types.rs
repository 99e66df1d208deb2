use crate::prelude::*;
use bevy::{prelude::*, render::render_resource::ShaderType};
use bytemuck::{Pod, Zeroable};

// Duplicated in galaxy_points.wgsl, so make sure to update both
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct PointParams {
    pub size: f32,
    pub size_attenuation: u32,
    pad: Vec2,
}

impl PointParams {
    pub fn read(params: &ParameterSet) -> Self {
        Self {
            size: params.size,
            size_attenuation: 1,
            pad: Vec2::ZERO,
        }
    }
}
