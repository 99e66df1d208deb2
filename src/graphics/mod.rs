use bevy::prelude::*;

mod point_mesh;
mod render;
mod shader_types;

pub use point_mesh::build_point_cloud_mesh;
pub use render::GalaxyPointsMaterial;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(render::RenderPlugin);
    }
}
