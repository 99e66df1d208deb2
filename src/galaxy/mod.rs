use bevy::prelude::*;

mod galaxy_config;
mod point_cloud;

pub use galaxy_config::{GalaxyConfig, GalaxyConfigSet, GalaxyConfigUi};
pub use point_cloud::GalaxyPointCloud;

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            galaxy_config::GalaxyConfigPlugin,
            point_cloud::PointCloudPlugin,
        ));
    }
}
