use super::GalaxyConfig;
use crate::graphics::{GalaxyPointsMaterial, build_point_cloud_mesh};
use bevy::{
    pbr::{NotShadowCaster, NotShadowReceiver},
    prelude::*,
    render::view::NoFrustumCulling,
};
use galaxy_points::GalaxyError;

pub struct PointCloudPlugin;

impl Plugin for PointCloudPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyPointCloud::default())
            .add_systems(Update, regenerate_galaxy.after(super::GalaxyConfigSet));
    }
}

/// Marks the single live galaxy entity.
#[derive(Component)]
pub struct GalaxyPoints;

struct LiveCloud {
    entity: Entity,
    mesh: Handle<Mesh>,
    material: Handle<GalaxyPointsMaterial>,
    count: usize,
}

/// Owns the live point cloud and remembers which config generation it was built from.
#[derive(Resource)]
pub struct GalaxyPointCloud {
    generation: i32,
    live: Option<LiveCloud>,
    last_error: Option<GalaxyError>,
}

impl Default for GalaxyPointCloud {
    fn default() -> Self {
        Self {
            generation: -1,
            live: None,
            last_error: None,
        }
    }
}

impl GalaxyPointCloud {
    pub fn particle_count(&self) -> usize {
        self.live.as_ref().map_or(0, |live| live.count)
    }

    pub fn entity(&self) -> Option<Entity> {
        self.live.as_ref().map(|live| live.entity)
    }

    /// Error of the most recent regeneration, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&GalaxyError> {
        self.last_error.as_ref()
    }
}

/// Rebuilds the galaxy when the committed config generation moves.
///
/// The replacement is built completely before anything is touched. Spawning
/// the new entity and despawning the old one go through the same command
/// flush, so the scene never holds zero or two galaxies. On failure the old
/// galaxy stays attached and the error is kept for the UI.
pub fn regenerate_galaxy(
    mut commands: Commands,
    galaxy_config: Res<GalaxyConfig>,
    mut point_cloud: ResMut<GalaxyPointCloud>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
) {
    if point_cloud.generation == galaxy_config.generation {
        return;
    }
    // failed generations are not retried until the config moves again
    point_cloud.generation = galaxy_config.generation;

    let params = &galaxy_config.params;
    let built = galaxy_points::generate_galaxy(params)
        .and_then(|galaxy| build_point_cloud_mesh(&galaxy));
    let mesh = match built {
        Ok(mesh) => mesh,
        Err(err) => {
            error!("Galaxy regeneration failed, keeping the previous galaxy: {err}");
            point_cloud.last_error = Some(err);
            return;
        }
    };

    let mesh = meshes.add(mesh);
    let material = materials.add(GalaxyPointsMaterial::new(params));
    let entity = commands
        .spawn((
            Name::new("Galaxy"),
            GalaxyPoints,
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            NotShadowCaster,
            NotShadowReceiver,
            // quads extend past the vertex AABB
            NoFrustumCulling,
        ))
        .id();

    let replaced = point_cloud.live.replace(LiveCloud {
        entity,
        mesh,
        material,
        count: params.count,
    });
    if let Some(old) = replaced {
        commands.entity(old.entity).despawn();
        meshes.remove(&old.mesh);
        materials.remove(&old.material);
    }
    point_cloud.last_error = None;

    info!(
        "Galaxy generated: {} particles, {} branches (generation {})",
        params.count, params.branches, galaxy_config.generation
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use galaxy_points::ParameterSet;

    fn test_world(params: ParameterSet) -> World {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<GalaxyPointsMaterial>>();
        world.insert_resource(GalaxyConfig {
            generation: 0,
            params,
        });
        world.insert_resource(GalaxyPointCloud::default());
        world
    }

    fn small_params() -> ParameterSet {
        ParameterSet {
            count: 500,
            ..default()
        }
    }

    fn regenerate(world: &mut World) {
        world.run_system_once(regenerate_galaxy).unwrap();
    }

    fn galaxy_entities(world: &mut World) -> Vec<Entity> {
        world
            .query_filtered::<Entity, With<GalaxyPoints>>()
            .iter(world)
            .collect()
    }

    fn bump_generation(world: &mut World) {
        world.resource_mut::<GalaxyConfig>().generation += 1;
    }

    #[test]
    fn test_first_run_attaches_one_galaxy() {
        let mut world = test_world(small_params());
        regenerate(&mut world);

        let entities = galaxy_entities(&mut world);
        assert_eq!(entities.len(), 1);

        let point_cloud = world.resource::<GalaxyPointCloud>();
        assert_eq!(point_cloud.entity(), Some(entities[0]));
        assert_eq!(point_cloud.particle_count(), 500);
        assert!(point_cloud.last_error().is_none());
    }

    #[test]
    fn test_unchanged_generation_does_not_rebuild() {
        let mut world = test_world(small_params());
        regenerate(&mut world);
        let first = galaxy_entities(&mut world);

        regenerate(&mut world);
        assert_eq!(galaxy_entities(&mut world), first);
    }

    #[test]
    fn test_regenerating_swaps_and_disposes() {
        let mut world = test_world(small_params());
        regenerate(&mut world);
        let first = galaxy_entities(&mut world)[0];

        for _ in 0..2 {
            bump_generation(&mut world);
            regenerate(&mut world);
        }

        let entities = galaxy_entities(&mut world);
        assert_eq!(entities.len(), 1);
        assert_ne!(entities[0], first);
        assert!(world.get_entity(first).is_err());

        assert_eq!(world.resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(world.resource::<Assets<GalaxyPointsMaterial>>().len(), 1);
        assert_eq!(world.resource::<GalaxyPointCloud>().particle_count(), 500);
    }

    #[test]
    fn test_new_material_uses_committed_size() {
        let mut world = test_world(small_params());
        regenerate(&mut world);

        world.resource_mut::<GalaxyConfig>().params.size = 0.08;
        bump_generation(&mut world);
        regenerate(&mut world);

        let materials = world.resource::<Assets<GalaxyPointsMaterial>>();
        let (_, material) = materials.iter().next().unwrap();
        assert_eq!(material.point_size(), 0.08);
    }

    #[test]
    fn test_failed_regeneration_keeps_previous_galaxy() {
        let mut world = test_world(small_params());
        regenerate(&mut world);
        let first = galaxy_entities(&mut world);

        world.resource_mut::<GalaxyConfig>().params.radius = 0.0;
        bump_generation(&mut world);
        regenerate(&mut world);

        assert_eq!(galaxy_entities(&mut world), first);
        assert_eq!(world.resource::<Assets<Mesh>>().len(), 1);
        let point_cloud = world.resource::<GalaxyPointCloud>();
        assert_eq!(point_cloud.particle_count(), 500);
        assert!(matches!(
            point_cloud.last_error(),
            Some(GalaxyError::InvalidParameter { name: "radius", .. })
        ));

        // a valid commit clears the error
        world.resource_mut::<GalaxyConfig>().params.radius = 3.0;
        bump_generation(&mut world);
        regenerate(&mut world);
        assert!(world.resource::<GalaxyPointCloud>().last_error().is_none());
        assert_eq!(galaxy_entities(&mut world).len(), 1);
    }

    #[test]
    fn test_invalid_first_generation_leaves_scene_empty() {
        let mut world = test_world(ParameterSet {
            count: 0,
            ..default()
        });
        regenerate(&mut world);

        assert!(galaxy_entities(&mut world).is_empty());
        assert!(world.resource::<GalaxyPointCloud>().last_error().is_some());
        assert!(world.resource::<Assets<Mesh>>().is_empty());
    }
}
