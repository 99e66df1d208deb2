use bevy::prelude::*;
use galaxy_points::{GalaxyError, ParameterSet};

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyConfig::default())
            .insert_resource(GalaxyConfigOld::default())
            .insert_resource(GalaxyConfigUi::default())
            .add_systems(
                Update,
                (commit_ui_edits, apply_config_updates)
                    .chain()
                    .in_set(GalaxyConfigSet),
            );
    }
}

/// Systems that turn panel edits into a new committed generation.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GalaxyConfigSet;

/// Committed parameters. The point cloud is rebuilt whenever `generation` moves.
#[derive(Resource, Clone, PartialEq, Default)]
pub struct GalaxyConfig {
    pub generation: i32,
    pub params: ParameterSet,
}

#[derive(Resource, Default)]
struct GalaxyConfigOld(ParameterSet);

/// Draft the debug panel edits. Changes reach [`GalaxyConfig`] only through a debounced commit.
#[derive(Resource)]
pub struct GalaxyConfigUi {
    pub params: ParameterSet,
    pub inside_hex: String,
    pub outside_hex: String,
    pub color_error: Option<GalaxyError>,
    resample_requested: bool,
    debounce: CommitDebounce,
}

impl Default for GalaxyConfigUi {
    fn default() -> Self {
        let params = ParameterSet::default();
        Self {
            inside_hex: params.inside_color.to_hex(),
            outside_hex: params.outside_color.to_hex(),
            params,
            color_error: None,
            resample_requested: false,
            debounce: CommitDebounce::default(),
        }
    }
}

impl GalaxyConfigUi {
    /// Marks the draft as finished editing at time `now` (seconds).
    pub fn request_commit(&mut self, now: f32) {
        self.debounce.request(now);
    }

    /// Asks for a fresh sample of the committed parameters.
    pub fn request_resample(&mut self) {
        self.resample_requested = true;
    }
}

/// Collapses bursts of commit requests into one.
///
/// Every request restarts the delay, so a commit only fires once edits have
/// been quiet for [`CommitDebounce::DELAY_SECS`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CommitDebounce {
    requested_at: Option<f32>,
}

impl CommitDebounce {
    pub const DELAY_SECS: f32 = 0.15;

    pub fn request(&mut self, now: f32) {
        self.requested_at = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.requested_at.is_some()
    }

    /// Returns true once per settled burst of requests.
    pub fn take_ready(&mut self, now: f32) -> bool {
        match self.requested_at {
            Some(at) if now - at >= Self::DELAY_SECS => {
                self.requested_at = None;
                true
            }
            _ => false,
        }
    }
}

fn commit_ui_edits(
    time: Res<Time>,
    mut galaxy_config_ui: ResMut<GalaxyConfigUi>,
    mut galaxy_config: ResMut<GalaxyConfig>,
) {
    let now = time.elapsed_secs();

    if galaxy_config_ui.debounce.take_ready(now) && galaxy_config_ui.params != galaxy_config.params
    {
        galaxy_config.params = galaxy_config_ui.params.clone();
    }

    if galaxy_config_ui.resample_requested {
        galaxy_config_ui.resample_requested = false;
        galaxy_config.generation += 1;
        debug!("Resampling galaxy, generation {}", galaxy_config.generation);
    }
}

fn apply_config_updates(
    mut galaxy_config_old: ResMut<GalaxyConfigOld>,
    mut galaxy_config: ResMut<GalaxyConfig>,
) {
    if galaxy_config.is_changed() && galaxy_config.params != galaxy_config_old.0 {
        galaxy_config.generation += 1;
        galaxy_config_old.0 = galaxy_config.params.clone();
        info!(
            "Galaxy parameters committed, generation {} ({} particles)",
            galaxy_config.generation, galaxy_config.params.count
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn test_world() -> World {
        let mut world = World::new();
        world.init_resource::<Time>();
        world.insert_resource(GalaxyConfig::default());
        world.insert_resource(GalaxyConfigOld::default());
        world.insert_resource(GalaxyConfigUi::default());
        world
    }

    fn advance(world: &mut World, secs: f32) {
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
    }

    fn run_commit(world: &mut World) {
        world.run_system_once(commit_ui_edits).unwrap();
        world.run_system_once(apply_config_updates).unwrap();
    }

    #[test]
    fn test_debounce_waits_for_quiet_period() {
        let mut debounce = CommitDebounce::default();
        assert!(!debounce.take_ready(10.0));

        debounce.request(1.0);
        assert!(debounce.is_pending());
        assert!(!debounce.take_ready(1.05));

        // a second edit restarts the delay
        debounce.request(1.1);
        assert!(!debounce.take_ready(1.2));
        assert!(debounce.take_ready(1.1 + CommitDebounce::DELAY_SECS + 0.01));

        // fires once per burst
        assert!(!debounce.is_pending());
        assert!(!debounce.take_ready(5.0));
    }

    #[test]
    fn test_draft_edits_do_not_reach_config_without_commit() {
        let mut world = test_world();
        world.resource_mut::<GalaxyConfigUi>().params.branches = 7;

        advance(&mut world, 1.0);
        run_commit(&mut world);

        let config = world.resource::<GalaxyConfig>();
        assert_eq!(config.params.branches, 3);
        assert_eq!(config.generation, 0);
    }

    #[test]
    fn test_commit_applies_after_delay_and_bumps_generation() {
        let mut world = test_world();
        {
            let mut ui = world.resource_mut::<GalaxyConfigUi>();
            ui.params.spin = -2.0;
            ui.request_commit(0.0);
        }

        run_commit(&mut world);
        assert_eq!(world.resource::<GalaxyConfig>().generation, 0);

        advance(&mut world, CommitDebounce::DELAY_SECS + 0.01);
        run_commit(&mut world);

        let config = world.resource::<GalaxyConfig>();
        assert_eq!(config.params.spin, -2.0);
        assert_eq!(config.generation, 1);

        // nothing new to commit
        run_commit(&mut world);
        assert_eq!(world.resource::<GalaxyConfig>().generation, 1);
    }

    #[test]
    fn test_commit_of_identical_params_keeps_generation() {
        let mut world = test_world();
        world.resource_mut::<GalaxyConfigUi>().request_commit(0.0);

        advance(&mut world, 1.0);
        run_commit(&mut world);

        assert_eq!(world.resource::<GalaxyConfig>().generation, 0);
    }

    #[test]
    fn test_resample_bumps_generation_once() {
        let mut world = test_world();
        world.resource_mut::<GalaxyConfigUi>().request_resample();

        run_commit(&mut world);
        assert_eq!(world.resource::<GalaxyConfig>().generation, 1);

        run_commit(&mut world);
        assert_eq!(world.resource::<GalaxyConfig>().generation, 1);
    }
}
