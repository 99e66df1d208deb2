use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
    transform::TransformSystem,
};
use bevy_egui::EguiContexts;
use std::f32::consts::{FRAC_PI_2, TAU};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_systems(Startup, spawn_camera)
            .add_systems(
                PostUpdate,
                orbit_camera_system.before(TransformSystem::TransformPropagate),
            );
    }
}

fn spawn_camera(mut commands: Commands) {
    let start = Vec3::new(3.0, 3.0, 3.0);
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::looking_from(start, Vec3::ZERO),
    ));
}

/// Damped orbit around a target point.
///
/// Rotation input is queued as a pending delta and a fixed fraction of it is
/// applied every frame, so the camera glides to a stop after a drag.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_delta: f32,
    pitch_delta: f32,
    smooth_zoom_buffer: f32,
}

impl OrbitCamera {
    /// Fraction of the pending rotation applied per frame.
    pub const DAMPING: f32 = 0.05;
    const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
    const MIN_DISTANCE: f32 = 0.2;
    const MAX_DISTANCE: f32 = 60.0;

    pub fn looking_from(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(Self::MIN_DISTANCE);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }

    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.yaw_delta += yaw;
        self.pitch_delta += pitch;
    }

    /// Positive zooms in. Buffered and converted to distance over several frames.
    pub fn zoom(&mut self, amount: f32) {
        self.smooth_zoom_buffer += amount;
    }

    /// Advances the damped state by one frame.
    pub fn update(&mut self) {
        self.yaw += self.yaw_delta * Self::DAMPING;
        self.pitch = (self.pitch + self.pitch_delta * Self::DAMPING)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        self.yaw_delta *= 1.0 - Self::DAMPING;
        self.pitch_delta *= 1.0 - Self::DAMPING;

        let smooth_zoom_min = 0.001f32;
        let smooth_zoom_factor = 0.2f32;

        let smooth_zoom_amount = if self.smooth_zoom_buffer < 0.0 {
            f32::min(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                (-smooth_zoom_min).max(self.smooth_zoom_buffer),
            )
        } else {
            f32::max(
                self.smooth_zoom_buffer * smooth_zoom_factor,
                smooth_zoom_min.min(self.smooth_zoom_buffer),
            )
        };
        self.smooth_zoom_buffer -= smooth_zoom_amount;
        self.distance = (self.distance * (1.0 - smooth_zoom_amount))
            .clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}

pub fn orbit_camera_system(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    windows: Query<&Window>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut orbit)) = query.single_mut() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    // the debug panel owns the pointer while hovered
    let pointer_over_ui = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());

    let motion: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    let mut scroll = 0.0;
    for ev in scroll_evr.read() {
        match ev.unit {
            MouseScrollUnit::Line => {
                scroll += ev.y * 0.05;
            }
            MouseScrollUnit::Pixel => {
                // roughly 16px per line
                scroll += ev.y * 0.05 / 16.0;
            }
        }
    }

    if !pointer_over_ui {
        if mouse_buttons.pressed(MouseButton::Left) {
            let height = window.height().max(1.0);
            orbit.rotate(-TAU * motion.x / height, TAU * motion.y / height);
        }
        orbit.zoom(scroll);
    }

    orbit.update();
    transform.translation = orbit.translation();
    transform.look_at(orbit.target(), Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looking_from_round_trips() {
        let start = Vec3::new(3.0, 3.0, 3.0);
        let orbit = OrbitCamera::looking_from(start, Vec3::ZERO);
        assert!(orbit.translation().distance(start) < 1e-4);
    }

    #[test]
    fn test_rotation_is_damped_and_converges() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.rotate(1.0, 0.0);

        orbit.update();
        assert!((orbit.yaw - OrbitCamera::DAMPING).abs() < 1e-6);

        for _ in 0..1000 {
            orbit.update();
        }
        assert!((orbit.yaw - 1.0).abs() < 1e-3);
        assert!((orbit.translation().length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_pitch_stays_below_the_poles() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.rotate(0.0, 100.0);
        for _ in 0..500 {
            orbit.update();
        }
        assert!(orbit.pitch <= OrbitCamera::PITCH_LIMIT);
        assert!(orbit.translation().y < 5.0);
    }

    #[test]
    fn test_zoom_moves_closer_within_bounds() {
        let mut orbit = OrbitCamera::looking_from(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        orbit.zoom(0.5);
        for _ in 0..200 {
            orbit.update();
        }
        assert!(orbit.distance < 5.0);
        assert!(orbit.distance >= OrbitCamera::MIN_DISTANCE);
        assert!(orbit.smooth_zoom_buffer.abs() < 1e-3);

        orbit.zoom(-1000.0);
        for _ in 0..2000 {
            orbit.update();
        }
        assert!(orbit.distance <= OrbitCamera::MAX_DISTANCE);
    }
}
