use crate::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

pub struct FpsWidgetPlugin;

impl Plugin for FpsWidgetPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_widget)
            .add_systems(Update, update_widget_system)
            .add_plugins(FrameTimeDiagnosticsPlugin::default());
    }
}

#[derive(Component)]
enum StatLine {
    Fps,
    Particles,
}

fn setup_widget(mut commands: Commands) {
    commands
        .spawn((
            Node {
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::FlexStart,
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::FlexStart,
                width: Val::Px(240.),
                right: Val::Percent(1.),
                top: Val::Percent(1.),
                bottom: Val::Auto,
                left: Val::Auto,
                padding: UiRect::all(Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(Color::linear_rgba(0.0, 0.03, 0.08, 0.5)),
            GlobalZIndex(i32::MAX - 1),
        ))
        .with_children(|parent| {
            for line in [StatLine::Fps, StatLine::Particles] {
                parent.spawn((
                    line,
                    Text(" N/A".to_string()),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                ));
            }
        });
}

fn update_widget_system(
    diagnostics: Res<DiagnosticsStore>,
    point_cloud: Res<GalaxyPointCloud>,
    mut query: Query<(&mut Text, &StatLine)>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(|frame_time| frame_time.smoothed())
        .unwrap_or(0.0);

    for (mut text, line) in &mut query {
        text.0 = match line {
            StatLine::Fps => format!("{:>10} {fps:.1} ({frame_time:.2} ms)", "FPS:"),
            StatLine::Particles => format!("{:>10} {}", "Particles:", point_cloud.particle_count()),
        };
    }
}
