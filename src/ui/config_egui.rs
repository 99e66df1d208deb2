use crate::prelude::*;
use bevy::{
    color::{ColorToPacked, Srgba},
    prelude::*,
};
use bevy_egui::{EguiContexts, egui};
use galaxy_points::parse_hex_color;

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system.before(crate::galaxy::GalaxyConfigSet));
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// An edit is finished when a drag is released, or on a change that came
/// from clicking or the keyboard rather than an ongoing drag.
fn edit_finished(response: &egui::Response) -> bool {
    response.drag_stopped() || (response.changed() && !response.dragged())
}

/// Color picker plus hex field. Returns true when the color was edited.
fn color_ui(
    label: &str,
    color: &mut Srgba,
    hex: &mut String,
    color_error: &mut Option<GalaxyError>,
    ui: &mut egui::Ui,
) -> bool {
    let mut edited = false;
    ui.horizontal(|ui| {
        let [r, g, b, _] = color.to_u8_array();
        let mut rgb = [r, g, b];
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
            *hex = color.to_hex();
            *color_error = None;
            edited = true;
        }

        let response = ui.add(egui::TextEdit::singleline(hex).desired_width(80.0));
        if response.lost_focus() {
            match parse_hex_color(hex) {
                Ok(parsed) => {
                    *color = parsed;
                    *color_error = None;
                    edited = true;
                }
                Err(err) => {
                    warn!("{err}");
                    *color_error = Some(err);
                }
            }
        }
        ui.label(label);
    });
    edited
}

fn ui_system(
    mut contexts: EguiContexts,
    mut galaxy_config_ui: ResMut<GalaxyConfigUi>,
    point_cloud: Res<GalaxyPointCloud>,
    time: Res<Time>,
) {
    let ctx = contexts.ctx_mut();
    let config_ui = &mut *galaxy_config_ui;

    let minval = ParameterSet::MIN;
    let maxval = ParameterSet::MAX;
    let mut commit = false;

    egui::SidePanel::left("side_panel")
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");

            egui::CollapsingHeader::new("Shape")
                .default_open(true)
                .show(ui, |ui| {
                    let params = &mut config_ui.params;
                    let responses = [
                        ui.add(
                            egui::Slider::new(&mut params.count, minval.count..=maxval.count)
                                .step_by(100.0)
                                .text("Count"),
                        ),
                        ui.add(
                            egui::Slider::new(&mut params.size, minval.size..=maxval.size)
                                .step_by(0.001)
                                .text("Size"),
                        ),
                        ui.add(
                            egui::Slider::new(&mut params.radius, minval.radius..=maxval.radius)
                                .step_by(0.01)
                                .text("Radius"),
                        ),
                        ui.add(
                            egui::Slider::new(
                                &mut params.branches,
                                minval.branches..=maxval.branches,
                            )
                            .text("Branches"),
                        ),
                        ui.add(
                            egui::Slider::new(&mut params.spin, minval.spin..=maxval.spin)
                                .text("Spin"),
                        ),
                    ];
                    commit |= responses.iter().any(edit_finished);
                });

            egui::CollapsingHeader::new("Randomness")
                .default_open(true)
                .show(ui, |ui| {
                    let params = &mut config_ui.params;
                    let responses = [
                        ui.add(
                            egui::Slider::new(
                                &mut params.randomness,
                                minval.randomness..=maxval.randomness,
                            )
                            .step_by(0.001)
                            .text("Randomness"),
                        ),
                        ui.add(
                            egui::Slider::new(
                                &mut params.randomness_power,
                                minval.randomness_power..=maxval.randomness_power,
                            )
                            .text("Power"),
                        ),
                    ];
                    commit |= responses.iter().any(edit_finished);

                    let mut scaled = params.jitter_scaling == JitterScaling::ByRandomness;
                    if ui
                        .checkbox(&mut scaled, "Scale jitter by randomness")
                        .changed()
                    {
                        params.jitter_scaling = if scaled {
                            JitterScaling::ByRandomness
                        } else {
                            JitterScaling::Unscaled
                        };
                        commit = true;
                    }
                });

            egui::CollapsingHeader::new("Colors")
                .default_open(true)
                .show(ui, |ui| {
                    commit |= color_ui(
                        "Inside",
                        &mut config_ui.params.inside_color,
                        &mut config_ui.inside_hex,
                        &mut config_ui.color_error,
                        ui,
                    );
                    commit |= color_ui(
                        "Outside",
                        &mut config_ui.params.outside_color,
                        &mut config_ui.outside_hex,
                        &mut config_ui.color_error,
                        ui,
                    );
                    if let Some(err) = &config_ui.color_error {
                        ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
                    }
                });

            ui.separator();
            if ui.button("Regenerate").clicked() {
                config_ui.request_resample();
            }
            ui.label(format!("Particles: {}", point_cloud.particle_count()));
            if let Some(err) = point_cloud.last_error() {
                ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
            }
        });

    if commit {
        config_ui.request_commit(time.elapsed_secs());
    }
}
