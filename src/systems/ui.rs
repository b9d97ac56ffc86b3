use bevy::prelude::*;
use bevy_egui::EguiContexts;
use bevy_egui::egui;

use crate::integrator::UpdateOrder;
use crate::resources::{BodySet, ResetSimulation, SimSettings, SimulationConfig, SimulationStatus};

/// Heading for the distance list, named after whichever body is primary.
pub fn distance_heading(body_set: &BodySet) -> String {
    match body_set.primary() {
        Some(primary) => format!("Distance to {}", primary.name),
        None => "Distance to Primary".to_owned(),
    }
}

/// Restores the default settings and physics config, and asks for the scenario to be rebuilt.
pub fn request_reset(
    settings: &mut SimSettings,
    config: &mut SimulationConfig,
    reset: &mut ResetSimulation,
) {
    *settings = SimSettings::default();
    *config = SimulationConfig::default();
    reset.pending = true;
}

pub fn ui_controls(
    mut contexts: EguiContexts,
    mut settings: ResMut<SimSettings>,
    mut config: ResMut<SimulationConfig>,
    body_set: Res<BodySet>,
    status: Res<SimulationStatus>,
    mut frames_rendered: Local<usize>,
    mut reset: ResMut<ResetSimulation>,
) {
    if *frames_rendered < 5 {
        *frames_rendered += 1;
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Window::new("Simulation Controls")
            .default_pos(egui::pos2(10.0, 10.0))
            .max_size([320.0, 420.0])
            .vscroll(true)
            .show(ctx, |ui| {
                ui.heading("Simulation");
                ui.label(format!(
                    "Elapsed: {:.0} days",
                    status.elapsed_days(config.timestep)
                ));
                if let Some(err) = &status.halted {
                    ui.colored_label(egui::Color32::RED, format!("Halted: {err}"));
                }
                ui.checkbox(&mut settings.paused, "Paused");
                ui.add(
                    egui::Slider::new(&mut settings.steps_per_tick, 1..=30)
                        .text("Days per Tick"),
                );

                ui.separator();
                ui.heading("Update Order");
                ui.radio_value(
                    &mut config.update_order,
                    UpdateOrder::Synchronized,
                    "Synchronized",
                );
                ui.radio_value(
                    &mut config.update_order,
                    UpdateOrder::Sequential,
                    "Sequential (in place)",
                );

                ui.separator();
                ui.heading("Overlays");
                ui.checkbox(&mut settings.show_trails, "Show Trails");
                ui.checkbox(&mut settings.show_force_vectors, "Show Net Force");

                ui.separator();
                ui.heading(distance_heading(&body_set));
                for body in body_set.bodies.iter().filter(|body| !body.is_primary()) {
                    ui.label(format!(
                        "{}: {:.1} km",
                        body.name,
                        body.distance_to_primary / 1000.0
                    ));
                }

                ui.separator();
                let momentum = body_set.total_momentum();
                ui.label(format!(
                    "Momentum: ({:.3e}, {:.3e}) kg·m/s",
                    momentum.x, momentum.y
                ));
                ui.label(format!(
                    "Energy: {:.4e} J",
                    body_set.kinetic_energy() + body_set.potential_energy(config.g)
                ));

                if ui.button("Reset Simulation").clicked() {
                    request_reset(&mut settings, &mut config, &mut reset);
                }
            });
    }
}
