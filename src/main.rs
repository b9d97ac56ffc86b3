mod body;
mod components;
mod error;
mod gravity;
mod integrator;
mod resources;
mod scaling;
mod scenario;
mod systems;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use crate::resources::{BodySet, ResetSimulation, SimSettings, SimulationConfig, SimulationStatus};
use crate::resources::{TICK_RATE, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::systems::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Planet Simulation".into(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .init_resource::<SimulationConfig>()
        .init_resource::<BodySet>()
        .init_resource::<SimSettings>()
        .init_resource::<SimulationStatus>()
        .init_resource::<ResetSimulation>()
        .add_systems(EguiPrimaryContextPass, ui_controls)
        .add_systems(Startup, setup_scene)
        .add_systems(
            Update,
            (
                apply_reset_request,
                (sync_transforms, draw_trails, draw_force_vectors)
                    .chain()
                    .after(apply_reset_request),
            ),
        )
        .add_systems(FixedUpdate, step_simulation)
        .insert_resource(Time::<Fixed>::from_hz(TICK_RATE))
        .run();
}
