use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::*;
use crate::error::SimulationError;
use crate::integrator;
use crate::resources::*;
use crate::scaling::to_screen;
use crate::scenario::inner_solar_system;

/// Bundled system params used when resetting the simulation.
#[derive(SystemParam)]
pub struct ResetParams<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub meshes: ResMut<'w, Assets<Mesh>>,
    pub materials: ResMut<'w, Assets<ColorMaterial>>,
    pub config: Res<'w, SimulationConfig>,
    pub status: ResMut<'w, SimulationStatus>,
}

/// Builds the reference bodies, spawns a disc for each and installs them as the body set.
///
/// Nothing is spawned unless every body builds.
pub fn spawn_simulation_bodies(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<ColorMaterial>,
    config: &SimulationConfig,
) -> Result<(), SimulationError> {
    config.validate()?;

    let templates = inner_solar_system();
    let bodies = templates
        .iter()
        .map(|template| template.build(config))
        .collect::<Result<Vec<_>, _>>()?;

    for (index, (body, template)) in bodies.iter().zip(&templates).enumerate() {
        let screen = to_screen(body.position, config.scale(), &config.viewport);
        let world = config.viewport.to_world(screen);

        commands.spawn((
            Mesh2d(meshes.add(Circle::new(body.radius))),
            MeshMaterial2d(materials.add(ColorMaterial::from(template.color))),
            // Later bodies draw on top, like the reference window.
            Transform::from_translation(world.extend(index as f32)),
            BodyIndex(index),
            BodyColor(template.color),
        ));
    }

    info!("spawned {} bodies", bodies.len());
    commands.insert_resource(BodySet::new(bodies));
    Ok(())
}

fn halt(status: &mut SimulationStatus, err: SimulationError) {
    error!("simulation halted after {} steps: {err}", status.steps);
    status.halted = Some(err);
}

/// Sets up the camera and populates the simulation with the initial bodies.
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    config: Res<SimulationConfig>,
    mut status: ResMut<SimulationStatus>,
) {
    commands.spawn(Camera2d);
    if let Err(err) = spawn_simulation_bodies(&mut commands, &mut meshes, &mut materials, &config)
    {
        halt(&mut status, err);
    }
}

/// Advances the body set by `steps_per_tick` fixed steps. Stops for good on the first error.
pub fn step_simulation(
    mut body_set: ResMut<BodySet>,
    config: Res<SimulationConfig>,
    settings: Res<SimSettings>,
    mut status: ResMut<SimulationStatus>,
) {
    if settings.paused || status.is_halted() {
        return;
    }

    for _ in 0..settings.steps_per_tick {
        if let Err(err) = integrator::step(&mut body_set.bodies, &config) {
            halt(&mut status, err);
            return;
        }
        status.steps += 1;
    }
}

/// Moves each body's disc to its scaled position.
pub fn sync_transforms(
    mut query: Query<(&BodyIndex, &mut Transform)>,
    body_set: Res<BodySet>,
    config: Res<SimulationConfig>,
) {
    let scale = config.scale();
    for (index, mut transform) in query.iter_mut() {
        let Some(body) = body_set.bodies.get(**index) else {
            continue;
        };
        let screen = to_screen(body.position, scale, &config.viewport);
        let world = config.viewport.to_world(screen);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

/// Draws orbit trails for bodies when enabled in settings.
pub fn draw_trails(
    mut gizmos: Gizmos,
    query: Query<(&BodyIndex, &BodyColor)>,
    body_set: Res<BodySet>,
    config: Res<SimulationConfig>,
    settings: Res<SimSettings>,
) {
    if !settings.show_trails {
        return;
    }

    for (index, color) in query.iter() {
        let Some(body) = body_set.bodies.get(**index) else {
            continue;
        };
        if body.trail.len() <= 2 {
            continue;
        }
        let state = body.render_state(&config);
        gizmos.linestrip_2d(
            state
                .screen_trail
                .into_iter()
                .map(|point| config.viewport.to_world(point)),
            **color,
        );
    }
}

/// Draws the direction of the last net force on every non-primary body.
pub fn draw_force_vectors(
    mut gizmos: Gizmos,
    query: Query<(&BodyIndex, &Transform)>,
    body_set: Res<BodySet>,
    settings: Res<SimSettings>,
) {
    if !settings.show_force_vectors {
        return;
    }

    for (index, transform) in query.iter() {
        let Some(body) = body_set.bodies.get(**index) else {
            continue;
        };
        if body.is_primary() {
            continue;
        }
        // Screen y points down, world y points up.
        let direction = body.net_force.normalize_or_zero().as_vec2() * Vec2::new(1.0, -1.0);
        let start = transform.translation.truncate();
        gizmos.line_2d(
            start,
            start + direction * FORCE_VECTOR_LENGTH,
            Color::srgb(1.0, 1.0, 0.0),
        );
    }
}

/// Responds to a pending reset: clears body entities, resets progress, and respawns bodies.
pub fn apply_reset_request(
    params: ResetParams,
    mut reset: ResMut<ResetSimulation>,
    query: Query<Entity, With<BodyIndex>>,
) {
    if !reset.pending {
        return;
    }
    reset.pending = false;

    let ResetParams {
        mut commands,
        mut meshes,
        mut materials,
        config,
        mut status,
    } = params;

    // Old discs stay until the new scenario has been built.
    if let Err(err) = spawn_simulation_bodies(&mut commands, &mut meshes, &mut materials, &config)
    {
        halt(&mut status, err);
        return;
    }

    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
    *status = SimulationStatus::default();
    info!("simulation reset");
}
