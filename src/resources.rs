use bevy::math::DVec2;
use bevy::prelude::*;

use crate::body::{Body, TrailPolicy};
use crate::error::{SimulationError, require_positive};
use crate::integrator::UpdateOrder;
use crate::scaling::Viewport;

/// Physical constants and integration settings shared by the core and the host.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub g: f64,
    pub au: f64,
    pub pixels_per_au: f64,
    pub timestep: f64,
    pub viewport: Viewport,
    pub update_order: UpdateOrder,
    pub trail: TrailPolicy,
    /// Floor applied to pair distances in the force law. `None` reports coincident bodies
    /// as an error instead.
    pub min_separation: Option<f64>,
    pub validate_state: bool,
}

// --- Simulation Defaults ---
/// Gravitational constant in m³/(kg·s²).
pub const DEFAULT_G: f64 = 6.674288e-11;
/// Astronomical unit in meters.
pub const DEFAULT_AU: f64 = 149.6e6 * 1000.0;
/// On-screen length of one AU.
pub const DEFAULT_PIXELS_PER_AU: f64 = 250.0;
pub const SECONDS_PER_DAY: f64 = 3600.0 * 24.0;
/// One simulated day per step.
pub const DEFAULT_TIMESTEP: f64 = SECONDS_PER_DAY;
pub const WINDOW_WIDTH: u32 = 1000;
pub const WINDOW_HEIGHT: u32 = 750;
/// Enough points to hold a full Martian orbit at one day per step.
pub const DEFAULT_TRAIL_CAPACITY: usize = 2000;
/// Host ticks per second.
pub const TICK_RATE: f64 = 60.0;
/// Pixel length of the net-force overlay.
pub const FORCE_VECTOR_LENGTH: f32 = 40.0;

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            au: DEFAULT_AU,
            pixels_per_au: DEFAULT_PIXELS_PER_AU,
            timestep: DEFAULT_TIMESTEP,
            viewport: Viewport::new(WINDOW_WIDTH as f64, WINDOW_HEIGHT as f64),
            update_order: UpdateOrder::default(),
            trail: TrailPolicy::Bounded(DEFAULT_TRAIL_CAPACITY),
            min_separation: None,
            validate_state: true,
        }
    }
}

impl SimulationConfig {
    /// Pixels per meter.
    pub fn scale(&self) -> f64 {
        self.pixels_per_au / self.au
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        require_positive("g", self.g)?;
        require_positive("au", self.au)?;
        require_positive("pixels_per_au", self.pixels_per_au)?;
        require_positive("timestep", self.timestep)?;
        require_positive("viewport.width", self.viewport.width)?;
        require_positive("viewport.height", self.viewport.height)?;
        if let Some(floor) = self.min_separation {
            require_positive("min_separation", floor)?;
        }
        if self.trail == TrailPolicy::Bounded(0) {
            return Err(SimulationError::InvalidParameter {
                name: "trail.capacity",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// The body collection owned by the host loop. Order is the integration order.
#[derive(Resource, Default, Debug)]
pub struct BodySet {
    pub bodies: Vec<Body>,
}

impl BodySet {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies }
    }

    /// The last body flagged primary, which is the one distances are measured against.
    pub fn primary(&self) -> Option<&Body> {
        self.bodies.iter().rev().find(|body| body.is_primary())
    }

    pub fn total_momentum(&self) -> DVec2 {
        self.bodies.iter().map(Body::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }

    /// Pairwise Newtonian potential. Coincident pairs contribute nothing.
    pub fn potential_energy(&self, g: f64) -> f64 {
        let mut energy = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let distance = a.position.distance(b.position);
                if distance > 0.0 {
                    energy -= g * a.mass() * b.mass() / distance;
                }
            }
        }
        energy
    }
}

/// User-facing toggles that drive rendering and stepping.
#[derive(Resource)]
pub struct SimSettings {
    pub paused: bool,
    pub steps_per_tick: u32,
    pub show_trails: bool,
    pub show_force_vectors: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            paused: false,
            steps_per_tick: 1,
            show_trails: true,
            show_force_vectors: false,
        }
    }
}

/// Progress of the run and, once something went wrong, why it stopped.
#[derive(Resource, Default, Debug)]
pub struct SimulationStatus {
    pub steps: u64,
    pub halted: Option<SimulationError>,
}

impl SimulationStatus {
    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    pub fn elapsed_days(&self, timestep: f64) -> f64 {
        self.steps as f64 * timestep / SECONDS_PER_DAY
    }
}

/// Marker resource to request a simulation reset from the UI.
#[derive(Resource, Default)]
pub struct ResetSimulation {
    pub pending: bool,
}
