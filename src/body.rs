use bevy::math::DVec2;
use std::collections::VecDeque;

use crate::error::{SimulationError, require_positive};

/// Which part a body plays in the system. Distances to the primary are tracked for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyRole {
    Primary,
    Secondary,
}

/// How much orbit history a trail keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailPolicy {
    Unbounded,
    /// Keeps the most recent `n` points.
    Bounded(usize),
}

/// Past positions of a body in meters, oldest first.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: VecDeque<DVec2>,
}

impl Trail {
    pub fn record(&mut self, point: DVec2, policy: TrailPolicy) {
        self.points.push_back(point);
        if let TrailPolicy::Bounded(capacity) = policy {
            while self.points.len() > capacity {
                self.points.pop_front();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<DVec2> {
        self.points.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.points.iter().copied()
    }
}

/// A gravitating point mass.
///
/// Positions are in meters, velocities in m/s and masses in kg. `radius` is the drawn size in
/// pixels and plays no part in the physics.
#[derive(Clone, Debug)]
pub struct Body {
    pub name: String,
    pub position: DVec2,
    pub velocity: DVec2,
    mass: f64,
    pub radius: f32,
    pub role: BodyRole,
    /// Distance to the primary as of the last step; display only.
    pub distance_to_primary: f64,
    /// Total force applied during the last step.
    pub net_force: DVec2,
    pub trail: Trail,
}

impl Body {
    /// Creates a body moving along y. The x velocity starts at zero and the trail empty.
    pub fn new(
        name: impl Into<String>,
        position: DVec2,
        velocity_y: f64,
        mass: f64,
        radius: f32,
        role: BodyRole,
    ) -> Result<Self, SimulationError> {
        require_positive("mass", mass)?;
        if !position.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "position",
                value: if position.x.is_finite() { position.y } else { position.x },
            });
        }
        if !velocity_y.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "velocity_y",
                value: velocity_y,
            });
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "radius",
                value: radius as f64,
            });
        }

        Ok(Self {
            name: name.into(),
            position,
            velocity: DVec2::new(0.0, velocity_y),
            mass,
            radius,
            role,
            distance_to_primary: 0.0,
            net_force: DVec2::ZERO,
            trail: Trail::default(),
        })
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn is_primary(&self) -> bool {
        self.role == BodyRole::Primary
    }

    pub fn momentum(&self) -> DVec2 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}
