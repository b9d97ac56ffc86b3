use bevy::math::DVec2;
use bevy::prelude::*;

use crate::body::{Body, BodyRole};
use crate::error::SimulationError;
use crate::resources::SimulationConfig;

/// Initial conditions for one body, with its position given in AU along x.
pub struct BodyTemplate {
    pub name: &'static str,
    pub x_au: f64,
    /// m/s
    pub velocity_y: f64,
    pub mass: f64,
    pub radius: f32,
    pub role: BodyRole,
    pub color: Color,
}

impl BodyTemplate {
    pub fn build(&self, config: &SimulationConfig) -> Result<Body, SimulationError> {
        Body::new(
            self.name,
            DVec2::new(self.x_au * config.au, 0.0),
            self.velocity_y,
            self.mass,
            self.radius,
            self.role,
        )
    }
}

/// The Sun and the four rocky planets, all starting on the x axis.
pub fn inner_solar_system() -> Vec<BodyTemplate> {
    vec![
        BodyTemplate {
            name: "Sun",
            x_au: 0.0,
            velocity_y: 0.0,
            mass: 1.98892e30,
            radius: 30.0,
            role: BodyRole::Primary,
            color: Color::srgb_u8(255, 255, 0),
        },
        BodyTemplate {
            name: "Earth",
            x_au: -1.0,
            velocity_y: 29.783 * 1000.0,
            mass: 5.9742e24,
            radius: 16.0,
            role: BodyRole::Secondary,
            color: Color::srgb_u8(100, 149, 237),
        },
        BodyTemplate {
            name: "Mars",
            x_au: -1.524,
            velocity_y: 24.077 * 1000.0,
            mass: 6.39e23,
            radius: 12.0,
            role: BodyRole::Secondary,
            color: Color::srgb_u8(188, 39, 50),
        },
        BodyTemplate {
            name: "Mercury",
            x_au: 0.387,
            velocity_y: -47.4 * 1000.0,
            mass: 3.30e23,
            radius: 8.0,
            role: BodyRole::Secondary,
            color: Color::srgb_u8(80, 78, 81),
        },
        BodyTemplate {
            name: "Venus",
            x_au: 0.723,
            velocity_y: -35.02 * 1000.0,
            mass: 4.8685e24,
            radius: 14.0,
            role: BodyRole::Secondary,
            color: Color::srgb_u8(255, 255, 255),
        },
    ]
}
