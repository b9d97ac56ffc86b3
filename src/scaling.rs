use bevy::math::{DVec2, Vec2};

use crate::body::Body;
use crate::resources::SimulationConfig;

/// Size of the drawing surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Converts window pixels (origin top-left, y down) into 2D camera space
    /// (origin at the center, y up).
    pub fn to_world(&self, screen: DVec2) -> Vec2 {
        Vec2::new(
            (screen.x - self.width / 2.0) as f32,
            (self.height / 2.0 - screen.y) as f32,
        )
    }
}

/// Maps a position in meters to window pixels.
pub fn to_screen(position: DVec2, scale: f64, viewport: &Viewport) -> DVec2 {
    DVec2::new(
        position.x * scale + viewport.width / 2.0,
        position.y * scale + viewport.height / 2.0,
    )
}

/// What a renderer needs to draw one body.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub screen_position: DVec2,
    pub screen_trail: Vec<DVec2>,
}

impl Body {
    pub fn render_state(&self, config: &SimulationConfig) -> RenderState {
        let scale = config.scale();
        RenderState {
            screen_position: to_screen(self.position, scale, &config.viewport),
            screen_trail: self
                .trail
                .iter()
                .map(|point| to_screen(point, scale, &config.viewport))
                .collect(),
        }
    }
}
