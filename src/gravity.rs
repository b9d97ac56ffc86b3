//! Newtonian attraction between point masses.

use bevy::math::DVec2;

use crate::body::Body;
use crate::error::SimulationError;
use crate::resources::SimulationConfig;

/// Force on one body from another, plus the separation it was computed at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attraction {
    pub force: DVec2,
    pub distance: f64,
}

/// Sum of attractions acting on one body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetForce {
    pub force: DVec2,
    /// Distance to the last primary met while summing, if any.
    pub distance_to_primary: Option<f64>,
}

/// Force exerted on `body` by `other`, pointing from `body` toward `other`.
///
/// Magnitude is `G * m1 * m2 / d²`. The masses are multiplied before `G` so the result is
/// exactly antisymmetric when the arguments are swapped.
pub fn attraction(
    body: &Body,
    other: &Body,
    config: &SimulationConfig,
) -> Result<Attraction, SimulationError> {
    let delta = other.position - body.position;
    let distance = (delta.x * delta.x + delta.y * delta.y).sqrt();

    let effective = match config.min_separation {
        Some(floor) => distance.max(floor),
        None if distance == 0.0 => {
            return Err(SimulationError::CoincidentBodies {
                first: body.name.clone(),
                second: other.name.clone(),
            });
        }
        None => distance,
    };

    let force = config.g * (body.mass() * other.mass()) / (effective * effective);
    // With a floor active the pair may still coincide; there is no direction to pull in.
    let direction = if distance > 0.0 {
        delta / distance
    } else {
        DVec2::ZERO
    };

    Ok(Attraction {
        force: direction * force,
        distance,
    })
}

/// Total force on `bodies[index]` from every other body in the slice.
pub fn net_force(
    bodies: &[Body],
    index: usize,
    config: &SimulationConfig,
) -> Result<NetForce, SimulationError> {
    let body = bodies
        .get(index)
        .ok_or(SimulationError::InvalidParameter {
            name: "index",
            value: index as f64,
        })?;
    let mut total = NetForce::default();

    for (other_index, other) in bodies.iter().enumerate() {
        if other_index == index {
            continue;
        }
        let pull = attraction(body, other, config)?;
        if other.is_primary() {
            total.distance_to_primary = Some(pull.distance);
        }
        total.force += pull.force;
    }

    Ok(total)
}
