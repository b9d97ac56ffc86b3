//! Fixed-step semi-implicit Euler integration over the whole body set.
//!
//! Each body's velocity is kicked by `F/m·Δt` and its position then drifts with the new
//! velocity. The order in which bodies see each other's updates is chosen by [`UpdateOrder`].

use bevy::math::DVec2;

use crate::body::Body;
use crate::error::SimulationError;
use crate::gravity::{NetForce, net_force};
use crate::resources::SimulationConfig;

/// How updates within one tick are sequenced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateOrder {
    /// Every force comes from the start-of-tick snapshot; updates are applied afterwards.
    #[default]
    Synchronized,
    /// Bodies are advanced one after another in list order, each seeing the positions
    /// already updated earlier in the same tick.
    Sequential,
}

impl Body {
    fn kick_drift(&mut self, force: DVec2, dt: f64) {
        self.velocity += force / self.mass() * dt;
        self.position += self.velocity * dt;
    }

    fn record(&mut self, pull: NetForce, config: &SimulationConfig) {
        self.trail.record(self.position, config.trail);
        self.net_force = pull.force;
        if let Some(distance) = pull.distance_to_primary {
            self.distance_to_primary = distance;
        }
    }
}

fn instability(bodies: &[Body], config: &SimulationConfig) -> Result<(), SimulationError> {
    if config.validate_state
        && let Some(body) = bodies.iter().find(|body| !body.is_finite())
    {
        return Err(SimulationError::NumericalInstability {
            body: body.name.clone(),
        });
    }
    Ok(())
}

/// Moves every body per `update_order` without touching trails or display state.
fn kick_drift_all(
    bodies: &mut [Body],
    config: &SimulationConfig,
) -> Result<Vec<NetForce>, SimulationError> {
    let dt = config.timestep;
    match config.update_order {
        UpdateOrder::Sequential => {
            let mut pulls = Vec::with_capacity(bodies.len());
            for index in 0..bodies.len() {
                let pull = net_force(bodies, index, config)?;
                bodies[index].kick_drift(pull.force, dt);
                pulls.push(pull);
            }
            Ok(pulls)
        }
        UpdateOrder::Synchronized => {
            let pulls = (0..bodies.len())
                .map(|index| net_force(bodies, index, config))
                .collect::<Result<Vec<_>, _>>()?;
            for (body, pull) in bodies.iter_mut().zip(&pulls) {
                body.kick_drift(pull.force, dt);
            }
            Ok(pulls)
        }
    }
}

/// Advances `bodies[index]` by one timestep against the current state of the others.
///
/// On error the body is left exactly as it was.
pub fn step_body(
    bodies: &mut [Body],
    index: usize,
    config: &SimulationConfig,
) -> Result<(), SimulationError> {
    let pull = net_force(bodies, index, config)?;
    let body = &mut bodies[index];
    let (position, velocity) = (body.position, body.velocity);

    body.kick_drift(pull.force, config.timestep);
    if let Err(err) = instability(std::slice::from_ref(body), config) {
        body.position = position;
        body.velocity = velocity;
        return Err(err);
    }
    body.record(pull, config);
    Ok(())
}

/// Advances every body by one timestep.
///
/// A tick either completes for every body or not at all: on error all positions and velocities
/// are restored and no trail point is added.
pub fn step(bodies: &mut [Body], config: &SimulationConfig) -> Result<(), SimulationError> {
    let saved: Vec<(DVec2, DVec2)> = bodies
        .iter()
        .map(|body| (body.position, body.velocity))
        .collect();

    let outcome = kick_drift_all(bodies, config)
        .and_then(|pulls| instability(bodies, config).map(|()| pulls));

    match outcome {
        Ok(pulls) => {
            for (body, pull) in bodies.iter_mut().zip(pulls) {
                body.record(pull, config);
            }
            Ok(())
        }
        Err(err) => {
            for (body, (position, velocity)) in bodies.iter_mut().zip(saved) {
                body.position = position;
                body.velocity = velocity;
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyRole, TrailPolicy};
    use crate::resources::BodySet;

    const SUN_MASS: f64 = 1.98892e30;
    const EARTH_MASS: f64 = 5.9742e24;

    fn config(update_order: UpdateOrder) -> SimulationConfig {
        SimulationConfig {
            update_order,
            trail: TrailPolicy::Unbounded,
            ..Default::default()
        }
    }

    fn sun_and_earth(config: &SimulationConfig) -> Vec<Body> {
        vec![
            Body::new("Sun", DVec2::ZERO, 0.0, SUN_MASS, 30.0, BodyRole::Primary).unwrap(),
            Body::new(
                "Earth",
                DVec2::new(-config.au, 0.0),
                29_783.0,
                EARTH_MASS,
                16.0,
                BodyRole::Secondary,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn earth_returns_near_its_start_after_a_year() {
        for order in [UpdateOrder::Synchronized, UpdateOrder::Sequential] {
            let config = config(order);
            let mut bodies = sun_and_earth(&config);
            let start = bodies[1].position;

            for _ in 0..365 {
                step(&mut bodies, &config).unwrap();
            }

            let miss = bodies[1].position.distance(start);
            assert!(
                miss < 0.05 * config.au,
                "{order:?}: ended {} AU from the start",
                miss / config.au
            );
        }
    }

    #[test]
    fn two_body_momentum_is_conserved() {
        let config = config(UpdateOrder::Synchronized);
        let mut set = BodySet::new(sun_and_earth(&config));
        let initial = set.total_momentum();

        for _ in 0..3 * 365 {
            step(&mut set.bodies, &config).unwrap();
        }

        let drift = (set.total_momentum() - initial).length();
        assert!(
            drift <= 1e-9 * initial.length(),
            "momentum drifted by {drift}"
        );
    }

    #[test]
    fn orbit_distance_stays_bounded() {
        let config = config(UpdateOrder::Synchronized);
        let mut bodies = sun_and_earth(&config);

        let mut closest = f64::INFINITY;
        let mut farthest = 0.0f64;
        for _ in 0..3 * 365 {
            step(&mut bodies, &config).unwrap();
            closest = closest.min(bodies[1].distance_to_primary);
            farthest = farthest.max(bodies[1].distance_to_primary);
        }

        assert!(closest > 0.97 * config.au, "closest {}", closest / config.au);
        assert!(farthest < 1.03 * config.au, "farthest {}", farthest / config.au);
        // The primary has no other primary to measure against.
        assert_eq!(bodies[0].distance_to_primary, 0.0);
    }

    #[test]
    fn energy_does_not_run_away() {
        let config = config(UpdateOrder::Synchronized);
        let mut set = BodySet::new(sun_and_earth(&config));
        let energy = |set: &BodySet| set.kinetic_energy() + set.potential_energy(config.g);
        let initial = energy(&set);

        for _ in 0..2 * 365 {
            step(&mut set.bodies, &config).unwrap();
        }

        let relative = ((energy(&set) - initial) / initial).abs();
        assert!(relative < 0.01, "energy drifted by {relative}");
    }

    #[test]
    fn trail_holds_every_position_in_order() {
        let config = config(UpdateOrder::Synchronized);
        let mut bodies = sun_and_earth(&config);
        let mut after_each_step = Vec::new();

        for _ in 0..50 {
            step(&mut bodies, &config).unwrap();
            after_each_step.push(bodies[1].position);
        }

        let trail = &bodies[1].trail;
        assert_eq!(trail.len(), 50);
        for (i, expected) in after_each_step.iter().enumerate() {
            assert_eq!(trail.get(i), Some(*expected));
        }
    }

    #[test]
    fn lone_body_moves_in_a_straight_line() {
        let config = config(UpdateOrder::Sequential);
        let velocity = DVec2::new(3.0, -4.0);
        let mut bodies = vec![
            Body::new("drifter", DVec2::new(1.0e9, 2.0e9), 0.0, 1.0e20, 4.0, BodyRole::Secondary)
                .unwrap()
                .with_velocity(velocity),
        ];

        let mut expected = bodies[0].position;
        for _ in 0..100 {
            step(&mut bodies, &config).unwrap();
            expected += velocity * config.timestep;
        }

        assert_eq!(bodies[0].velocity, velocity);
        assert_eq!(bodies[0].position, expected);
        assert_eq!(bodies[0].net_force, DVec2::ZERO);
    }

    #[test]
    fn empty_set_is_a_no_op() {
        let mut bodies: Vec<Body> = Vec::new();
        assert!(step(&mut bodies, &SimulationConfig::default()).is_ok());
    }

    #[test]
    fn sequential_and_synchronized_orders_diverge() {
        let sequential = config(UpdateOrder::Sequential);
        let synchronized = config(UpdateOrder::Synchronized);
        let mut a = sun_and_earth(&sequential);
        let mut b = sun_and_earth(&synchronized);

        step(&mut a, &sequential).unwrap();
        step(&mut b, &synchronized).unwrap();

        // The sun moves first, so Earth sees a different sun under the sequential order.
        assert_eq!(a[0].position, b[0].position);
        assert_ne!(a[1].velocity, b[1].velocity);
    }

    #[test]
    fn step_body_only_touches_the_given_body() {
        let config = config(UpdateOrder::Sequential);
        let mut bodies = sun_and_earth(&config);
        let sun_before = bodies[0].position;

        step_body(&mut bodies, 1, &config).unwrap();

        assert_eq!(bodies[0].position, sun_before);
        assert!(bodies[0].trail.is_empty());
        assert_eq!(bodies[1].trail.len(), 1);
        assert!((bodies[1].distance_to_primary - config.au).abs() < 1e-3);
        // Pulled toward the sun, which sits at +x from Earth.
        assert!(bodies[1].net_force.x > 0.0);
    }

    #[test]
    fn coincident_bodies_halt_the_step() {
        let config = config(UpdateOrder::Synchronized);
        let mut bodies = sun_and_earth(&config);
        bodies[1].position = bodies[0].position;

        assert!(matches!(
            step(&mut bodies, &config),
            Err(SimulationError::CoincidentBodies { .. })
        ));
    }

    fn huge_pair() -> Vec<Body> {
        vec![
            Body::new("a", DVec2::ZERO, 0.0, 1.0e300, 1.0, BodyRole::Primary).unwrap(),
            Body::new("b", DVec2::new(1.0, 1.0), 0.0, 1.0e300, 1.0, BodyRole::Secondary).unwrap(),
        ]
    }

    #[test]
    fn blow_up_is_reported_and_leaves_the_last_valid_state() {
        let config = config(UpdateOrder::Synchronized);
        let mut bodies = huge_pair();

        assert!(matches!(
            step(&mut bodies, &config),
            Err(SimulationError::NumericalInstability { .. })
        ));
        for body in &bodies {
            assert!(body.is_finite(), "{} was left at {:?}", body.name, body.position);
            assert!(body.trail.is_empty());
            assert_eq!(body.velocity, DVec2::ZERO);
        }
        assert_eq!(bodies[1].position, DVec2::new(1.0, 1.0));
    }

    #[test]
    fn blow_up_passes_through_with_validation_off() {
        let mut config = config(UpdateOrder::Synchronized);
        config.validate_state = false;
        let mut bodies = huge_pair();

        assert!(step(&mut bodies, &config).is_ok());
        assert!(!bodies[1].is_finite());
        assert_eq!(bodies[1].trail.len(), 1);
    }

    #[test]
    fn failed_sequential_tick_does_not_move_earlier_bodies() {
        let config = config(UpdateOrder::Sequential);
        let mut bodies = sun_and_earth(&config);
        for name in ["B", "C"] {
            bodies.push(
                Body::new(name, DVec2::new(0.0, config.au), 0.0, 1.0e22, 4.0, BodyRole::Secondary)
                    .unwrap(),
            );
        }
        let before: Vec<_> = bodies.iter().map(|body| (body.position, body.velocity)).collect();

        assert_eq!(
            step(&mut bodies, &config),
            Err(SimulationError::CoincidentBodies {
                first: "B".into(),
                second: "C".into(),
            })
        );
        for (body, (position, velocity)) in bodies.iter().zip(before) {
            assert_eq!(body.position, position, "{} moved", body.name);
            assert_eq!(body.velocity, velocity, "{} sped up", body.name);
            assert!(body.trail.is_empty(), "{} gained a trail point", body.name);
        }
    }

    #[test]
    fn step_body_rolls_back_a_blow_up() {
        let config = config(UpdateOrder::Sequential);
        let mut bodies = huge_pair();

        assert!(matches!(
            step_body(&mut bodies, 1, &config),
            Err(SimulationError::NumericalInstability { .. })
        ));
        assert_eq!(bodies[1].position, DVec2::new(1.0, 1.0));
        assert!(bodies[1].trail.is_empty());
    }

    #[test]
    fn step_body_rejects_an_index_past_the_end() {
        let config = config(UpdateOrder::Sequential);
        let mut bodies = sun_and_earth(&config);

        assert!(matches!(
            step_body(&mut bodies, 2, &config),
            Err(SimulationError::InvalidParameter { name: "index", .. })
        ));
    }
}
