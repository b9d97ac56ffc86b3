use std::fmt;

/// Failures surfaced by the physics core. The host halts on any of them.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// A construction or configuration value outside its physical range.
    InvalidParameter { name: &'static str, value: f64 },
    /// Two bodies share the exact same coordinates and no softening floor is set.
    CoincidentBodies { first: String, second: String },
    /// A body's position or velocity stopped being finite after a step.
    NumericalInstability { body: String },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter { name, value } => {
                write!(f, "invalid parameter `{name}`: {value}")
            }
            SimulationError::CoincidentBodies { first, second } => {
                write!(f, "{first} and {second} are at the same position (division by zero)")
            }
            SimulationError::NumericalInstability { body } => {
                write!(f, "{body} has a non-finite position or velocity")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Rejects values that are not finite and strictly positive.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::InvalidParameter { name, value })
    }
}
