//! Simulation error types.
//!
//! Only configuration and dispatch failures are errors. Degenerate physics
//! (coincident bodies, zero mass) and failed spawn placement are logged and
//! skipped inside the frame instead.

use std::fmt;

/// Top-level error enum for the arena simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A growth setting has the wrong number of coefficients, or a
    /// coefficient that is not a finite number.
    InvalidCoefficients {
        /// Growth kind the coefficients were declared for.
        kind: &'static str,
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// The spawn-rate growth function evaluated to zero or less.
    NonPositiveSpawnRate {
        /// Evaluated spawns per second.
        rate: f32,
        /// Elapsed game time the rate was evaluated at.
        time: f32,
    },

    /// A behavior selector name did not match any known variant.
    UnknownBehavior {
        /// Which selector was being parsed (e.g. "boundary behavior").
        kind: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A numeric setting is outside its valid range.
    InvalidSetting {
        /// Dotted path of the setting (for logging).
        name: &'static str,
        /// Human-readable description of the valid range.
        reason: String,
    },

    /// Settings could not be read or parsed.
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidCoefficients { kind, reason } => {
                write!(f, "invalid coefficients for {}: {}", kind, reason)
            }
            SimError::NonPositiveSpawnRate { rate, time } => write!(
                f,
                "spawn rate of {} per second at t={:.2}s isn't plausible (must be > 0)",
                rate, time
            ),
            SimError::UnknownBehavior { kind, value } => {
                write!(f, "unknown {} '{}'", kind, value)
            }
            SimError::InvalidSetting { name, reason } => {
                write!(f, "setting '{}' {}", name, reason)
            }
            SimError::Config(msg) => write!(f, "failed to load settings: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::NonPositiveSpawnRate { rate: -0.5, time: 3.0 };
        assert!(err.to_string().contains("-0.5"));

        let err = SimError::UnknownBehavior {
            kind: "boundary behavior",
            value: "teleport".into(),
        };
        assert_eq!(err.to_string(), "unknown boundary behavior 'teleport'");
    }

    #[test]
    fn test_from_json_error() {
        let err: SimError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SimError::Config(_)));
    }
}
