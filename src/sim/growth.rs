//! Time-varying growth functions
//!
//! A growth setting turns elapsed game time into a scalar multiplier. It
//! drives both the spawn rate (spawns per second) and the asteroid speed
//! multiplier.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Shape of a growth function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthKind {
    /// c0·t^n + c1·t^(n-1) + ... + cn, coefficients highest degree first
    Polynomial,
    /// a·e^(b·t), exactly two coefficients
    Exponential,
}

impl GrowthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthKind::Polynomial => "polynomial",
            GrowthKind::Exponential => "exponential",
        }
    }
}

impl FromStr for GrowthKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polynomial" => Ok(GrowthKind::Polynomial),
            "exponential" => Ok(GrowthKind::Exponential),
            _ => Err(SimError::UnknownBehavior {
                kind: "growth kind",
                value: s.to_string(),
            }),
        }
    }
}

/// A growth function plus its coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSetting {
    pub kind: GrowthKind,
    pub coefficients: Vec<f32>,
}

impl GrowthSetting {
    pub fn polynomial(coefficients: &[f32]) -> Self {
        Self {
            kind: GrowthKind::Polynomial,
            coefficients: coefficients.to_vec(),
        }
    }

    pub fn exponential(a: f32, b: f32) -> Self {
        Self {
            kind: GrowthKind::Exponential,
            coefficients: vec![a, b],
        }
    }

    /// Check coefficient count and that every coefficient is a finite number
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |reason: String| SimError::InvalidCoefficients {
            kind: self.kind.as_str(),
            reason,
        };

        match self.kind {
            GrowthKind::Polynomial if self.coefficients.is_empty() => {
                return Err(invalid("polynomial requires at least one coefficient".into()));
            }
            GrowthKind::Exponential if self.coefficients.len() != 2 => {
                return Err(invalid(format!(
                    "exponential requires exactly two coefficients (a, b), got {}",
                    self.coefficients.len()
                )));
            }
            _ => {}
        }

        if let Some(bad) = self.coefficients.iter().find(|c| !c.is_finite()) {
            return Err(invalid(format!(
                "coefficients must be finite numbers, got {} in {:?}",
                bad, self.coefficients
            )));
        }

        Ok(())
    }

    /// Evaluate the growth function at elapsed time `t` (seconds)
    pub fn evaluate(&self, t: f32) -> SimResult<f32> {
        self.validate()?;

        let value = match self.kind {
            // Horner's rule over highest-degree-first coefficients
            GrowthKind::Polynomial => self.coefficients.iter().fold(0.0, |acc, &c| acc * t + c),
            GrowthKind::Exponential => {
                let (a, b) = (self.coefficients[0], self.coefficients[1]);
                a * (b * t).exp()
            }
        };
        Ok(value)
    }
}
