use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalculatorError, Result};
use crate::rounding::round_to;

/// Angle between the wind and the line of fire.
///
/// Only the four calibrated angles exist; there is no interpolation
/// between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CrosswindAngle {
    Deg0,
    Deg20,
    Deg45,
    Deg90,
}

impl CrosswindAngle {
    pub const ALL: [CrosswindAngle; 4] = [
        CrosswindAngle::Deg0,
        CrosswindAngle::Deg20,
        CrosswindAngle::Deg45,
        CrosswindAngle::Deg90,
    ];

    pub fn degrees(self) -> u16 {
        match self {
            CrosswindAngle::Deg0 => 0,
            CrosswindAngle::Deg20 => 20,
            CrosswindAngle::Deg45 => 45,
            CrosswindAngle::Deg90 => 90,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<i64> for CrosswindAngle {
    type Error = CalculatorError;

    fn try_from(degrees: i64) -> Result<Self> {
        match degrees {
            0 => Ok(CrosswindAngle::Deg0),
            20 => Ok(CrosswindAngle::Deg20),
            45 => Ok(CrosswindAngle::Deg45),
            90 => Ok(CrosswindAngle::Deg90),
            other => Err(CalculatorError::InvalidInput(format!(
                "crosswind angle must be 0, 20, 45 or 90 degrees, got {}",
                other
            ))),
        }
    }
}

impl From<CrosswindAngle> for i64 {
    fn from(angle: CrosswindAngle) -> Self {
        angle.degrees() as i64
    }
}

impl FromStr for CrosswindAngle {
    type Err = CalculatorError;

    /// Parses a whole number of degrees; "20.0" is rejected.
    fn from_str(s: &str) -> Result<Self> {
        let degrees: i64 = s.trim().parse().map_err(|_| {
            CalculatorError::InvalidInput(format!("crosswind angle '{}' is not an integer", s.trim()))
        })?;
        CrosswindAngle::try_from(degrees)
    }
}

impl std::fmt::Display for CrosswindAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Crosswind coefficient for each calibrated angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindCoefficients {
    values: [f64; 4],
}

impl WindCoefficients {
    /// Build from (angle, coefficient) pairs. Every angle must be present once
    /// and every coefficient must lie in [0, 1].
    pub fn new(pairs: &[(CrosswindAngle, f64)]) -> Result<Self> {
        let mut values = [None; 4];

        for &(angle, coefficient) in pairs {
            if !(0.0..=1.0).contains(&coefficient) {
                return Err(CalculatorError::InvalidProfile(format!(
                    "wind coefficient for {} must be within [0, 1], got {}",
                    angle, coefficient
                )));
            }
            if values[angle.index()].replace(coefficient).is_some() {
                return Err(CalculatorError::InvalidProfile(format!(
                    "duplicate wind coefficient for {}",
                    angle
                )));
            }
        }

        let mut resolved = [0.0; 4];
        for angle in CrosswindAngle::ALL {
            resolved[angle.index()] = values[angle.index()].ok_or_else(|| {
                CalculatorError::InvalidProfile(format!("missing wind coefficient for {}", angle))
            })?;
        }

        Ok(Self { values: resolved })
    }

    pub fn from_degrees(pairs: &[(u16, f64)]) -> Result<Self> {
        let pairs = pairs
            .iter()
            .map(|&(deg, c)| {
                CrosswindAngle::try_from(deg as i64)
                    .map(|angle| (angle, c))
                    .map_err(|_| CalculatorError::InvalidProfile(format!("unknown wind angle {}", deg)))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(&pairs)
    }

    pub fn coefficient(&self, angle: CrosswindAngle) -> f64 {
        self.values[angle.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (CrosswindAngle, f64)> + '_ {
        CrosswindAngle::ALL.into_iter().map(move |a| (a, self.coefficient(a)))
    }
}

/// Horizontal wind correction in MRAD.
///
/// correction = (horizontal_per_10m / 10) * wind_speed * coefficient(angle)
pub fn calculate_wind_adjustment(
    wind_speed: f64,
    angle: CrosswindAngle,
    horizontal_per_10m: f64,
    coefficients: &WindCoefficients,
    decimals: u32,
) -> Result<f64> {
    if !wind_speed.is_finite() {
        return Err(CalculatorError::InvalidInput(format!(
            "wind speed must be a finite number, got {}",
            wind_speed
        )));
    }

    let coefficient = coefficients.coefficient(angle);
    let correction = round_to((horizontal_per_10m / 10.0) * wind_speed * coefficient, decimals);

    tracing::debug!(wind_speed, angle = angle.degrees(), coefficient, correction, "wind correction");

    Ok(correction)
}
