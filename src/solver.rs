// Solver - runs one sight adjustment query against a calibration profile
use serde::{Deserialize, Serialize};

use crate::adjustment_table::calculate_mrad_adjustments;
use crate::error::{CalculatorError, Result};
use crate::profile::CalibrationProfile;
use crate::wind::{calculate_wind_adjustment, CrosswindAngle};

// Query parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryInput {
    pub distance: f64,     // meters
    pub wind_speed: f64,   // m/s
    pub crosswind_angle: CrosswindAngle,
}

impl QueryInput {
    pub fn new(distance: f64, wind_speed: f64, crosswind_angle: CrosswindAngle) -> Self {
        Self { distance, wind_speed, crosswind_angle }
    }

    /// Parse raw text fields: distance and wind speed as decimals, angle as
    /// a whole number of degrees.
    pub fn parse(distance: &str, wind_speed: &str, crosswind_angle: &str) -> Result<Self> {
        Ok(Self {
            distance: parse_decimal("distance", distance)?,
            wind_speed: parse_decimal("wind speed", wind_speed)?,
            crosswind_angle: crosswind_angle.parse()?,
        })
    }
}

impl Default for QueryInput {
    fn default() -> Self {
        Self {
            distance: 100.0,
            wind_speed: 0.0,
            crosswind_angle: CrosswindAngle::Deg0,
        }
    }
}

fn parse_decimal(field: &str, text: &str) -> Result<f64> {
    let value: f64 = text.trim().parse().map_err(|_| {
        CalculatorError::InvalidInput(format!("{} '{}' is not a number", field, text.trim()))
    })?;
    if !value.is_finite() {
        return Err(CalculatorError::InvalidInput(format!("{} must be finite", field)));
    }
    Ok(value)
}

// Adjustment results, each value computed independently
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentResult {
    pub distance: f64,
    pub vertical_mrad: f64,
    pub horizontal_mrad: f64,
    pub wind_mrad: f64,
}

pub struct AdjustmentSolver<'a> {
    profile: &'a CalibrationProfile,
}

impl<'a> AdjustmentSolver<'a> {
    pub fn new(profile: &'a CalibrationProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &CalibrationProfile {
        self.profile
    }

    pub fn solve(&self, query: &QueryInput) -> Result<AdjustmentResult> {
        let profile = self.profile;

        let adjustment = calculate_mrad_adjustments(
            &profile.table,
            query.distance,
            profile.range_policy,
            profile.horizontal_divisor,
            profile.decimals,
        )?;

        let wind_mrad = calculate_wind_adjustment(
            query.wind_speed,
            query.crosswind_angle,
            profile.horizontal_per_10m,
            &profile.wind_coefficients,
            profile.decimals,
        )?;

        Ok(AdjustmentResult {
            distance: query.distance,
            vertical_mrad: adjustment.vertical,
            horizontal_mrad: adjustment.horizontal,
            wind_mrad,
        })
    }
}
