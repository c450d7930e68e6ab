//! Calibration profiles
//!
//! A profile holds everything a calculation reads: the range table, the
//! crosswind coefficients and the scalar calibration constants. The built-in
//! L129A1 profile is built once on first use; other rifles load from TOML.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::adjustment_table::{AdjustmentTable, MradAdjustment, RangePolicy};
use crate::constants::*;
use crate::error::{CalculatorError, Result};
use crate::wind::{CrosswindAngle, WindCoefficients};

static DEFAULT_PROFILE: Lazy<CalibrationProfile> = Lazy::new(|| {
    CalibrationProfile::from_file(ProfileFile::l129a1())
        .expect("built-in L129A1 profile constants are valid")
});

/// Immutable calibration for one rifle/ammunition combination
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationProfile {
    pub name: String,
    pub table: AdjustmentTable,
    pub wind_coefficients: WindCoefficients,
    pub horizontal_divisor: f64,
    pub vertical_per_10m: f64,
    pub horizontal_per_10m: f64,
    pub wind_mrad_factor: f64,
    pub decimals: u32,
    pub range_policy: RangePolicy,
}

impl CalibrationProfile {
    /// Process-wide built-in L129A1 profile
    pub fn builtin() -> &'static CalibrationProfile {
        &DEFAULT_PROFILE
    }

    /// Parse and validate a TOML profile
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ProfileFile = toml::from_str(content)?;
        Self::from_file(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            name = %profile.name,
            rows = profile.table.len(),
            "loaded calibration profile"
        );
        Ok(profile)
    }

    /// Load from `path`, or clone the built-in profile when no path is given
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin().clone()),
        }
    }

    fn from_file(file: ProfileFile) -> Result<Self> {
        if !file.horizontal_divisor.is_finite() || file.horizontal_divisor <= 0.0 {
            return Err(CalculatorError::InvalidProfile(format!(
                "horizontal_divisor must be positive, got {}",
                file.horizontal_divisor
            )));
        }

        for (field, value) in [
            ("vertical_per_10m", file.vertical_per_10m),
            ("horizontal_per_10m", file.horizontal_per_10m),
            ("wind_mrad_factor", file.wind_mrad_factor),
        ] {
            if !value.is_finite() {
                return Err(CalculatorError::InvalidProfile(format!("{} must be finite", field)));
            }
        }

        // f64 rounding past ~15 places is meaningless
        if file.decimals > 15 {
            return Err(CalculatorError::InvalidProfile(format!(
                "decimals must be at most 15, got {}",
                file.decimals
            )));
        }

        let table = AdjustmentTable::new(
            file.adjustments
                .iter()
                .map(|row| (row.distance, MradAdjustment::new(row.vertical, row.horizontal)))
                .collect(),
        )?;

        let pairs = file
            .wind_coefficients
            .iter()
            .map(|(angle, coefficient)| {
                angle
                    .parse::<CrosswindAngle>()
                    .map(|a| (a, *coefficient))
                    .map_err(|_| CalculatorError::InvalidProfile(format!("unknown wind angle '{}'", angle)))
            })
            .collect::<Result<Vec<_>>>()?;
        let wind_coefficients = WindCoefficients::new(&pairs)?;

        Ok(Self {
            name: file.name,
            table,
            wind_coefficients,
            horizontal_divisor: file.horizontal_divisor,
            vertical_per_10m: file.vertical_per_10m,
            horizontal_per_10m: file.horizontal_per_10m,
            wind_mrad_factor: file.wind_mrad_factor,
            decimals: file.decimals,
            range_policy: file.range_policy,
        })
    }

    /// Serialize back into the TOML profile format
    pub fn to_toml_string(&self) -> Result<String> {
        let file = ProfileFile {
            name: self.name.clone(),
            horizontal_divisor: self.horizontal_divisor,
            decimals: self.decimals,
            range_policy: self.range_policy,
            vertical_per_10m: self.vertical_per_10m,
            horizontal_per_10m: self.horizontal_per_10m,
            wind_mrad_factor: self.wind_mrad_factor,
            wind_coefficients: self
                .wind_coefficients
                .iter()
                .map(|(angle, c)| (angle.degrees().to_string(), c))
                .collect(),
            adjustments: self
                .table
                .rows()
                .iter()
                .map(|(distance, adj)| AdjustmentRow {
                    distance: *distance,
                    vertical: adj.vertical,
                    horizontal: adj.horizontal,
                })
                .collect(),
        };
        toml::to_string(&file)
            .map_err(|e| CalculatorError::InvalidProfile(format!("cannot serialize profile: {}", e)))
    }

    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    pub fn with_horizontal_per_10m(mut self, value: f64) -> Self {
        self.horizontal_per_10m = value;
        self
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// On-disk TOML layout of a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileFile {
    name: String,
    #[serde(default = "default_horizontal_divisor")]
    horizontal_divisor: f64,
    #[serde(default = "default_decimals")]
    decimals: u32,
    #[serde(default)]
    range_policy: RangePolicy,
    #[serde(default = "default_vertical_per_10m")]
    vertical_per_10m: f64,
    #[serde(default = "default_horizontal_per_10m")]
    horizontal_per_10m: f64,
    #[serde(default = "default_wind_mrad_factor")]
    wind_mrad_factor: f64,
    #[serde(default = "default_wind_coefficients")]
    wind_coefficients: BTreeMap<String, f64>,
    adjustments: Vec<AdjustmentRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AdjustmentRow {
    distance: u32,
    vertical: f64,
    horizontal: f64,
}

impl ProfileFile {
    fn l129a1() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            horizontal_divisor: HORIZONTAL_DIVISOR,
            decimals: ADJUSTMENT_DECIMALS,
            range_policy: RangePolicy::default(),
            vertical_per_10m: VERTICAL_PER_10M,
            horizontal_per_10m: HORIZONTAL_PER_10M,
            wind_mrad_factor: WIND_MRAD_FACTOR,
            wind_coefficients: default_wind_coefficients(),
            adjustments: L129A1_ADJUSTMENTS
                .iter()
                .map(|&(distance, vertical, horizontal)| AdjustmentRow { distance, vertical, horizontal })
                .collect(),
        }
    }
}

fn default_horizontal_divisor() -> f64 {
    HORIZONTAL_DIVISOR
}

fn default_decimals() -> u32 {
    ADJUSTMENT_DECIMALS
}

fn default_vertical_per_10m() -> f64 {
    VERTICAL_PER_10M
}

fn default_horizontal_per_10m() -> f64 {
    HORIZONTAL_PER_10M
}

fn default_wind_mrad_factor() -> f64 {
    WIND_MRAD_FACTOR
}

fn default_wind_coefficients() -> BTreeMap<String, f64> {
    L129A1_WIND_COEFFICIENTS
        .iter()
        .map(|&(deg, c)| (deg.to_string(), c))
        .collect()
}
