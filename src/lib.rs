//! # MRAD Calculator
//!
//! Range table sight adjustment calculator. Converts a target distance and
//! crosswind into vertical/horizontal MRAD corrections by table lookup and
//! linear interpolation against a calibration profile.

// Re-export the main types and functions
pub use adjustment_table::{calculate_mrad_adjustments, AdjustmentTable, MradAdjustment, RangePolicy};
pub use error::{CalculatorError, Result};
pub use form::{evaluate, FormInput, FormOutput};
pub use profile::CalibrationProfile;
pub use solver::{AdjustmentResult, AdjustmentSolver, QueryInput};
pub use wind::{calculate_wind_adjustment, CrosswindAngle, WindCoefficients};

// Module declarations
pub mod adjustment_table;
pub mod constants;
pub mod error;
pub mod form;
pub mod profile;
mod rounding;
pub mod solver;
pub mod wind;

pub use rounding::round_to;
