//! Form evaluation: three text fields in, three display lines out.
//!
//! This is the whole presentation contract of the calculator. Front ends
//! (the CLI one-shot command and the interactive prompt) render the lines
//! returned here and hold no calculation state of their own.

use serde::Serialize;

use crate::error::{CalculatorError, Result};
use crate::profile::CalibrationProfile;
use crate::solver::{AdjustmentResult, AdjustmentSolver, QueryInput};

pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid numeric values.";

pub const VERTICAL_LABEL: &str = "Vertical Adjustment";
pub const HORIZONTAL_LABEL: &str = "Horizontal Adjustment";
pub const WIND_LABEL: &str = "Horizontal Adjustment (Wind)";

/// Raw field text as typed by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub distance: String,
    pub wind_speed: String,
    pub crosswind_angle: String,
}

impl FormInput {
    pub fn new(distance: &str, wind_speed: &str, crosswind_angle: &str) -> Self {
        Self {
            distance: distance.to_string(),
            wind_speed: wind_speed.to_string(),
            crosswind_angle: crosswind_angle.to_string(),
        }
    }
}

/// The three result lines. On failure the message is in `vertical` and the
/// other two lines are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormOutput {
    pub vertical: String,
    pub horizontal: String,
    pub wind: String,
}

impl FormOutput {
    pub fn lines(&self) -> [&str; 3] {
        [&self.vertical, &self.horizontal, &self.wind]
    }

    pub fn is_error(&self) -> bool {
        self.horizontal.is_empty() && self.wind.is_empty()
    }

    fn from_result(result: &AdjustmentResult, decimals: u32) -> Self {
        Self {
            vertical: format_line(VERTICAL_LABEL, result.vertical_mrad, decimals),
            horizontal: format_line(HORIZONTAL_LABEL, result.horizontal_mrad, decimals),
            wind: format_line(WIND_LABEL, result.wind_mrad, decimals),
        }
    }

    fn from_error(error: &CalculatorError) -> Self {
        Self {
            vertical: error_message(error),
            horizontal: String::new(),
            wind: String::new(),
        }
    }
}

/// `<label>: <value> MRADs` with exactly `decimals` fractional digits
pub fn format_line(label: &str, value: f64, decimals: u32) -> String {
    format!("{}: {:.*} MRADs", label, decimals as usize, value)
}

/// User-facing text for a calculation failure
pub fn error_message(error: &CalculatorError) -> String {
    match error {
        CalculatorError::OutOfRange { min, max, .. } => {
            format!("Target distance must be between {} and {} meters.", min, max)
        }
        _ => INVALID_INPUT_MESSAGE.to_string(),
    }
}

/// Parse and solve, keeping the error for callers that need it
pub fn solve(profile: &CalibrationProfile, input: &FormInput) -> Result<AdjustmentResult> {
    let query = QueryInput::parse(&input.distance, &input.wind_speed, &input.crosswind_angle)?;
    AdjustmentSolver::new(profile).solve(&query)
}

/// Evaluate the form. Never fails: errors become the message line.
pub fn evaluate(profile: &CalibrationProfile, input: &FormInput) -> FormOutput {
    match solve(profile, input) {
        Ok(result) => FormOutput::from_result(&result, profile.decimals),
        Err(e) => {
            tracing::debug!(error = %e, "form input rejected");
            FormOutput::from_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(distance: &str, wind: &str, angle: &str) -> FormOutput {
        evaluate(CalibrationProfile::builtin(), &FormInput::new(distance, wind, angle))
    }

    #[test]
    fn test_result_lines() {
        let out = eval("500", "0", "0");
        assert_eq!(out.vertical, "Vertical Adjustment: 3.7 MRADs");
        assert_eq!(out.horizontal, "Horizontal Adjustment: 0.3 MRADs");
        assert_eq!(out.wind, "Horizontal Adjustment (Wind): 0.0 MRADs");
        assert!(!out.is_error());
    }

    #[test]
    fn test_whole_numbers_keep_decimal() {
        let out = eval("1000", "10", "90");
        assert_eq!(out.vertical, "Vertical Adjustment: 14.0 MRADs");
        assert_eq!(out.horizontal, "Horizontal Adjustment: 0.8 MRADs");
        assert_eq!(out.wind, "Horizontal Adjustment (Wind): 0.0 MRADs");
    }

    #[test]
    fn test_between_table_keys() {
        // 285 m interpolates to exactly 1.25 vertical, which rounds to even
        let out = eval("285", "0", "0");
        assert_eq!(out.vertical, "Vertical Adjustment: 1.2 MRADs");
        assert_eq!(out.horizontal, "Horizontal Adjustment: 0.2 MRADs");

        let out = eval("725", "0", "0");
        assert_eq!(out.vertical, "Vertical Adjustment: 7.4 MRADs");
        assert_eq!(out.horizontal, "Horizontal Adjustment: 0.5 MRADs");
    }

    #[test]
    fn test_invalid_input_clears_results() {
        for (d, w, a) in [("abc", "0", "0"), ("500", "x", "0"), ("500", "0", "30"), ("500", "0", "20.0"), ("", "", "")] {
            let out = eval(d, w, a);
            assert_eq!(out.lines(), [INVALID_INPUT_MESSAGE, "", ""], "input {d:?} {w:?} {a:?}");
            assert!(out.is_error());
        }
    }

    #[test]
    fn test_out_of_range_message() {
        let out = eval("1500", "0", "0");
        assert_eq!(out.vertical, "Target distance must be between 100 and 1000 meters.");
        assert!(out.is_error());

        let out = eval("50", "0", "0");
        assert!(out.is_error());
    }

    #[test]
    fn test_usable_after_failure() {
        let profile = CalibrationProfile::builtin();
        assert!(evaluate(profile, &FormInput::new("bad", "0", "0")).is_error());
        let out = evaluate(profile, &FormInput::new("750", "5", "45"));
        assert_eq!(out.vertical, "Vertical Adjustment: 7.9 MRADs");
    }

    #[test]
    fn test_format_line_precision() {
        assert_eq!(format_line("X", 0.0, 1), "X: 0.0 MRADs");
        assert_eq!(format_line("X", 1.25, 2), "X: 1.25 MRADs");
    }
}
