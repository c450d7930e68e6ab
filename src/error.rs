use thiserror::Error;

/// Errors produced while loading profiles or computing adjustments
#[derive(Error, Debug)]
pub enum CalculatorError {
    /// Non-numeric or non-finite input, or a crosswind angle outside {0, 20, 45, 90}
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Distance outside the table's covered range
    #[error("Distance {distance} m is outside the table range {min}-{max} m")]
    OutOfRange { distance: f64, min: u32, max: u32 },

    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Profile parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalculatorError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CalculatorError::InvalidInput(_))
    }

    pub fn is_out_of_range(&self) -> bool {
        matches!(self, CalculatorError::OutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = CalculatorError::OutOfRange { distance: 1200.0, min: 100, max: 1000 };
        assert_eq!(err.to_string(), "Distance 1200 m is outside the table range 100-1000 m");
        assert!(err.is_out_of_range());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let err: CalculatorError = io.into();
        assert!(matches!(err, CalculatorError::Io(_)));
    }
}
