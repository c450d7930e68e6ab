/// Calibration constants for the L129A1 rifle with 146 gr 7.62mm ammunition

/// Display name of the built-in profile
pub const DEFAULT_PROFILE_NAME: &str = "Bullet Drop Calculator for L129A1/146gr-0.308-7.62mm";

/// Range table: (distance_m, vertical_mrad, horizontal_mrad)
///
/// 100 m to 1000 m in 50 m steps. Horizontal values are raw table values
/// before the horizontal divisor is applied.
pub const L129A1_ADJUSTMENTS: [(u32, f64, f64); 19] = [
    (100, 0.0, 0.2),
    (150, 0.2, 0.4),
    (200, 0.5, 0.5),
    (250, 0.9, 0.6),
    (300, 1.4, 0.8),
    (350, 1.9, 0.9),
    (400, 2.4, 1.1),
    (450, 3.0, 1.3),
    (500, 3.7, 1.4),
    (550, 4.4, 1.6),
    (600, 5.2, 1.8),
    (650, 6.0, 1.9),
    (700, 6.9, 2.1),
    (750, 7.9, 2.3),
    (800, 9.9, 2.5),
    (850, 10.1, 2.7),
    (900, 11.3, 3.0),
    (950, 12.6, 3.2),
    (1000, 14.0, 3.4),
];

/// Crosswind coefficients: (angle_deg, coefficient)
///
/// 0° is wind along the line of fire, 90° is a full-value crosswind.
pub const L129A1_WIND_COEFFICIENTS: [(u16, f64); 4] = [
    (0, 0.0),
    (20, 0.5),
    (45, 0.8),
    (90, 1.0),
];

/// Horizontal table values are divided by this before rounding
pub const HORIZONTAL_DIVISOR: f64 = 4.0;

/// Vertical MRAD per 10 meters outside the table
///
/// Uncalibrated for this profile; kept at zero.
pub const VERTICAL_PER_10M: f64 = 0.0;

/// Horizontal MRAD per 10 meters, baseline for the wind correction
///
/// Uncalibrated for this profile, which makes the wind correction zero.
pub const HORIZONTAL_PER_10M: f64 = 0.0;

/// Wind MRAD adjustment factor
pub const WIND_MRAD_FACTOR: f64 = 0.25;

/// Decimal places shown for every adjustment
pub const ADJUSTMENT_DECIMALS: u32 = 1;

/// Minimum span between table keys treated as a distinct segment
pub const MIN_DIVISION_THRESHOLD: f64 = 1e-12;
