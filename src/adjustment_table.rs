/// Range table lookup and linear interpolation of MRAD adjustments
use serde::{Deserialize, Serialize};

use crate::constants::MIN_DIVISION_THRESHOLD;
use crate::error::{CalculatorError, Result};
use crate::rounding::round_to;

/// Vertical and horizontal sight adjustment in MRAD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MradAdjustment {
    pub vertical: f64,
    pub horizontal: f64,
}

impl MradAdjustment {
    pub fn new(vertical: f64, horizontal: f64) -> Self {
        Self { vertical, horizontal }
    }

    /// `self + offset * (other - self) / span`, multiplying before dividing
    fn lerp(&self, other: &MradAdjustment, offset: f64, span: f64) -> MradAdjustment {
        MradAdjustment {
            vertical: self.vertical + offset * (other.vertical - self.vertical) / span,
            horizontal: self.horizontal + offset * (other.horizontal - self.horizontal) / span,
        }
    }
}

/// What to do with a distance outside the table's covered range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Fail with `CalculatorError::OutOfRange`
    #[default]
    Reject,
    /// Use the nearest edge row
    Clamp,
    /// Continue the nearest edge segment linearly
    Extrapolate,
}

impl std::fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RangePolicy::Reject => "reject",
            RangePolicy::Clamp => "clamp",
            RangePolicy::Extrapolate => "extrapolate",
        };
        f.pad(name)
    }
}

/// Where a distance falls relative to the table keys
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bracket {
    Exact(usize),
    Between { floor: usize, ceiling: usize },
    Below,
    Above,
}

/// Immutable range table ordered by distance
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentTable {
    rows: Vec<(u32, MradAdjustment)>,
}

impl AdjustmentTable {
    /// Build a table from (distance, adjustment) rows in any order.
    ///
    /// Rejects an empty table, duplicate distances and non-finite values.
    pub fn new(mut rows: Vec<(u32, MradAdjustment)>) -> Result<Self> {
        if rows.is_empty() {
            return Err(CalculatorError::InvalidProfile("adjustment table is empty".into()));
        }

        rows.sort_by_key(|(distance, _)| *distance);

        if let Some(pair) = rows.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(CalculatorError::InvalidProfile(format!(
                "duplicate adjustment row for {} m",
                pair[0].0
            )));
        }

        if let Some((distance, _)) = rows
            .iter()
            .find(|(_, adj)| !adj.vertical.is_finite() || !adj.horizontal.is_finite())
        {
            return Err(CalculatorError::InvalidProfile(format!(
                "non-finite adjustment at {} m",
                distance
            )));
        }

        Ok(Self { rows })
    }

    pub fn from_rows(rows: &[(u32, f64, f64)]) -> Result<Self> {
        Self::new(
            rows.iter()
                .map(|&(d, v, h)| (d, MradAdjustment::new(v, h)))
                .collect(),
        )
    }

    pub fn min_distance(&self) -> u32 {
        self.rows[0].0
    }

    pub fn max_distance(&self) -> u32 {
        self.rows[self.rows.len() - 1].0
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[(u32, MradAdjustment)] {
        &self.rows
    }

    /// Stored adjustment for an exact table distance
    pub fn get(&self, distance: u32) -> Option<MradAdjustment> {
        self.rows
            .binary_search_by_key(&distance, |(d, _)| *d)
            .ok()
            .map(|idx| self.rows[idx].1)
    }

    fn bracket(&self, distance: f64) -> Bracket {
        // First row whose key is >= distance
        let ceiling = self.rows.partition_point(|(d, _)| (*d as f64) < distance);

        if ceiling == self.rows.len() {
            Bracket::Above
        } else if self.rows[ceiling].0 as f64 == distance {
            Bracket::Exact(ceiling)
        } else if ceiling == 0 {
            Bracket::Below
        } else {
            Bracket::Between { floor: ceiling - 1, ceiling }
        }
    }

    fn interpolate_segment(&self, distance: f64, floor: usize, ceiling: usize) -> MradAdjustment {
        let (d0, a0) = self.rows[floor];
        let (d1, a1) = self.rows[ceiling];
        let span = d1 as f64 - d0 as f64;

        if span.abs() < MIN_DIVISION_THRESHOLD {
            return a0;
        }

        a0.lerp(&a1, distance - d0 as f64, span)
    }

    /// Unrounded table value at `distance`.
    ///
    /// Exact key hits return the stored row untouched. Distances between
    /// keys are interpolated linearly between the floor and ceiling rows.
    pub fn interpolate(&self, distance: f64, policy: RangePolicy) -> Result<MradAdjustment> {
        if !distance.is_finite() {
            return Err(CalculatorError::InvalidInput(format!(
                "distance must be a finite number, got {}",
                distance
            )));
        }

        let last = self.rows.len() - 1;

        match self.bracket(distance) {
            Bracket::Exact(idx) => Ok(self.rows[idx].1),
            Bracket::Between { floor, ceiling } => {
                Ok(self.interpolate_segment(distance, floor, ceiling))
            }
            Bracket::Below | Bracket::Above if policy == RangePolicy::Reject => {
                Err(CalculatorError::OutOfRange {
                    distance,
                    min: self.min_distance(),
                    max: self.max_distance(),
                })
            }
            Bracket::Below => {
                tracing::warn!(distance, min = self.min_distance(), %policy, "distance below table range");
                match policy {
                    RangePolicy::Extrapolate if last > 0 => {
                        Ok(self.interpolate_segment(distance, 0, 1))
                    }
                    _ => Ok(self.rows[0].1),
                }
            }
            Bracket::Above => {
                tracing::warn!(distance, max = self.max_distance(), %policy, "distance above table range");
                match policy {
                    RangePolicy::Extrapolate if last > 0 => {
                        Ok(self.interpolate_segment(distance, last - 1, last))
                    }
                    _ => Ok(self.rows[last].1),
                }
            }
        }
    }
}

/// Sight adjustment for a target distance.
///
/// Vertical is the interpolated table value rounded to `decimals`.
/// Horizontal is the interpolated table value divided by
/// `horizontal_divisor`, then rounded.
pub fn calculate_mrad_adjustments(
    table: &AdjustmentTable,
    distance: f64,
    policy: RangePolicy,
    horizontal_divisor: f64,
    decimals: u32,
) -> Result<MradAdjustment> {
    let raw = table.interpolate(distance, policy)?;

    let adjustment = MradAdjustment {
        vertical: round_to(raw.vertical, decimals),
        horizontal: round_to(raw.horizontal / horizontal_divisor, decimals),
    };

    tracing::debug!(
        distance,
        raw_vertical = raw.vertical,
        raw_horizontal = raw.horizontal,
        vertical = adjustment.vertical,
        horizontal = adjustment.horizontal,
        "interpolated MRAD adjustment"
    );

    Ok(adjustment)
}
