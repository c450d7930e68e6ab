/// Round to a fixed number of decimal places.
///
/// Rounds the exact binary value, ties to even: 1.4 / 4 is stored just below
/// 0.35 and becomes 0.3, an exact 1.25 becomes 1.2. Precision formatting in
/// `core::fmt` already rounds this way, so the value goes through its decimal
/// text. Negative zero is returned as 0.0.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let text = format!("{:.*}", decimals as usize, value);
    // -0.0 + 0.0 == +0.0
    text.parse::<f64>().map(|r| r + 0.0).unwrap_or(value)
}
