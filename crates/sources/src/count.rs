//! Counter state parsing.

/// Parse a raw counter state into a count.
///
/// Accepts non-negative integers and non-negative decimals (floored).
/// Returns `None` for anything else, including `unknown` and `unavailable`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(count) = raw.parse::<u64>() {
        return Some(count);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value.floor() as u64),
        _ => None,
    }
}
