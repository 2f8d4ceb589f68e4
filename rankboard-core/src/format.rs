//! Cell formatting shared by every renderer.
//!
//! Nullable and non-finite numbers always render as `PLACEHOLDER`, never as
//! `null` or `NaN`.

pub const PLACEHOLDER: &str = "-";

/// Fixed-point with `decimals` places, or the placeholder.
pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Scores (composite, momentum, RS): four decimals.
pub fn score(value: Option<f64>) -> String {
    fixed(value, 4)
}

/// Prices (moving averages, analyst targets): two decimals.
pub fn price(value: Option<f64>) -> String {
    fixed(value, 2)
}

pub fn count(value: Option<u32>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

pub fn text(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_become_placeholder() {
        assert_eq!(score(None), "-");
        assert_eq!(price(None), "-");
        assert_eq!(count(None), "-");
        assert_eq!(text(None), "-");
        assert_eq!(text(Some("")), "-");
    }

    #[test]
    fn non_finite_never_leaks() {
        assert_eq!(score(Some(f64::NAN)), "-");
        assert_eq!(price(Some(f64::INFINITY)), "-");
    }

    #[test]
    fn precision() {
        assert_eq!(score(Some(0.1234)), "0.1234");
        assert_eq!(score(Some(-1.5)), "-1.5000");
        assert_eq!(price(Some(101.256)), "101.26");
        assert_eq!(count(Some(42)), "42");
        assert_eq!(text(Some("Strong Buy")), "Strong Buy");
    }
}
