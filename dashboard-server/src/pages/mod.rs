//! Dashboard pages
//!
//! Each page is a pure function: validated request + fetched companies →
//! response body. Nothing is kept between requests.
//!
//! Display rows never carry `null`: missing numbers render as 0 and
//! missing text as an empty string.

pub mod high_risk;
pub mod ml_priority;

/// Display value for an optional number
pub fn num(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Display value for an optional text column
pub fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_cleaning() {
        assert_eq!(num(Some(2.5)), 2.5);
        assert_eq!(num(None), 0.0);
        assert_eq!(num(Some(f64::NAN)), 0.0);
        assert_eq!(text(&Some("SC".to_string())), "SC");
        assert_eq!(text(&None), "");
    }
}
