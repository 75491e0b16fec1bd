//! Conversion arithmetic and number formatting for rate consumers.
//!
//! Every conversion takes the rate as reported by the endpoint and yields
//! `None` instead of a number when that rate is unusable, so callers never
//! display a result computed from a missing or NaN rate.

use serde_json::Value;

/// Parses user input made only of digits and at most one decimal point.
pub fn parse_amount(input: &str) -> Option<f64> {
    let input = input.trim();
    let well_formed = input.chars().all(|c| c.is_ascii_digit() || c == '.')
        && input.chars().filter(|c| *c == '.').count() <= 1;
    if !well_formed {
        return None;
    }
    input.parse::<f64>().ok()
}

fn usable_rate(rate: f64) -> Option<f64> {
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

pub fn usd_to_cop(usd: f64, rate: f64) -> Option<f64> {
    usable_rate(rate).map(|r| usd * r)
}

pub fn cop_to_usd(cop: f64, rate: f64) -> Option<f64> {
    usable_rate(rate).map(|r| cop / r)
}

/// Shortcut for the ×1,000 and ×1,000,000 buttons on peso amounts.
pub fn scale_amount(amount: f64, multiplier: f64) -> f64 {
    amount * multiplier
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// en-US grouping with exactly two decimals, e.g. `1,234,567.80`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((&fixed, "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{}.{frac_part}", group_thousands(int_part))
}

/// en-US grouping with at most two decimals, e.g. `4,000.5`.
pub fn format_rate(value: f64) -> String {
    let formatted = format_amount(value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

pub fn rate_headline(rate: f64) -> String {
    format!("1 USD = {} COP", format_rate(rate))
}

/// Extracts a usable rate from an endpoint body. Anything other than a
/// positive numeric `rate` field means the rate is unavailable.
pub fn rate_from_body(body: &Value) -> Option<f64> {
    body.get("rate").and_then(Value::as_f64).and_then(usable_rate)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount(".75"), Some(0.75));
        assert_eq!(parse_amount("5."), Some(5.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("."), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("-4"), None);
        assert_eq!(parse_amount("1,000"), None);
        assert_eq!(parse_amount("1e3"), None);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(usd_to_cop(10.0, 4000.0), Some(40000.0));
        assert_eq!(cop_to_usd(40000.0, 4000.0), Some(10.0));
    }

    #[test]
    fn test_conversions_refuse_unusable_rates() {
        assert_eq!(usd_to_cop(10.0, f64::NAN), None);
        assert_eq!(usd_to_cop(10.0, 0.0), None);
        assert_eq!(cop_to_usd(10.0, 0.0), None);
        assert_eq!(cop_to_usd(10.0, -1.0), None);
    }

    #[test]
    fn test_round_trip_within_two_decimals() {
        let rates = [3850.12, 4000.0, 4187.456, 0.5, 1.0];
        let amounts = [0.01, 1.0, 19.99, 250.5, 1234.56, 987654.32];
        for rate in rates {
            for amount in amounts {
                let cop = usd_to_cop(amount, rate).unwrap();
                let back = cop_to_usd(cop, rate).unwrap();
                assert!(
                    (round2(back) - round2(amount)).abs() < 0.005,
                    "{amount} USD at {rate} came back as {back}"
                );
            }
        }
    }

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount(4.5, 1_000.0), 4_500.0);
        assert_eq!(scale_amount(2.0, 1_000_000.0), 2_000_000.0);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1234567.8), "1,234,567.80");
        assert_eq!(format_amount(-1234.5), "-1,234.50");
    }

    #[test]
    fn test_format_rate_and_headline() {
        assert_eq!(format_rate(4000.0), "4,000");
        assert_eq!(format_rate(4000.5), "4,000.5");
        assert_eq!(format_rate(3912.456), "3,912.46");
        assert_eq!(rate_headline(4000.5), "1 USD = 4,000.5 COP");
    }

    #[test]
    fn test_rate_from_body() {
        assert_eq!(
            rate_from_body(&json!({"rate": 4000.5, "date": "2024-01-01", "cached": true})),
            Some(4000.5)
        );
        assert_eq!(rate_from_body(&json!({"rate": 3900})), Some(3900.0));
        assert_eq!(
            rate_from_body(&json!({"error": "Unable to fetch or cache exchange rate."})),
            None
        );
        assert_eq!(rate_from_body(&json!({"rate": "4000"})), None);
        assert_eq!(rate_from_body(&json!({"rate": null})), None);
        assert_eq!(rate_from_body(&json!([1, 2])), None);
    }
}
