//! Rate token decoding.
//!
//! `tc` prints rates as `<number><unit>bit` where the unit is empty, `K`,
//! `M` or `G` (decimal multipliers), e.g. `100Mbit`, `1.5Gbit`, `0bit`.

use crate::error::{Error, Result};

/// Decode a single rate token from a class description.
///
/// Returns `None` when the token is not a rate (`1600b`, `prio`, ...).
pub fn rate_token(token: &str) -> Option<u64> {
    let body = token.strip_suffix("bit")?;
    let (num_str, unit) = split_number_unit(body);
    if num_str.is_empty() {
        return None;
    }
    let multiplier = unit_multiplier(unit)?;
    to_bits(num_str, multiplier)
}

/// Largest rate among `tokens`, in bits per second.
///
/// A largest value of zero means the class has no usable ceiling.
pub fn max_rate<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Option<u64> {
    tokens
        .into_iter()
        .filter_map(rate_token)
        .max()
        .filter(|&rate| rate > 0)
}

/// Parse a user supplied rate (bits per second).
///
/// Accepts the same syntax `tc` does: `1000`, `500kbit`, `200Mbit`, `1gbit`,
/// and the `bps` spellings.
pub fn parse_rate(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();
    let (num_str, unit) = split_number_unit(&s);
    let unit = unit
        .strip_suffix("bit")
        .or_else(|| unit.strip_suffix("bps"))
        .unwrap_or(unit);

    let multiplier =
        unit_multiplier(unit).ok_or_else(|| Error::InvalidCapacity(format!("unknown unit in '{}'", s)))?;
    to_bits(num_str, multiplier).ok_or_else(|| Error::InvalidCapacity(s.clone()))
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    match unit {
        "" => Some(1),
        "K" | "k" => Some(1_000),
        "M" | "m" => Some(1_000_000),
        "G" | "g" => Some(1_000_000_000),
        _ => None,
    }
}

fn to_bits(num_str: &str, multiplier: u64) -> Option<u64> {
    let num: f64 = num_str.parse().ok()?;
    if !num.is_finite() || num < 0.0 {
        return None;
    }
    Some((num * multiplier as f64).round() as u64)
}

/// Split a string into number and unit parts.
fn split_number_unit(s: &str) -> (&str, &str) {
    let idx = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    (&s[..idx], &s[idx..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_token_units() {
        assert_eq!(rate_token("0bit"), Some(0));
        assert_eq!(rate_token("800bit"), Some(800));
        assert_eq!(rate_token("128Kbit"), Some(128_000));
        assert_eq!(rate_token("100Mbit"), Some(100_000_000));
        assert_eq!(rate_token("1.5Mbit"), Some(1_500_000));
        assert_eq!(rate_token("10Gbit"), Some(10_000_000_000));
    }

    #[test]
    fn test_rate_token_rejects_non_rates() {
        assert_eq!(rate_token("1600b"), None);
        assert_eq!(rate_token("bit"), None);
        assert_eq!(rate_token("rate"), None);
        assert_eq!(rate_token("5Tbit"), None);
        assert_eq!(rate_token("0pps"), None);
    }

    #[test]
    fn test_max_rate_takes_largest() {
        let text = "class htb 1:10 parent 1:1 prio 0 rate 10Mbit ceil 50Mbit burst 1600b cburst 1600b";
        assert_eq!(max_rate(text.split_whitespace()), Some(50_000_000));
    }

    #[test]
    fn test_max_rate_zero_is_unknown() {
        assert_eq!(max_rate("rate 0bit 0pps backlog 0b 0p requeues 0".split_whitespace()), None);
        assert_eq!(max_rate("class prio 1:1 parent 1:".split_whitespace()), None);
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("1000").unwrap(), 1000);
        assert_eq!(parse_rate("200Mbit").unwrap(), 200_000_000);
        assert_eq!(parse_rate("1gbit").unwrap(), 1_000_000_000);
        assert_eq!(parse_rate("500kbps").unwrap(), 500_000);
        assert!(parse_rate("fast").is_err());
        assert!(parse_rate("10xbit").is_err());
    }
}
