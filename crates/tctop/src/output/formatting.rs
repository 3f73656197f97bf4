//! Human-readable formatting of rates and percentages.
//!
//! # Example
//!
//! ```
//! use tctop::output::formatting::{format_percent, format_rate_bits, format_rate_bytes};
//!
//! assert_eq!(format_rate_bytes(1024.0), "1.0KiB/s");
//! assert_eq!(format_rate_bits(1_000_000.0), "1.0Mbps");
//! assert_eq!(format_percent(Some(42.2)), "42 %");
//! assert_eq!(format_percent(None), "--- %");
//! ```

/// Shown in place of a percentage whose denominator is zero or unknown.
pub const PERCENT_PLACEHOLDER: &str = "--- %";

/// Shown in place of an unknown value.
pub const VALUE_PLACEHOLDER: &str = "---";

/// Format a byte rate using binary units (KiB/s, MiB/s, ...).
///
/// Negative rates keep their sign.
///
/// ```
/// use tctop::output::formatting::format_rate_bytes;
///
/// assert_eq!(format_rate_bytes(0.0), "0.0B/s");
/// assert_eq!(format_rate_bytes(512.0), "512.0B/s");
/// assert_eq!(format_rate_bytes(1_048_576.0), "1.0MiB/s");
/// assert_eq!(format_rate_bytes(-2048.0), "-2.0KiB/s");
/// ```
pub fn format_rate_bytes(bytes_per_sec: f64) -> String {
    scaled(bytes_per_sec, 1024.0, &["B/s", "KiB/s", "MiB/s", "GiB/s", "TiB/s"])
}

/// Format a bit rate using decimal units (Kbps, Mbps, ...).
///
/// ```
/// use tctop::output::formatting::format_rate_bits;
///
/// assert_eq!(format_rate_bits(800.0), "800.0bps");
/// assert_eq!(format_rate_bits(1_500.0), "1.5Kbps");
/// assert_eq!(format_rate_bits(200_000_000.0), "200.0Mbps");
/// assert_eq!(format_rate_bits(10_000_000_000.0), "10.0Gbps");
/// ```
pub fn format_rate_bits(bits_per_sec: f64) -> String {
    scaled(bits_per_sec, 1000.0, &["bps", "Kbps", "Mbps", "Gbps", "Tbps"])
}

/// Format a packet rate as a whole number.
pub fn format_packets(packets_per_sec: f64) -> String {
    format!("{:.0}", packets_per_sec)
}

/// Format a percentage with no decimals, or the placeholder.
pub fn format_percent(percent: Option<f64>) -> String {
    match percent {
        Some(p) => format!("{:.0} %", p),
        None => PERCENT_PLACEHOLDER.to_string(),
    }
}

/// Format an optional value with `f`, or the placeholder.
pub fn or_placeholder<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_else(|| VALUE_PLACEHOLDER.to_string())
}

fn scaled(value: f64, base: f64, units: &[&str]) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let mut magnitude = value.abs();
    let mut unit = 0;
    while magnitude >= base && unit + 1 < units.len() {
        magnitude /= base;
        unit += 1;
    }
    format!("{}{:.1}{}", sign, magnitude, units[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate_bytes() {
        assert_eq!(format_rate_bytes(1023.0), "1023.0B/s");
        assert_eq!(format_rate_bytes(1536.0), "1.5KiB/s");
        assert_eq!(format_rate_bytes(1024.0 * 1024.0 * 1024.0), "1.0GiB/s");
    }

    #[test]
    fn test_format_rate_bits_caps_at_largest_unit() {
        assert_eq!(format_rate_bits(5e15), "5000.0Tbps");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(0.0)), "0 %");
        assert_eq!(format_percent(Some(99.7)), "100 %");
        assert_eq!(format_percent(Some(-25.0)), "-25 %");
        assert_eq!(format_percent(None), "--- %");
    }

    #[test]
    fn test_or_placeholder() {
        assert_eq!(or_placeholder(Some(3.0), format_packets), "3");
        assert_eq!(or_placeholder(None::<f64>, format_packets), "---");
    }
}
