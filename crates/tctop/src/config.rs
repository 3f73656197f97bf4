//! Report configuration.

use std::time::Duration;

use crate::output::OutputFormat;
use crate::rank::{Limit, Metric};
use crate::sample::DEFAULT_INTERVAL;

/// Default reference link capacity, 200 Mbit/s.
pub const DEFAULT_CAPACITY_BPS: u64 = 200_000_000;

/// Report shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Ranked table.
    #[default]
    Flat,
    /// Indented class tree.
    Tree,
}

/// Everything one report run needs besides the data source.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Gap between the two captures of a rate metric.
    pub interval: Duration,
    /// Rows shown in flat mode.
    pub limit: Limit,
    /// Reference link capacity in bits/sec.
    pub capacity_bps: u64,
    /// Ordering metric.
    pub metric: Metric,
    pub mode: Mode,
    pub format: OutputFormat,
    /// Pretty print JSON.
    pub pretty: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            limit: Limit::default(),
            capacity_bps: DEFAULT_CAPACITY_BPS,
            metric: Metric::default(),
            mode: Mode::default(),
            format: OutputFormat::default(),
            pretty: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.interval, Duration::from_secs(3));
        assert_eq!(config.limit, Limit::Top(20));
        assert_eq!(config.capacity_bps, 200_000_000);
        assert_eq!(config.metric, Metric::RateBytesPerSec);
        assert_eq!(config.mode, Mode::Flat);
        assert_eq!(config.format, OutputFormat::Text);
    }
}
