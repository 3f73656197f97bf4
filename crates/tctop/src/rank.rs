//! Ranking and aggregation.
//!
//! A [`Ranking`] holds every class of a run sorted ascending by one
//! [`Metric`], together with [`Totals`] computed over the whole set.
//! Percentages are always taken against those totals, so truncating the
//! displayed rows never changes them.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::handle::ClassId;
use crate::record::ClassRecord;

/// Value a ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Sent bytes counter.
    SentBytes,
    /// Sent packets counter.
    SentPackets,
    /// Dropped packets counter.
    Dropped,
    /// Overlimits counter.
    Overlimits,
    /// Requeues counter.
    Requeues,
    /// Sampled bytes per second.
    #[default]
    RateBytesPerSec,
    /// Sampled packets per second.
    RatePacketsPerSec,
}

impl Metric {
    /// Every metric, in display order.
    pub const ALL: [Metric; 7] = [
        Metric::SentBytes,
        Metric::SentPackets,
        Metric::Dropped,
        Metric::Overlimits,
        Metric::Requeues,
        Metric::RateBytesPerSec,
        Metric::RatePacketsPerSec,
    ];

    /// Name accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Metric::SentBytes => "sentBytes",
            Metric::SentPackets => "sentPackets",
            Metric::Dropped => "dropped",
            Metric::Overlimits => "overlimits",
            Metric::Requeues => "requeues",
            Metric::RateBytesPerSec => "rateBytesPerSec",
            Metric::RatePacketsPerSec => "ratePacketsPerSec",
        }
    }

    /// Names of every metric.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|m| m.name()).collect()
    }

    /// Whether this metric needs two captures.
    pub const fn is_rate(self) -> bool {
        matches!(self, Metric::RateBytesPerSec | Metric::RatePacketsPerSec)
    }

    /// Value of this metric for `record`; `None` when the rate is unknown.
    pub fn value(self, record: &ClassRecord) -> Option<f64> {
        let stats = &record.stats;
        match self {
            Metric::SentBytes => Some(stats.sent_bytes as f64),
            Metric::SentPackets => Some(stats.sent_packets as f64),
            Metric::Dropped => Some(stats.dropped as f64),
            Metric::Overlimits => Some(stats.overlimits as f64),
            Metric::Requeues => Some(stats.requeues as f64),
            Metric::RateBytesPerSec => record.rates.map(|r| r.bytes_per_sec),
            Metric::RatePacketsPerSec => record.rates.map(|r| r.packets_per_sec),
        }
    }

    /// Ascending order of two records by this metric.
    ///
    /// Unknown values sort below every known value. Ties keep their
    /// input order when used with a stable sort.
    pub fn compare(self, a: &ClassRecord, b: &ClassRecord) -> Ordering {
        compare_values(self.value(a), self.value(b))
    }
}

/// Ascending order of optional metric values, unknown first.
pub fn compare_values(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::unknown_metric(s, &Self::names()))
    }
}

/// Aggregate rates over every class of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of byte rates.
    pub bytes_per_sec: f64,
    /// Sum of bit rates.
    pub bits_per_sec: f64,
    /// Sum of packet rates.
    pub packets_per_sec: f64,
}

impl Totals {
    /// Sum the known rates of `records`.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ClassRecord>) -> Self {
        records
            .into_iter()
            .filter_map(|r| r.rates)
            .fold(Self::default(), |mut acc, rates| {
                acc.bytes_per_sec += rates.bytes_per_sec;
                acc.bits_per_sec += rates.bits_per_sec();
                acc.packets_per_sec += rates.packets_per_sec;
                acc
            })
    }
}

/// `part` as a percentage of `whole`.
///
/// `None` when the denominator is unknown or zero.
pub fn percent(part: f64, whole: Option<f64>) -> Option<f64> {
    match whole {
        Some(whole) if whole != 0.0 && whole.is_finite() => Some(part / whole * 100.0),
        _ => None,
    }
}

/// How many rows to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// No truncation.
    All,
    /// At most this many rows.
    Top(usize),
}

impl Default for Limit {
    fn default() -> Self {
        Limit::Top(20)
    }
}

impl FromStr for Limit {
    type Err = Error;

    /// `-1` means unlimited, any other value must be non-negative.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<i64>() {
            Ok(-1) => Ok(Limit::All),
            Ok(n) if n >= 0 => Ok(Limit::Top(n as usize)),
            _ => Err(Error::InvalidLimit(s.to_string())),
        }
    }
}

/// Classes of one run sorted by a metric.
#[derive(Debug, Clone)]
pub struct Ranking {
    metric: Metric,
    records: Vec<ClassRecord>,
    totals: Totals,
    index: HashMap<ClassId, usize>,
}

impl Ranking {
    /// Sort `records` ascending by `metric` and compute totals.
    pub fn new(metric: Metric, mut records: Vec<ClassRecord>) -> Self {
        records.sort_by(|a, b| metric.compare(a, b));
        let totals = Totals::from_records(&records);
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.class_id, i))
            .collect();
        Self {
            metric,
            records,
            totals,
            index,
        }
    }

    /// Metric the ranking is ordered by.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Records in ascending order.
    pub fn records(&self) -> &[ClassRecord] {
        &self.records
    }

    /// Totals over every record.
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Number of ranked classes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no class was ranked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a class by id.
    pub fn get(&self, class_id: &ClassId) -> Option<&ClassRecord> {
        self.index.get(class_id).map(|&i| &self.records[i])
    }

    /// Records in descending order, truncated to `limit`.
    pub fn top(&self, limit: Limit) -> impl Iterator<Item = &ClassRecord> {
        let take = match limit {
            Limit::All => self.records.len(),
            Limit::Top(n) => n,
        };
        self.records.iter().rev().take(take)
    }

    /// Share of the total byte rate, in percent.
    pub fn share_of_bytes(&self, record: &ClassRecord) -> Option<f64> {
        let rates = record.rates?;
        percent(rates.bytes_per_sec, Some(self.totals.bytes_per_sec))
    }

    /// Share of the total packet rate, in percent.
    pub fn share_of_packets(&self, record: &ClassRecord) -> Option<f64> {
        let rates = record.rates?;
        percent(rates.packets_per_sec, Some(self.totals.packets_per_sec))
    }
}
