//! Snapshots and rate computation.
//!
//! Rates come from two captures of the class counters:
//!
//! ```ignore
//! use tctop::sample::Sampler;
//! use tctop::source::TcCommand;
//! use std::time::Duration;
//!
//! let tc = TcCommand::new("eth0");
//! let snapshot = Sampler::new(Duration::from_secs(3)).sample(&tc).await?;
//! for class in &snapshot.classes {
//!     if let Some(rates) = class.rates {
//!         println!("{}: {:.0} B/s", class.class_id, rates.bytes_per_sec);
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::handle::ClassId;
use crate::parse::{parse_classes, parse_filters};
use crate::reconcile::reconcile;
use crate::record::{ClassRates, ClassRecord, ClassStats};
use crate::source::TcSource;

/// Default gap between the two captures.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

/// Classes captured at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Monotonic time taken right before the capture started.
    pub taken_at: Instant,
    /// Reconciled classes in dump order.
    pub classes: Vec<ClassRecord>,
}

impl Snapshot {
    /// Create a snapshot from already parsed classes.
    pub fn new(taken_at: Instant, classes: Vec<ClassRecord>) -> Self {
        Self { taken_at, classes }
    }

    /// Capture filters and classes from `source` and join them.
    pub async fn capture<S: TcSource>(source: &S) -> Result<Self> {
        let taken_at = Instant::now();
        let filters = parse_filters(&source.filter_dump().await?);
        let classes = parse_classes(&source.class_dump().await?);
        tracing::debug!(
            filters = filters.len(),
            classes = classes.len(),
            "captured snapshot"
        );
        Ok(Self::new(taken_at, reconcile(&filters, classes)))
    }

    /// Look up a class by id.
    pub fn get(&self, class_id: &ClassId) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| &c.class_id == class_id)
    }

    /// Seconds from `earlier` to this snapshot, negative if this one is older.
    pub fn secs_since(&self, earlier: &Snapshot) -> f64 {
        match self.taken_at.checked_duration_since(earlier.taken_at) {
            Some(d) => d.as_secs_f64(),
            None => -earlier.taken_at.duration_since(self.taken_at).as_secs_f64(),
        }
    }

    /// Attach rates computed against `earlier` and return the result.
    pub fn with_rates_since(mut self, earlier: &Snapshot) -> Result<Self> {
        let elapsed = self.secs_since(earlier);
        apply_rates(&earlier.classes, &mut self.classes, elapsed)?;
        Ok(self)
    }
}

/// Attach per-second rates to `later` using counters from `earlier`.
///
/// Classes missing from `earlier` keep `rates == None`. A counter that
/// went backwards yields a negative rate.
pub fn apply_rates(
    earlier: &[ClassRecord],
    later: &mut [ClassRecord],
    elapsed_secs: f64,
) -> Result<()> {
    if elapsed_secs.is_nan() || elapsed_secs <= 0.0 {
        return Err(Error::Sampling { elapsed_secs });
    }

    let previous: HashMap<ClassId, &ClassStats> =
        earlier.iter().map(|c| (c.class_id, &c.stats)).collect();

    for class in later.iter_mut() {
        let Some(prev) = previous.get(&class.class_id) else {
            tracing::debug!(class_id = %class.class_id, "class is new, rate unknown");
            continue;
        };

        let rates = ClassRates {
            bytes_per_sec: delta(prev.sent_bytes, class.stats.sent_bytes) / elapsed_secs,
            packets_per_sec: delta(prev.sent_packets, class.stats.sent_packets) / elapsed_secs,
        };
        if rates.bytes_per_sec < 0.0 || rates.packets_per_sec < 0.0 {
            tracing::warn!(class_id = %class.class_id, "counters went backwards between samples");
        }
        class.rates = Some(rates);
    }
    Ok(())
}

fn delta(before: u64, after: u64) -> f64 {
    (i128::from(after) - i128::from(before)) as f64
}

/// Takes two snapshots separated by a fixed interval.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    interval: Duration,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Sampler {
    /// Create a sampler waiting `interval` between captures.
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Gap between the two captures.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Capture, wait, capture again and return the second snapshot with
    /// rates attached.
    pub async fn sample<S: TcSource>(&self, source: &S) -> Result<Snapshot> {
        let first = Snapshot::capture(source).await?;
        tokio::time::sleep(self.interval).await;
        let second = Snapshot::capture(source).await?;
        tracing::debug!(
            elapsed_secs = second.secs_since(&first),
            "second capture done"
        );
        second.with_rates_since(&first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(minor: u16, sent_bytes: u64, sent_packets: u64) -> ClassRecord {
        ClassRecord::new(
            ClassId::new(1, minor),
            None,
            ClassStats {
                sent_bytes,
                sent_packets,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_rate_is_delta_over_elapsed() {
        let earlier = vec![class(1, 1000, 10)];
        let mut later = vec![class(1, 2000, 30)];
        apply_rates(&earlier, &mut later, 2.0).unwrap();

        let rates = later[0].rates.unwrap();
        assert_eq!(rates.bytes_per_sec, 500.0);
        assert_eq!(rates.packets_per_sec, 10.0);
        assert_eq!(rates.bits_per_sec(), 4000.0);
    }

    #[test]
    fn test_non_positive_elapsed_fails() {
        for elapsed in [0.0, -1.5, f64::NAN] {
            let mut later = vec![class(1, 2000, 30)];
            let err = apply_rates(&[class(1, 1000, 10)], &mut later, elapsed).unwrap_err();
            assert!(matches!(err, Error::Sampling { .. }));
            assert!(later[0].rates.is_none());
        }
    }

    #[test]
    fn test_new_class_has_unknown_rate() {
        let mut later = vec![class(1, 2000, 30), class(2, 500, 5)];
        apply_rates(&[class(1, 1000, 10)], &mut later, 1.0).unwrap();
        assert!(later[0].rates.is_some());
        assert!(later[1].rates.is_none());
    }

    #[test]
    fn test_counter_reset_is_negative() {
        let mut later = vec![class(1, 100, 1)];
        apply_rates(&[class(1, 1100, 11)], &mut later, 2.0).unwrap();
        let rates = later[0].rates.unwrap();
        assert_eq!(rates.bytes_per_sec, -500.0);
        assert_eq!(rates.packets_per_sec, -5.0);
    }

    #[test]
    fn test_snapshot_elapsed() {
        let t0 = Instant::now();
        let earlier = Snapshot::new(t0, vec![class(1, 1000, 0)]);
        let later = Snapshot::new(t0 + Duration::from_secs(2), vec![class(1, 2000, 0)]);

        assert_eq!(later.secs_since(&earlier), 2.0);
        assert_eq!(earlier.secs_since(&later), -2.0);

        let later = later.with_rates_since(&earlier).unwrap();
        assert_eq!(later.classes[0].rates.unwrap().bytes_per_sec, 500.0);
    }

    #[test]
    fn test_same_instant_fails() {
        let t0 = Instant::now();
        let earlier = Snapshot::new(t0, vec![class(1, 1000, 0)]);
        let later = Snapshot::new(t0, vec![class(1, 2000, 0)]);
        assert!(matches!(
            later.with_rates_since(&earlier),
            Err(Error::Sampling { elapsed_secs }) if elapsed_secs == 0.0
        ));
    }
}
