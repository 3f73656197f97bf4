//! One-shot report runs against a [`TcSource`].
//!
//! ```ignore
//! use tctop::{Monitor, ReportConfig, TcCommand};
//!
//! let monitor = Monitor::new(TcCommand::new("eth0"));
//! print!("{}", monitor.report(&ReportConfig::default()).await?);
//! ```

use std::time::Duration;

use crate::config::{Mode, ReportConfig};
use crate::error::Result;
use crate::hierarchy::ClassTree;
use crate::output::{FlatReport, OutputOptions, Printable, TreeReport};
use crate::rank::{Metric, Ranking};
use crate::sample::{Sampler, Snapshot};
use crate::source::TcSource;

/// Drives captures, ranking and rendering for one interface.
#[derive(Debug, Clone)]
pub struct Monitor<S> {
    source: S,
}

impl<S: TcSource> Monitor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Capture the data `metric` needs: two samples `interval` apart for a
    /// rate metric, a single capture otherwise.
    pub async fn snapshot(&self, metric: Metric, interval: Duration) -> Result<Snapshot> {
        if metric.is_rate() {
            Sampler::new(interval).sample(&self.source).await
        } else {
            Snapshot::capture(&self.source).await
        }
    }

    /// Rank every class by `metric`.
    pub async fn rank(&self, metric: Metric, interval: Duration) -> Result<Ranking> {
        let snapshot = self.snapshot(metric, interval).await?;
        Ok(Ranking::new(metric, snapshot.classes))
    }

    /// Rank by a metric given by name.
    ///
    /// An unknown name fails before anything is captured.
    pub async fn rank_by(&self, name: &str, interval: Duration) -> Result<Ranking> {
        let metric: Metric = name.parse()?;
        self.rank(metric, interval).await
    }

    /// Produce a complete report as text or JSON.
    ///
    /// Nothing is returned unless every step succeeded.
    pub async fn report(&self, config: &ReportConfig) -> Result<String> {
        let snapshot = self.snapshot(config.metric, config.interval).await?;
        let tree = match config.mode {
            Mode::Tree => Some(ClassTree::new(&snapshot.classes)),
            Mode::Flat => None,
        };
        let ranking = Ranking::new(config.metric, snapshot.classes);
        tracing::debug!(
            metric = %config.metric,
            classes = ranking.len(),
            "ranked"
        );

        let opts = OutputOptions {
            pretty: config.pretty,
        };
        let text = match &tree {
            Some(tree) => {
                TreeReport::new(tree, &ranking, config.capacity_bps).render(config.format, &opts)?
            }
            None => FlatReport::new(&ranking, config.limit, config.capacity_bps)
                .render(config.format, &opts)?,
        };
        Ok(text)
    }
}
