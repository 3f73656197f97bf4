//! Sampling bandwidth monitor for Linux traffic-control class hierarchies.
//!
//! The crate reads the text dumps of `tc filter show` and `tc -s class
//! show` for one interface, joins filter addresses onto classes, takes two
//! captures a fixed interval apart to derive per-class rates, and renders
//! either a ranked table or an indented class tree.
//!
//! # Example
//!
//! ```ignore
//! use tctop::{Monitor, ReportConfig, TcCommand};
//! use tctop::config::Mode;
//!
//! #[tokio::main]
//! async fn main() -> tctop::Result<()> {
//!     let monitor = Monitor::new(TcCommand::new("eth0"));
//!     let config = ReportConfig {
//!         mode: Mode::Tree,
//!         ..Default::default()
//!     };
//!     print!("{}", monitor.report(&config).await?);
//!     Ok(())
//! }
//! ```
//!
//! # Parsing only
//!
//! ```
//! use tctop::parse::parse_classes;
//!
//! let dump = "class htb 1:10 parent 1:1 prio 0 rate 5Mbit ceil 10Mbit burst 1600b cburst 1600b\n \
//!             Sent 1200 bytes 12 pkt (dropped 0, overlimits 0 requeues 0)\n";
//! let classes = parse_classes(dump);
//! assert_eq!(classes[0].class_id.to_string(), "1:10");
//! assert_eq!(classes[0].max_rate_bps, Some(10_000_000));
//! assert_eq!(classes[0].stats.sent_packets, 12);
//! ```

pub mod config;
pub mod error;
pub mod handle;
pub mod hierarchy;
pub mod monitor;
pub mod output;
pub mod parse;
pub mod rank;
pub mod reconcile;
pub mod record;
pub mod sample;
pub mod source;

#[cfg(test)]
mod fixtures;

pub use config::{Mode, ReportConfig};
pub use error::{Error, Result};
pub use handle::ClassId;
pub use hierarchy::ClassTree;
pub use monitor::Monitor;
pub use output::OutputFormat;
pub use rank::{Limit, Metric, Ranking};
pub use record::{ClassRecord, FilterRecord};
pub use sample::{Sampler, Snapshot};
pub use source::{TcCommand, TcSource};
