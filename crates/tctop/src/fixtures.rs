//! Captured `tc` output for testing.
//!
//! The dumps describe one HTB tree on a single interface:
//!
//! ```text
//! 1:1 (root, 100Mbit)
//! ├── 1:10  10.0.0.10
//! ├── 1:11  10.0.0.11
//! └── 1:20  2001:db8:0:1::
//!     └── 1:21
//! 1:99 (parent 1:50 does not exist)
//! ```
//!
//! The second class capture was taken three seconds after the first and
//! adds class `1:30`.

/// Captured from: tc filter show dev eth0
pub const FILTER_DUMP: &str = include_str!("../tests/fixtures/filter_show.txt");

/// Captured from: tc -s class show dev eth0
pub const CLASS_DUMP_FIRST: &str = include_str!("../tests/fixtures/class_show_first.txt");

/// Captured from: tc -s class show dev eth0, three seconds later
pub const CLASS_DUMP_SECOND: &str = include_str!("../tests/fixtures/class_show_second.txt");

/// Captured from: tc -s class show dev eth1 (multiqueue root)
pub const CLASS_DUMP_MQ: &str = include_str!("../tests/fixtures/class_show_mq.txt");
