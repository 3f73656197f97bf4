//! Typed records built from `tc` output.

use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;

use crate::handle::ClassId;

/// A filter that steers an address into a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRecord {
    /// Target class (`flowid`).
    pub class_id: ClassId,
    /// Address decoded from the filter's match key.
    pub ip_addr: IpAddr,
}

/// Counters reported by the kernel for a class.
///
/// All counters grow monotonically from class creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassStats {
    /// Bytes sent.
    pub sent_bytes: u64,
    /// Packets sent.
    pub sent_packets: u64,
    /// Packets dropped.
    pub dropped: u64,
    /// Overlimit events.
    pub overlimits: u64,
    /// Requeued packets.
    pub requeues: u64,
}

/// Per-second rates derived from two captures.
///
/// Values are negative when a counter went backwards between captures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClassRates {
    /// Bytes per second.
    pub bytes_per_sec: f64,
    /// Packets per second.
    pub packets_per_sec: f64,
}

impl ClassRates {
    /// Bandwidth in bits per second.
    pub fn bits_per_sec(&self) -> f64 {
        self.bytes_per_sec * 8.0
    }
}

/// A traffic class as seen in one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRecord {
    /// Class handle, unique within a capture.
    pub class_id: ClassId,
    /// Parent class; `None` for root classes.
    pub parent_id: Option<ClassId>,
    /// Qdisc kind owning the class (e.g. `htb`).
    pub kind: String,
    /// Largest rate token found in the class description, in bits/sec.
    pub max_rate_bps: Option<u64>,
    /// Kernel counters.
    pub stats: ClassStats,
    /// Address of the first filter targeting this class.
    pub ip_addr: IpAddr,
    /// Rates; `None` until sampled, or when the class is new in the later capture.
    pub rates: Option<ClassRates>,
}

impl ClassRecord {
    /// Address used when no filter targets a class.
    pub const UNSPECIFIED_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

    /// Create a record with no filter address and no rates attached.
    pub fn new(class_id: ClassId, parent_id: Option<ClassId>, stats: ClassStats) -> Self {
        Self {
            class_id,
            parent_id,
            kind: String::new(),
            max_rate_bps: None,
            stats,
            ip_addr: Self::UNSPECIFIED_ADDR,
            rates: None,
        }
    }

    /// Whether the class has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
