//! Report rendering (text tables and JSON).

pub mod formatting;
mod table;
mod tree;

pub use table::FlatReport;
pub use tree::TreeReport;

use std::io::Write;
use std::net::IpAddr;

use serde::Serialize;

use formatting::{
    format_packets, format_percent, format_rate_bits, format_rate_bytes, or_placeholder,
};
use crate::handle::ClassId;
use crate::rank::{Metric, Ranking, Totals, percent};
use crate::record::ClassRecord;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Pretty print (for JSON).
    pub pretty: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text tables.
    #[default]
    Text,
    /// JSON document.
    Json,
}

/// Types that can be rendered as a report.
pub trait Printable {
    /// Print as plain text.
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()>;

    /// Convert to JSON value.
    fn to_json(&self) -> serde_json::Value;

    /// Print in the specified format.
    fn print<W: Write>(
        &self,
        w: &mut W,
        format: OutputFormat,
        opts: &OutputOptions,
    ) -> std::io::Result<()> {
        match format {
            OutputFormat::Text => self.print_text(w, opts),
            OutputFormat::Json => {
                let json = self.to_json();
                if opts.pretty {
                    serde_json::to_writer_pretty(&mut *w, &json)?;
                } else {
                    serde_json::to_writer(&mut *w, &json)?;
                }
                writeln!(w)?;
                Ok(())
            }
        }
    }

    /// Render into a string.
    fn render(&self, format: OutputFormat, opts: &OutputOptions) -> std::io::Result<String> {
        let mut buf = Vec::new();
        self.print(&mut buf, format, opts)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Display values of one class, shared by the flat and tree reports.
///
/// Every field that depends on a rate, a ceiling or a non-zero total is
/// `None` when that input is unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRow {
    pub class_id: ClassId,
    pub ip_addr: Option<IpAddr>,
    pub bytes_per_sec: Option<f64>,
    pub bits_per_sec: Option<f64>,
    pub max_rate_bps: Option<u64>,
    pub percent_of_ceiling: Option<f64>,
    pub percent_of_total: Option<f64>,
    pub percent_of_capacity: Option<f64>,
    pub packets_per_sec: Option<f64>,
    pub percent_of_packets: Option<f64>,
}

impl ClassRow {
    /// Compute the row for `record` against the ranking totals and the
    /// link capacity.
    pub fn new(record: &ClassRecord, ranking: &Ranking, capacity_bps: u64) -> Self {
        let bits = record.rates.map(|r| r.bits_per_sec());
        let ceiling = record.max_rate_bps.map(|m| m as f64);
        Self {
            class_id: record.class_id,
            ip_addr: Some(record.ip_addr),
            bytes_per_sec: record.rates.map(|r| r.bytes_per_sec),
            bits_per_sec: bits,
            max_rate_bps: record.max_rate_bps,
            percent_of_ceiling: bits.and_then(|b| percent(b, ceiling)),
            percent_of_total: ranking.share_of_bytes(record),
            percent_of_capacity: bits.and_then(|b| percent(b, Some(capacity_bps as f64))),
            packets_per_sec: record.rates.map(|r| r.packets_per_sec),
            percent_of_packets: ranking.share_of_packets(record),
        }
    }

    /// A row carrying only the id, for a class absent from the ranking.
    pub fn bare(class_id: ClassId) -> Self {
        Self {
            class_id,
            ip_addr: None,
            bytes_per_sec: None,
            bits_per_sec: None,
            max_rate_bps: None,
            percent_of_ceiling: None,
            percent_of_total: None,
            percent_of_capacity: None,
            packets_per_sec: None,
            percent_of_packets: None,
        }
    }

    /// Text cells after the id column.
    fn data_cells(&self) -> [String; 9] {
        [
            or_placeholder(self.ip_addr, |ip| ip.to_string()),
            or_placeholder(self.bytes_per_sec, format_rate_bytes),
            or_placeholder(self.bits_per_sec, format_rate_bits),
            or_placeholder(self.max_rate_bps, |m| format_rate_bits(m as f64)),
            format_percent(self.percent_of_ceiling),
            format_percent(self.percent_of_total),
            format_percent(self.percent_of_capacity),
            or_placeholder(self.packets_per_sec, format_packets),
            format_percent(self.percent_of_packets),
        ]
    }
}

/// Headers and widths of the columns following the id column.
const DATA_COLUMNS: [(&str, usize); 9] = [
    ("IP", 26),
    ("rate (bytes)", 14),
    ("rate (bits)", 13),
    ("max", 12),
    ("max %", 8),
    ("rate %", 8),
    ("load %", 8),
    ("pkts", 8),
    ("pkts %", 7),
];

/// Summary shared by both report shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct Summary {
    metric: Metric,
    capacity_bps: u64,
    totals: Totals,
    load_percent: Option<f64>,
}

impl Summary {
    fn new(ranking: &Ranking, capacity_bps: u64) -> Self {
        let totals = *ranking.totals();
        Self {
            metric: ranking.metric(),
            capacity_bps,
            totals,
            load_percent: percent(totals.bits_per_sec, Some(capacity_bps as f64)),
        }
    }

    fn write<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(
            w,
            "Total bytes: {} | Total bits: {} | Total packets: {} pkts",
            format_rate_bytes(self.totals.bytes_per_sec),
            format_rate_bits(self.totals.bits_per_sec),
            format_packets(self.totals.packets_per_sec),
        )?;
        writeln!(
            w,
            "Load: {} of {}",
            format_percent(self.load_percent),
            format_rate_bits(self.capacity_bps as f64),
        )?;
        writeln!(w)
    }
}

/// Write `cells` padded to their widths, without trailing spaces.
fn write_cells<W: Write>(w: &mut W, cells: &[(&str, usize)]) -> std::io::Result<()> {
    let mut line = String::new();
    for (text, width) in cells {
        line.push_str(&format!("{:<width$} ", text, width = *width));
    }
    writeln!(w, "{}", line.trim_end())
}

/// Write the header line and a separator as wide as the header.
fn write_header<W: Write>(w: &mut W, leading: &[(&str, usize)]) -> std::io::Result<()> {
    let mut cells = leading.to_vec();
    cells.extend(DATA_COLUMNS);
    write_cells(w, &cells)?;
    let width: usize = cells.iter().map(|(_, width)| width + 1).sum::<usize>() - 1;
    writeln!(w, "{}", "-".repeat(width))
}
