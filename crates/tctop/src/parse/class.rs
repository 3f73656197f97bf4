//! `tc -s class show` parsing.
//!
//! Each class is a blank-line separated block:
//!
//! ```text
//! class htb 1:10 parent 1:1 leaf 10: prio 0 rate 10Mbit ceil 50Mbit burst 1600b cburst 1600b
//!  Sent 600000 bytes 500 pkt (dropped 3, overlimits 12 requeues 1)
//!  backlog 0b 0p requeues 1
//!  lended: 500 borrowed: 0 giants: 0
//! ```

use winnow::ascii::{dec_uint, space0, space1};
use winnow::prelude::*;
use winnow::token::take_while;

use super::PResult;
use super::lines::{Block, Delimiter, blocks};
use super::rate::max_rate;
use crate::handle::ClassId;
use crate::record::{ClassRecord, ClassStats};

/// Parse every class in a `tc -s class show` dump.
///
/// Filter addresses are not attached here; see [`crate::reconcile`].
pub fn parse_classes(text: &str) -> Vec<ClassRecord> {
    blocks(text, Delimiter::BlankLine)
        .iter()
        .filter_map(parse_class_block)
        .collect()
}

/// Parse one class block.
///
/// Returns `None` for blocks without a class header or without the
/// `Sent ...` statistics line.
pub fn parse_class_block(block: &Block<'_>) -> Option<ClassRecord> {
    let Some((kind, class_id, parent_id)) = block.text_lines().find_map(|line| {
        let mut input = line;
        header(&mut input).ok()
    }) else {
        tracing::trace!(lines = block.lines().len(), "skipping block without class header");
        return None;
    };

    let Some(stats) = block.text_lines().find_map(|line| {
        let mut input = line;
        stats_line(&mut input).ok()
    }) else {
        tracing::trace!(%class_id, "skipping class without statistics line");
        return None;
    };

    let mut record = ClassRecord::new(class_id, parent_id, stats);
    record.kind = kind.to_string();
    record.max_rate_bps = max_rate(block.tokens());
    Some(record)
}

/// `class <kind> <id> [root|parent <id>] ...`
fn header<'a>(input: &mut &'a str) -> PResult<(&'a str, ClassId, Option<ClassId>)> {
    "class".parse_next(input)?;
    space1.parse_next(input)?;
    let kind = take_while(1.., |c: char| !c.is_whitespace()).parse_next(input)?;
    space1.parse_next(input)?;
    let id = take_while(1.., |c: char| c.is_ascii_hexdigit() || c == ':').parse_next(input)?;
    let class_id = ClassId::parse(id)
        .ok_or_else(|| winnow::error::ErrMode::Cut(winnow::error::ContextError::new()))?;

    // Only the header line is searched, so "parent" in later lines is ignored.
    let mut rest = input.split_whitespace();
    let parent_id = match rest.find(|&t| t == "parent") {
        Some(_) => rest.next().and_then(ClassId::parse),
        None => None,
    };

    Ok((kind, class_id, parent_id))
}

/// `Sent <bytes> bytes <pkts> pkt (dropped <n>, overlimits <n> requeues <n>)`
fn stats_line(input: &mut &str) -> PResult<ClassStats> {
    "Sent".parse_next(input)?;
    space1.parse_next(input)?;
    let sent_bytes: u64 = dec_uint.parse_next(input)?;
    space1.parse_next(input)?;
    "bytes".parse_next(input)?;
    space1.parse_next(input)?;
    let sent_packets: u64 = dec_uint.parse_next(input)?;
    space1.parse_next(input)?;
    "pkt".parse_next(input)?;
    space0.parse_next(input)?;
    "(dropped".parse_next(input)?;
    space1.parse_next(input)?;
    let dropped: u64 = dec_uint.parse_next(input)?;
    ','.parse_next(input)?;
    space0.parse_next(input)?;
    "overlimits".parse_next(input)?;
    space1.parse_next(input)?;
    let overlimits: u64 = dec_uint.parse_next(input)?;
    space1.parse_next(input)?;
    "requeues".parse_next(input)?;
    space1.parse_next(input)?;
    let requeues: u64 = dec_uint.parse_next(input)?;
    ')'.parse_next(input)?;

    Ok(ClassStats {
        sent_bytes,
        sent_packets,
        dropped,
        overlimits,
        requeues,
    })
}
