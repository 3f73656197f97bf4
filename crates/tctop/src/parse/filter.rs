//! `tc filter show` parsing.
//!
//! A u32 filter block looks like:
//!
//! ```text
//! filter parent 1: protocol ip pref 1 u32 chain 0 fh 800::800 order 2048 key ht 800 bkt 0 flowid 1:10 not_in_hw
//!   match c0a80102/ffffffff at 16
//! ```
//!
//! IPv6 destination filters carry the address prefix split over two
//! 32-bit match words.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use winnow::ascii::space1;
use winnow::prelude::*;
use winnow::token::take_while;

use super::PResult;
use super::lines::{Block, Delimiter, blocks};
use crate::handle::ClassId;
use crate::record::FilterRecord;

/// Parse every filter in a `tc filter show` dump.
pub fn parse_filters(text: &str) -> Vec<FilterRecord> {
    blocks(text, Delimiter::MatchSection)
        .iter()
        .filter_map(parse_filter_block)
        .collect()
}

/// Parse one filter block.
///
/// Returns `None` when the block has no `flowid` or its match keys do not
/// form an address.
pub fn parse_filter_block(block: &Block<'_>) -> Option<FilterRecord> {
    let class_id = flowid(block)?;

    let mut keys = Vec::new();
    for line in block.match_lines() {
        let mut input = line;
        match match_key(&mut input) {
            Ok(key) => keys.push(key),
            Err(_) => {
                tracing::trace!(line, "skipping filter with unreadable match key");
                return None;
            }
        }
    }

    let ip_addr = decode_match_keys(&keys)?;
    Some(FilterRecord { class_id, ip_addr })
}

/// Decode u32 match keys into an address.
///
/// One 8-digit word is an IPv4 address. Two words are the upper 64 bits
/// of an IPv6 address (`aaaa:bbbb:cccc:dddd::`). Anything else decodes to
/// nothing.
pub fn decode_match_keys(keys: &[&str]) -> Option<IpAddr> {
    let mut words = Vec::with_capacity(2);
    for key in keys {
        if key.len() % 8 != 0 {
            return None;
        }
        for chunk in key.as_bytes().chunks(8) {
            let chunk = std::str::from_utf8(chunk).ok()?;
            words.push(u32::from_str_radix(chunk, 16).ok()?);
        }
    }

    match words.as_slice() {
        [addr] => Some(IpAddr::V4(Ipv4Addr::from(*addr))),
        [hi, lo] => {
            let segments = [
                (hi >> 16) as u16,
                (hi & 0xFFFF) as u16,
                (lo >> 16) as u16,
                (lo & 0xFFFF) as u16,
                0,
                0,
                0,
                0,
            ];
            Some(IpAddr::V6(Ipv6Addr::from(segments)))
        }
        _ => None,
    }
}

fn flowid(block: &Block<'_>) -> Option<ClassId> {
    let mut tokens = block.tokens();
    // non-terminal u32 filters print `*flowid`
    tokens.find(|&t| t == "flowid" || t == "*flowid")?;
    ClassId::parse(tokens.next()?)
}

/// `match <hex>/<mask> at <offset>`, yielding the hex key.
fn match_key<'a>(input: &mut &'a str) -> PResult<&'a str> {
    "match".parse_next(input)?;
    space1.parse_next(input)?;
    let key = take_while(1.., |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
    '/'.parse_next(input)?;
    Ok(key)
}
