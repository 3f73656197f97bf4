//! TC class identifiers.
//!
//! Classes are addressed by 32-bit handles split into major:minor parts
//! (16 bits each). `tc` prints both parts in hex, e.g. `1:10` is major 1,
//! minor 0x10. An empty part is zero, so `mq` classes print as `:1`.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A class handle with major:minor components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ClassId {
    /// Major number (upper 16 bits).
    pub major: u16,
    /// Minor number (lower 16 bits).
    pub minor: u16,
}

impl ClassId {
    /// Create a class id from major:minor components.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Parse a class id as printed by `tc` (e.g. `1:10`, `1:`, `:1`).
    ///
    /// Returns `None` if the string is not a `major:minor` pair.
    pub fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.split_once(':')?;
        if major.is_empty() && minor.is_empty() {
            return None;
        }
        Some(Self::new(hex_part(major)?, hex_part(minor)?))
    }
}

fn hex_part(s: &str) -> Option<u16> {
    if s.is_empty() {
        Some(0)
    } else {
        u16::from_str_radix(s, 16).ok()
    }
}

impl FromStr for ClassId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid class id: {}", s))
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minor == 0 {
            write!(f, "{:x}:", self.major)
        } else if self.major == 0 {
            write!(f, ":{:x}", self.minor)
        } else {
            write!(f, "{:x}:{:x}", self.major, self.minor)
        }
    }
}

impl Serialize for ClassId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_parts() {
        assert_eq!(ClassId::parse("1:10"), Some(ClassId::new(1, 0x10)));
        assert_eq!(ClassId::parse("ffff:a"), Some(ClassId::new(0xffff, 0xa)));
        assert_eq!(ClassId::parse("1:"), Some(ClassId::new(1, 0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(ClassId::parse("root"), None);
        assert_eq!(ClassId::parse("1"), None);
        assert_eq!(ClassId::parse("1:2:3"), None);
        assert_eq!(ClassId::parse("10000:1"), None);
    }

    #[test]
    fn test_display_matches_tc() {
        assert_eq!(ClassId::new(1, 0x10).to_string(), "1:10");
        assert_eq!(ClassId::new(1, 0).to_string(), "1:");
        assert_eq!(ClassId::parse("1:a").map(|id| id.to_string()), Some("1:a".into()));
    }

    #[test]
    fn test_empty_major_is_zero() {
        assert_eq!(ClassId::parse(":1"), Some(ClassId::new(0, 1)));
        assert_eq!(ClassId::parse(":1f"), Some(ClassId::new(0, 0x1f)));
        assert_eq!(ClassId::parse(":"), None);
        assert_eq!(ClassId::parse(":g"), None);

        assert_eq!(ClassId::new(0, 1).to_string(), ":1");
        assert_eq!(":a".parse::<ClassId>().unwrap().to_string(), ":a");
    }
}
