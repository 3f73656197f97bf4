//! Parsers for `tc` text dumps.
//!
//! - [`lines`] splits raw output into typed lines and groups them into blocks
//! - [`filter`] turns `tc filter show` blocks into [`FilterRecord`]s
//! - [`class`] turns `tc -s class show` blocks into [`ClassRecord`]s
//! - [`rate`] decodes `<number><unit>bit` rate tokens
//!
//! Blocks missing required fields are skipped, never reported as errors.
//!
//! [`FilterRecord`]: crate::record::FilterRecord
//! [`ClassRecord`]: crate::record::ClassRecord

pub mod class;
pub mod filter;
pub mod lines;
pub mod rate;

pub use class::{parse_class_block, parse_classes};
pub use filter::{decode_match_keys, parse_filter_block, parse_filters};
pub use lines::{Block, Delimiter, Line, blocks, tokenize};
pub use rate::{max_rate, parse_rate, rate_token};

/// Result type for winnow parsers.
pub type PResult<T> = core::result::Result<T, winnow::error::ErrMode<winnow::error::ContextError>>;
