//! Line tokenizer and block grouping for `tc` text dumps.
//!
//! Dumps are first split into typed [`Line`]s, then grouped into
//! [`Block`]s according to a [`Delimiter`] rule. Record parsers only ever
//! see whole blocks.

/// A classified line of `tc` output, trimmed of surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// A u32 match rule (`match c0a80102/ffffffff at 16`).
    Match(&'a str),
    /// Any other line.
    Text(&'a str),
}

impl<'a> Line<'a> {
    /// Classify a raw line.
    pub fn classify(raw: &'a str) -> Self {
        let line = raw.trim();
        if line.is_empty() {
            Line::Blank
        } else if line.split_whitespace().next() == Some("match") {
            Line::Match(line)
        } else {
            Line::Text(line)
        }
    }

    /// Line content, empty for blank lines.
    pub fn as_str(&self) -> &'a str {
        match self {
            Line::Blank => "",
            Line::Match(s) | Line::Text(s) => s,
        }
    }
}

/// Split text into classified lines.
pub fn tokenize(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.lines().map(Line::classify)
}

/// Rule deciding where one block ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Blocks are separated by blank lines (`tc -s class show`).
    BlankLine,
    /// Every non-match line opens a new block and the match lines that
    /// follow it belong to that block (`tc filter show`).
    MatchSection,
}

/// A group of consecutive non-blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Block<'a> {
    /// All lines of the block.
    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Non-match lines.
    pub fn text_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().filter_map(|line| match line {
            Line::Text(s) => Some(*s),
            _ => None,
        })
    }

    /// Match rule lines.
    pub fn match_lines(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines.iter().filter_map(|line| match line {
            Line::Match(s) => Some(*s),
            _ => None,
        })
    }

    /// Iterate over every whitespace separated token in the block.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.lines
            .iter()
            .flat_map(|line| line.as_str().split_whitespace())
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Group the lines of `text` into blocks using `rule`.
///
/// Blank lines never appear inside a block. Empty blocks are dropped.
pub fn blocks(text: &str, rule: Delimiter) -> Vec<Block<'_>> {
    let mut out = Vec::new();
    let mut current = Block::default();

    for line in tokenize(text) {
        let boundary = match (rule, line) {
            (_, Line::Blank) => true,
            (Delimiter::MatchSection, Line::Text(_)) => true,
            _ => false,
        };

        if boundary && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if line != Line::Blank {
            current.lines.push(line);
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}
