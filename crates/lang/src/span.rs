//! Source positions for tokens and parse errors.

/// A byte range in a rule string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset in the source
    pub start: u32,
    /// End byte offset in the source (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Create an empty span at `pos`
    pub fn at(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// Character (not byte) offset of the span start within `source`.
    ///
    /// Parse errors report character offsets so that multi-byte input such as
    /// `µ` duration units does not skew the reported column.
    pub fn char_offset(&self, source: &str) -> usize {
        let start = (self.start as usize).min(source.len());
        source
            .get(..start)
            .map_or(start, |prefix| prefix.chars().count())
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
