use super::tokens::FormatToken;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedSegment {
    Token(&'static FormatToken),
    Literal(char),
}

impl ParsedSegment {
    /// Text this segment occupied in the format string.
    pub fn text(&self) -> String {
        match self {
            ParsedSegment::Token(token) => token.name.to_string(),
            ParsedSegment::Literal(ch) => ch.to_string(),
        }
    }

    /// Width in formatted output.
    pub fn width(&self) -> usize {
        match self {
            ParsedSegment::Token(token) => token.length,
            ParsedSegment::Literal(_) => 1,
        }
    }

    pub fn token(&self) -> Option<&'static FormatToken> {
        match self {
            ParsedSegment::Token(token) => Some(token),
            ParsedSegment::Literal(_) => None,
        }
    }
}

/// Result of running an input through a mask. Offsets count characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaskOutput {
    pub formatted: String,
    pub raw: String,
    pub cursor: usize,
    pub raw_cursor: usize,
}

/// Records where the caller's cursor lands while an input is scanned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CursorTrack {
    target: usize,
    mapped: Option<(usize, usize)>,
}

impl CursorTrack {
    pub(crate) fn new(target: usize) -> Self {
        Self {
            target,
            mapped: None,
        }
    }

    pub(crate) fn observe(&mut self, input_pos: usize, formatted_len: usize, raw_len: usize) {
        if self.mapped.is_none() && input_pos == self.target {
            self.mapped = Some((formatted_len, raw_len));
        }
    }

    pub(crate) fn resolve(self, formatted_len: usize, raw_len: usize) -> (usize, usize) {
        self.mapped.unwrap_or((formatted_len, raw_len))
    }
}
