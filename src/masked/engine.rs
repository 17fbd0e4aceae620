use super::model::{CursorTrack, MaskOutput, ParsedSegment};
use super::partial;

struct ScanState {
    formatted: String,
    raw: String,
    formatted_len: usize,
    raw_len: usize,
    segment: usize,
    filled: String,
    cursor: CursorTrack,
}

impl ScanState {
    fn new(cursor: usize) -> Self {
        Self {
            formatted: String::new(),
            raw: String::new(),
            formatted_len: 0,
            raw_len: 0,
            segment: 0,
            filled: String::new(),
            cursor: CursorTrack::new(cursor),
        }
    }

    fn push_literal(&mut self, ch: char) {
        self.formatted.push(ch);
        self.formatted_len += 1;
    }

    fn push_token_char(&mut self, ch: char) {
        self.formatted.push(ch);
        self.raw.push(ch);
        self.filled.push(ch);
        self.formatted_len += 1;
        self.raw_len += 1;
    }

    fn close_token(&mut self, segments: &[ParsedSegment]) {
        self.segment += 1;
        self.filled.clear();
        while let Some(ParsedSegment::Literal(ch)) = segments.get(self.segment) {
            self.push_literal(*ch);
            self.segment += 1;
        }
    }

    fn mark(&self) -> (usize, usize, usize) {
        (self.segment, self.formatted.len(), self.formatted_len)
    }

    /// Forgets literals emitted for a character that was then dropped.
    fn rollback(&mut self, (segment, bytes, chars): (usize, usize, usize)) {
        self.segment = segment;
        self.formatted.truncate(bytes);
        self.formatted_len = chars;
    }

    fn finish(self) -> MaskOutput {
        let (cursor, raw_cursor) = self.cursor.resolve(self.formatted_len, self.raw_len);
        MaskOutput {
            formatted: self.formatted,
            raw: self.raw,
            cursor,
            raw_cursor,
        }
    }
}

/// Runs `input` through a parsed date/time format.
///
/// `input` is normally the raw value, but literal characters typed at the
/// position of a literal segment are accepted and counted once. Characters a
/// token cannot accept are dropped along with any literal inserted ahead of
/// them. `cursor` is a character offset into
/// `input`; the returned offsets point at the same logical position in the
/// formatted and raw outputs.
pub fn apply_mask(input: &str, segments: &[ParsedSegment], cursor: usize) -> MaskOutput {
    let mut state = ScanState::new(cursor);
    let mut chars = input.chars().enumerate().peekable();

    'input: while let Some(&(pos, ch)) = chars.peek() {
        state.cursor.observe(pos, state.formatted_len, state.raw_len);
        let mark = state.mark();

        loop {
            match segments.get(state.segment) {
                None => {
                    state.rollback(mark);
                    break 'input;
                }
                Some(ParsedSegment::Literal(literal)) => {
                    state.push_literal(*literal);
                    state.segment += 1;
                    if ch == *literal {
                        chars.next();
                        continue 'input;
                    }
                }
                Some(ParsedSegment::Token(token)) => {
                    let ch = token.normalize(ch);
                    let mut candidate = state.filled.clone();
                    candidate.push(ch);

                    if partial::accepts_prefix(token, &candidate) {
                        state.push_token_char(ch);
                        if state.filled.chars().count() == token.length {
                            state.close_token(segments);
                        }
                    } else {
                        tracing::trace!(token = token.name, %ch, "dropped character");
                        state.rollback(mark);
                    }
                    chars.next();
                    continue 'input;
                }
            }
        }
    }

    state.finish()
}

/// Length of the fully expanded format, or of its raw (token-only) form.
pub fn expected_length(segments: &[ParsedSegment], raw_mode: bool) -> usize {
    segments
        .iter()
        .filter(|segment| !raw_mode || segment.token().is_some())
        .map(ParsedSegment::width)
        .sum()
}

/// Removes every character that was not produced by a token.
pub fn strip_literals(formatted: &str, segments: &[ParsedSegment]) -> String {
    let mut out = String::new();
    let mut chars = formatted.chars();
    for segment in segments {
        match segment {
            ParsedSegment::Literal(_) => {
                if chars.next().is_none() {
                    break;
                }
            }
            ParsedSegment::Token(token) => {
                for _ in 0..token.length {
                    match chars.next() {
                        Some(ch) => out.push(ch),
                        None => return out,
                    }
                }
            }
        }
    }
    out
}
