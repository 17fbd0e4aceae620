use super::model::{CursorTrack, MaskOutput};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

const ESCAPE: char = '\\';

#[derive(Debug, Clone)]
pub struct MaskPattern {
    pub source: String,
    pub regex: Regex,
    pub optional: bool,
}

impl MaskPattern {
    /// Compiles `source` so that it must match one whole character.
    pub fn new(source: &str, optional: bool) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            regex,
            optional,
        })
    }

    pub fn accepts(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.regex.is_match(ch.encode_utf8(&mut buf))
    }
}

static BUILTIN_PATTERNS: LazyLock<IndexMap<char, MaskPattern>> = LazyLock::new(|| {
    [
        ('#', r"\d", false),
        ('0', r"\d", false),
        ('9', r"\d", true),
        ('@', r"[A-Za-z]", false),
        ('S', r"[A-Za-z]", false),
        ('A', r"[A-Za-z0-9]", false),
        ('U', r"[A-Z]", false),
        ('L', r"[a-z]", false),
    ]
    .into_iter()
    .map(|(symbol, source, optional)| {
        let pattern = MaskPattern::new(source, optional)
            .unwrap_or_else(|err| panic!("built-in pattern {symbol} must compile: {err}"));
        (symbol, pattern)
    })
    .collect()
});

/// Symbol lookup for pattern masks. Caller overrides shadow the built-ins.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    overrides: IndexMap<char, MaskPattern>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, symbol: char, pattern: MaskPattern) -> Self {
        self.overrides.insert(symbol, pattern);
        self
    }

    pub fn insert(&mut self, symbol: char, pattern: MaskPattern) {
        self.overrides.insert(symbol, pattern);
    }

    pub fn get(&self, symbol: char) -> Option<&MaskPattern> {
        self.overrides
            .get(&symbol)
            .or_else(|| BUILTIN_PATTERNS.get(&symbol))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    One,
    Optional,
    Many,
}

#[derive(Debug, Clone)]
pub enum MaskSlot {
    Literal(char),
    Pattern {
        symbol: char,
        pattern: MaskPattern,
        quantifier: Quantifier,
    },
}

impl MaskSlot {
    fn is_required(&self) -> bool {
        matches!(
            self,
            MaskSlot::Pattern {
                quantifier: Quantifier::One,
                ..
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct PatternMask {
    source: String,
    slots: Vec<MaskSlot>,
    table: PatternTable,
}

impl PatternMask {
    pub fn parse(mask: &str, table: &PatternTable) -> Self {
        let chars: Vec<char> = mask.chars().collect();
        let mut slots = Vec::<MaskSlot>::new();
        let mut idx = 0usize;

        while idx < chars.len() {
            let ch = chars[idx];
            if ch == ESCAPE && idx + 1 < chars.len() {
                slots.push(MaskSlot::Literal(chars[idx + 1]));
                idx += 2;
                continue;
            }

            let Some(pattern) = table.get(ch) else {
                slots.push(MaskSlot::Literal(ch));
                idx += 1;
                continue;
            };

            let (quantifier, next_idx) = match chars.get(idx + 1) {
                Some('?') => (Quantifier::Optional, idx + 2),
                Some('*') => (Quantifier::Many, idx + 2),
                _ if pattern.optional => (Quantifier::Optional, idx + 1),
                _ => (Quantifier::One, idx + 1),
            };
            slots.push(MaskSlot::Pattern {
                symbol: ch,
                pattern: pattern.clone(),
                quantifier,
            });
            idx = next_idx;
        }

        tracing::trace!(mask, slots = slots.len(), "parsed pattern mask");
        Self {
            source: mask.to_string(),
            slots,
            table: table.clone(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn slots(&self) -> &[MaskSlot] {
        &self.slots
    }

    /// Symbol table the mask was parsed with.
    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Whether the characters `input` contributes satisfy every required
    /// position. Optional positions may be skipped anywhere, so a short
    /// input can complete a mask even if the scan filled them greedily.
    pub fn is_complete(&self, input: &str) -> bool {
        let output = scan(input, self, 0);
        let mut expr = String::from("^");
        for slot in &self.slots {
            if let MaskSlot::Pattern {
                pattern,
                quantifier,
                ..
            } = slot
            {
                let suffix = match quantifier {
                    Quantifier::One => "",
                    Quantifier::Optional => "?",
                    Quantifier::Many => "*",
                };
                expr.push_str(&format!("(?:{}){suffix}", pattern.source));
            }
        }
        expr.push('$');
        Regex::new(&expr).is_ok_and(|regex| regex.is_match(&output.raw))
    }

    /// Characters needed to satisfy every required position, literals included.
    pub fn min_length(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, MaskSlot::Literal(_)) || slot.is_required())
            .count()
    }
}

pub fn apply_pattern(input: &str, mask: &PatternMask, cursor: usize) -> MaskOutput {
    scan(input, mask, cursor)
}

struct PatternScan {
    formatted: String,
    raw: String,
    formatted_len: usize,
    raw_len: usize,
    slot: usize,
    cursor: CursorTrack,
}

impl PatternScan {
    fn push_literal(&mut self, ch: char) {
        self.formatted.push(ch);
        self.formatted_len += 1;
    }

    fn mark(&self) -> (usize, usize, usize) {
        (self.slot, self.formatted.len(), self.formatted_len)
    }

    fn rollback(&mut self, (slot, bytes, chars): (usize, usize, usize)) {
        self.slot = slot;
        self.formatted.truncate(bytes);
        self.formatted_len = chars;
    }

    fn push_match(&mut self, ch: char) {
        self.formatted.push(ch);
        self.raw.push(ch);
        self.formatted_len += 1;
        self.raw_len += 1;
    }
}

fn scan(input: &str, mask: &PatternMask, cursor: usize) -> MaskOutput {
    let slots = mask.slots.as_slice();
    let mut state = PatternScan {
        formatted: String::new(),
        raw: String::new(),
        formatted_len: 0,
        raw_len: 0,
        slot: 0,
        cursor: CursorTrack::new(cursor),
    };

    'input: for (pos, ch) in input.chars().enumerate() {
        state.cursor.observe(pos, state.formatted_len, state.raw_len);
        let mark = state.mark();

        loop {
            let Some(slot) = slots.get(state.slot) else {
                state.rollback(mark);
                break 'input;
            };
            match slot {
                MaskSlot::Literal(literal) => {
                    state.push_literal(*literal);
                    state.slot += 1;
                    if ch == *literal {
                        continue 'input;
                    }
                }
                MaskSlot::Pattern {
                    pattern,
                    quantifier,
                    symbol,
                } => {
                    let matched = pattern.accepts(ch);
                    match (quantifier, matched) {
                        (Quantifier::Many, true) => {
                            state.push_match(ch);
                            continue 'input;
                        }
                        (_, true) => {
                            state.push_match(ch);
                            state.slot += 1;
                            continue 'input;
                        }
                        (Quantifier::One, false) => {
                            tracing::trace!(%symbol, %ch, "dropped character");
                            state.rollback(mark);
                            continue 'input;
                        }
                        (Quantifier::Optional | Quantifier::Many, false) => {
                            state.slot += 1;
                        }
                    }
                }
            }
        }
    }

    if slots[state.slot..]
        .iter()
        .all(|slot| matches!(slot, MaskSlot::Literal(_)))
        && state.raw_len > 0
    {
        while let Some(MaskSlot::Literal(literal)) = slots.get(state.slot) {
            state.push_literal(*literal);
            state.slot += 1;
        }
    }

    let (cursor, raw_cursor) = state.cursor.resolve(state.formatted_len, state.raw_len);
    MaskOutput {
        formatted: state.formatted,
        raw: state.raw,
        cursor,
        raw_cursor,
    }
}
