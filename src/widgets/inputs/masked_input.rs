use crate::masked::{
    DateLimits, MaskOutput, MaskSlot, MaskState, ParsedSegment, PatternMask, PatternTable,
    Quantifier, apply_mask, apply_pattern, expected_length, parse_format,
};
use crate::masked::validation::validate_segments;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::widgets::inputs::text_edit;
use crate::widgets::validators::{Validator, run_validators};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

const INVALID_MASK_MESSAGE: &str = "Invalid or incomplete value";

/// Which text the bound value carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueMode {
    Raw,
    #[default]
    Formatted,
}

#[derive(Debug, Clone)]
pub enum MaskKind {
    Date(Vec<ParsedSegment>),
    Pattern(PatternMask),
}

impl MaskKind {
    pub fn date(format: &str) -> Self {
        MaskKind::Date(parse_format(format))
    }

    pub fn pattern(mask: &str, table: &PatternTable) -> Self {
        MaskKind::Pattern(PatternMask::parse(mask, table))
    }

    fn apply(&self, input: &str, cursor: usize) -> MaskOutput {
        match self {
            MaskKind::Date(segments) => apply_mask(input, segments, cursor),
            MaskKind::Pattern(mask) => apply_pattern(input, mask, cursor),
        }
    }

    /// Text the scan is re-run over on every edit. Date masks edit their raw
    /// digits; pattern masks edit the formatted text so separators typed
    /// after a `?` or `*` position survive.
    fn edit_text<'a>(&self, output: &'a MaskOutput) -> (&'a str, usize) {
        match self {
            MaskKind::Date(_) => (output.raw.as_str(), output.raw_cursor),
            MaskKind::Pattern(_) => (output.formatted.as_str(), output.cursor),
        }
    }

    fn reparse(&self, source: &str) -> Self {
        match self {
            MaskKind::Date(_) => MaskKind::date(source),
            MaskKind::Pattern(mask) => MaskKind::pattern(source, mask.table()),
        }
    }

    fn placeholder(&self) -> String {
        match self {
            MaskKind::Date(segments) => segments
                .iter()
                .map(|segment| match segment {
                    ParsedSegment::Token(token) => token.placeholder().to_string(),
                    ParsedSegment::Literal(ch) => ch.to_string(),
                })
                .collect(),
            MaskKind::Pattern(mask) => mask
                .slots()
                .iter()
                .filter_map(|slot| match slot {
                    MaskSlot::Literal(ch) => Some(*ch),
                    MaskSlot::Pattern {
                        quantifier: Quantifier::One,
                        ..
                    } => Some('_'),
                    MaskSlot::Pattern { .. } => None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Handled,
    NotHandled,
    Submit,
}

/// Single-line masked text field.
///
/// Every edit re-runs the mask over the edited text so the formatted text,
/// the raw value and both cursors stay in sync. Hosts write [`display`]
/// back to the screen first and only then place the cursor at
/// [`cursor_col`].
///
/// [`display`]: MaskedInput::display
/// [`cursor_col`]: MaskedInput::cursor_col
pub struct MaskedInput {
    id: String,
    source: String,
    kind: MaskKind,
    output: MaskOutput,
    value_mode: ValueMode,
    limits: DateLimits,
    validators: Vec<Validator>,
}

impl MaskedInput {
    pub fn new(id: impl Into<String>, source: impl Into<String>, kind: MaskKind) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            kind,
            output: MaskOutput::default(),
            value_mode: ValueMode::default(),
            limits: DateLimits::default(),
            validators: Vec::new(),
        }
    }

    pub fn date(id: impl Into<String>, format: impl Into<String>) -> Self {
        let format = format.into();
        let kind = MaskKind::date(&format);
        Self::new(id, format, kind)
    }

    pub fn pattern(id: impl Into<String>, mask: impl Into<String>) -> Self {
        Self::pattern_with_table(id, mask, &PatternTable::new())
    }

    pub fn pattern_with_table(
        id: impl Into<String>,
        mask: impl Into<String>,
        table: &PatternTable,
    ) -> Self {
        let mask = mask.into();
        let kind = MaskKind::pattern(&mask, table);
        Self::new(id, mask, kind)
    }

    pub fn date_mm_dd_yyyy(id: impl Into<String>) -> Self {
        Self::date(id, "MM/DD/YYYY")
    }

    pub fn time_hh_mm(id: impl Into<String>) -> Self {
        Self::date(id, "HH:mm")
    }

    pub fn phone_us(id: impl Into<String>) -> Self {
        Self::pattern(id, "(###) ###-####")
    }

    pub fn zip_us(id: impl Into<String>) -> Self {
        Self::pattern(id, "#####")
    }

    pub fn with_value_mode(mut self, mode: ValueMode) -> Self {
        self.value_mode = mode;
        self
    }

    pub fn with_limits(mut self, limits: DateLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn raw(&self) -> &str {
        &self.output.raw
    }

    pub fn raw_cursor(&self) -> usize {
        self.output.raw_cursor
    }

    pub fn display(&self) -> &str {
        &self.output.formatted
    }

    /// Character offset of the cursor inside [`MaskedInput::display`].
    pub fn cursor(&self) -> usize {
        self.output.cursor
    }

    /// Terminal column of the cursor relative to the start of the field.
    pub fn cursor_col(&self) -> usize {
        text_edit::prefix(&self.output.formatted, self.output.cursor).width()
    }

    /// Placeholder text still to be filled after the formatted value.
    pub fn placeholder_tail(&self) -> String {
        self.kind
            .placeholder()
            .chars()
            .skip(text_edit::char_count(&self.output.formatted))
            .collect()
    }

    pub fn value(&self) -> String {
        match self.value_mode {
            ValueMode::Raw => self.output.raw.clone(),
            ValueMode::Formatted => self.output.formatted.clone(),
        }
    }

    pub fn state(&self) -> MaskState {
        let raw = self.raw();
        if raw.is_empty() {
            return MaskState::Empty;
        }
        match &self.kind {
            MaskKind::Date(segments) => {
                if text_edit::char_count(raw) < expected_length(segments, true) {
                    MaskState::PartiallyFilled
                } else if validate_segments(&self.output.formatted, segments, &self.limits)
                    .is_valid()
                {
                    MaskState::Complete
                } else {
                    MaskState::Invalid
                }
            }
            MaskKind::Pattern(mask) => {
                if mask.is_complete(raw) {
                    MaskState::Complete
                } else {
                    MaskState::PartiallyFilled
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let value = self.value();
        if self.raw().is_empty() {
            return run_validators(&self.validators, &value);
        }

        match &self.kind {
            MaskKind::Date(segments) => {
                let report = validate_segments(&self.output.formatted, segments, &self.limits);
                if let Some(issue) = report.first_issue() {
                    return Err(issue.to_string());
                }
            }
            MaskKind::Pattern(mask) => {
                if !mask.is_complete(self.raw()) {
                    return Err(INVALID_MASK_MESSAGE.to_string());
                }
            }
        }
        run_validators(&self.validators, &value)
    }

    /// Swaps the mask. Returns false when `format` is already active.
    pub fn set_format(&mut self, format: &str) -> bool {
        if self.source == format {
            return false;
        }
        self.kind = self.kind.reparse(format);
        self.source = format.to_string();
        let raw = self.output.raw.clone();
        self.apply(&raw, self.output.raw_cursor);
        true
    }

    /// Replaces the whole value. Accepts raw or formatted text.
    pub fn set_value(&mut self, value: &str) {
        self.apply(value, text_edit::char_count(value));
    }

    pub fn clear(&mut self) {
        self.apply("", 0);
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.paste(ch.encode_utf8(&mut buf))
    }

    pub fn paste(&mut self, text: &str) -> bool {
        let (current, cursor) = self.kind.edit_text(&self.output);
        let before = current.to_string();
        let mut candidate = before.clone();
        let cursor = text_edit::insert_str(&mut candidate, cursor, text);
        self.apply(&candidate, cursor);
        if self.kind.edit_text(&self.output).0 == before {
            tracing::debug!(id = %self.id, text, "input rejected by mask");
            return false;
        }
        true
    }

    /// Backspace. Characters the mask would put straight back (auto-inserted
    /// literals) are removed together with the character before them.
    pub fn delete_prev(&mut self) -> bool {
        let (current, cursor) = self.kind.edit_text(&self.output);
        let current = current.to_string();
        for start in (0..cursor).rev() {
            if self.try_remove(&current, start, cursor, start) {
                return true;
            }
        }
        false
    }

    pub fn delete_current(&mut self) -> bool {
        let (current, cursor) = self.kind.edit_text(&self.output);
        let current = current.to_string();
        for end in cursor + 1..=text_edit::char_count(&current) {
            if self.try_remove(&current, cursor, end, cursor) {
                return true;
            }
        }
        false
    }

    pub fn move_left(&mut self) -> bool {
        let (text, cursor) = self.kind.edit_text(&self.output);
        let text = text.to_string();
        let Some(target) = (0..cursor).rev().find(|&pos| self.is_stop(&text, pos)) else {
            return false;
        };
        self.move_to(&text, target);
        true
    }

    pub fn move_right(&mut self) -> bool {
        let (text, cursor) = self.kind.edit_text(&self.output);
        let text = text.to_string();
        let end = text_edit::char_count(&text);
        let Some(target) = (cursor + 1..=end).find(|&pos| self.is_stop(&text, pos)) else {
            return false;
        };
        self.move_to(&text, target);
        true
    }

    pub fn move_home(&mut self) -> bool {
        let (text, cursor) = self.kind.edit_text(&self.output);
        if cursor == 0 {
            return false;
        }
        let text = text.to_string();
        self.move_to(&text, 0);
        true
    }

    pub fn move_end(&mut self) -> bool {
        let (text, cursor) = self.kind.edit_text(&self.output);
        let end = text_edit::char_count(text);
        if cursor == end {
            return false;
        }
        let text = text.to_string();
        self.move_to(&text, end);
        true
    }

    /// Steps the date/time token under the cursor, wrapping within its bounds.
    /// An empty field starts its first token at the lower (or upper) bound.
    pub fn step_current(&mut self, delta: i64) -> bool {
        let MaskKind::Date(segments) = &self.kind else {
            return false;
        };
        let Some((updated, cursor)) =
            step_token(segments, &self.output.raw, self.output.raw_cursor, delta)
        else {
            return false;
        };
        self.apply(&updated, cursor);
        true
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        let handled = match key.code {
            KeyCode::Char(_)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(KeyModifiers::ALT) =>
            {
                false
            }
            KeyCode::Char(ch) => self.insert_char(ch),
            KeyCode::Backspace => self.delete_prev(),
            KeyCode::Delete => self.delete_current(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            KeyCode::Up => self.step_current(1),
            KeyCode::Down => self.step_current(-1),
            KeyCode::Enter => return KeyResult::Submit,
            KeyCode::Esc | KeyCode::Other => false,
        };
        if handled {
            KeyResult::Handled
        } else {
            KeyResult::NotHandled
        }
    }

    fn move_to(&mut self, text: &str, cursor: usize) {
        self.apply(text, cursor);
    }

    /// Cursor stops sit at either end and right after every character that
    /// lands in the raw value.
    fn is_stop(&self, text: &str, pos: usize) -> bool {
        pos == 0
            || pos == text_edit::char_count(text)
            || self.kind.apply(text, pos).raw_cursor > self.kind.apply(text, pos - 1).raw_cursor
    }

    /// Applies `current` without the characters in `start..end`; keeps the
    /// result only when the edited text actually changed.
    fn try_remove(&mut self, current: &str, start: usize, end: usize, cursor: usize) -> bool {
        let mut candidate: String = current.chars().take(start).collect();
        candidate.extend(current.chars().skip(end));
        let output = self.kind.apply(&candidate, cursor);
        if self.kind.edit_text(&output).0 == current {
            return false;
        }
        self.output = output;
        true
    }

    fn apply(&mut self, input: &str, cursor: usize) {
        self.output = self.kind.apply(input, cursor);
    }
}

fn step_token(
    segments: &[ParsedSegment],
    raw: &str,
    raw_cursor: usize,
    delta: i64,
) -> Option<(String, usize)> {
    let raw: Vec<char> = raw.chars().collect();
    let focus = if raw_cursor >= raw.len() {
        raw.len().saturating_sub(1)
    } else {
        raw_cursor
    };

    let mut start = 0usize;
    let token = segments
        .iter()
        .filter_map(ParsedSegment::token)
        .find(|token| {
            let end = start + token.length;
            if focus < end {
                return true;
            }
            start = end;
            false
        })?;
    let end = start + token.length;

    let current: String = raw[start.min(raw.len())..end.min(raw.len())]
        .iter()
        .collect();
    let next = if token.is_numeric() {
        let min = i64::from(token.min_value?);
        let max = i64::from(token.max_value?);
        let value = if current.is_empty() {
            if delta >= 0 { min } else { max }
        } else if text_edit::char_count(&current) == token.length {
            let stepped = current.parse::<i64>().ok()? + delta;
            if stepped > max {
                min
            } else if stepped < min {
                max
            } else {
                stepped
            }
        } else {
            return None;
        };
        format!("{value:0width$}", width = token.length)
    } else {
        let next = match current.to_ascii_uppercase().as_str() {
            "AM" => "PM",
            "PM" | "" => "AM",
            _ => return None,
        };
        next.chars().map(|ch| token.normalize(ch)).collect()
    };

    let mut updated: String = raw[..start.min(raw.len())].iter().collect();
    updated.push_str(&next);
    updated.extend(raw.iter().skip(end));
    Some((updated, end))
}

impl std::fmt::Debug for MaskedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskedInput")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("raw", &self.output.raw)
            .field("raw_cursor", &self.output.raw_cursor)
            .field("value_mode", &self.value_mode)
            .finish_non_exhaustive()
    }
}
