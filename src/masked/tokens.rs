use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Year,
    ShortYear,
    Month,
    Day,
    Hour,
    Hour12,
    Minute,
    Second,
    Meridiem,
    MeridiemLower,
}

/// A placeholder recognised inside a date/time format string.
pub struct FormatToken {
    pub name: &'static str,
    pub kind: TokenKind,
    pub length: usize,
    pub pattern: Regex,
    pub min_value: Option<u32>,
    pub max_value: Option<u32>,
}

impl FormatToken {
    fn new(
        name: &'static str,
        kind: TokenKind,
        length: usize,
        pattern: &str,
        bounds: Option<(u32, u32)>,
    ) -> Self {
        let pattern = Regex::new(&format!("^(?:{pattern})$"))
            .unwrap_or_else(|err| panic!("token pattern for {name} must compile: {err}"));
        Self {
            name,
            kind,
            length,
            pattern,
            min_value: bounds.map(|(min, _)| min),
            max_value: bounds.map(|(_, max)| max),
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self.kind, TokenKind::Meridiem | TokenKind::MeridiemLower)
    }

    /// Meridiem tokens accept either case from the keyboard.
    pub fn normalize(&self, ch: char) -> char {
        match self.kind {
            TokenKind::Meridiem => ch.to_ascii_uppercase(),
            TokenKind::MeridiemLower => ch.to_ascii_lowercase(),
            _ => ch,
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self.kind {
            TokenKind::Year => "yyyy",
            TokenKind::ShortYear => "yy",
            TokenKind::Month => "mm",
            TokenKind::Day => "dd",
            TokenKind::Hour | TokenKind::Hour12 => "hh",
            TokenKind::Minute => "mm",
            TokenKind::Second => "ss",
            TokenKind::Meridiem | TokenKind::MeridiemLower => "am",
        }
    }
}

impl PartialEq for FormatToken {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FormatToken {}

impl fmt::Debug for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatToken")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

// Sorted longest name first so `YYYY` wins over `YY`.
static TOKENS: LazyLock<Vec<FormatToken>> = LazyLock::new(|| {
    let mut tokens = vec![
        FormatToken::new("YYYY", TokenKind::Year, 4, r"\d{4}", Some((0, 9999))),
        FormatToken::new("YY", TokenKind::ShortYear, 2, r"\d{2}", Some((0, 99))),
        FormatToken::new("MM", TokenKind::Month, 2, r"0[1-9]|1[0-2]", Some((1, 12))),
        FormatToken::new(
            "DD",
            TokenKind::Day,
            2,
            r"0[1-9]|[12]\d|3[01]",
            Some((1, 31)),
        ),
        FormatToken::new("HH", TokenKind::Hour, 2, r"[01]\d|2[0-3]", Some((0, 23))),
        FormatToken::new("hh", TokenKind::Hour12, 2, r"0[1-9]|1[0-2]", Some((1, 12))),
        FormatToken::new("mm", TokenKind::Minute, 2, r"[0-5]\d", Some((0, 59))),
        FormatToken::new("ss", TokenKind::Second, 2, r"[0-5]\d", Some((0, 59))),
        FormatToken::new("A", TokenKind::Meridiem, 2, "AM|PM", None),
        FormatToken::new("a", TokenKind::MeridiemLower, 2, "am|pm", None),
    ];
    tokens.sort_by(|left, right| right.name.len().cmp(&left.name.len()));
    tokens
});

pub fn all_tokens() -> &'static [FormatToken] {
    TOKENS.as_slice()
}

pub fn lookup(name: &str) -> Option<&'static FormatToken> {
    all_tokens().iter().find(|token| token.name == name)
}

/// Longest token whose name starts `input`.
pub fn match_prefix(input: &str) -> Option<&'static FormatToken> {
    all_tokens()
        .iter()
        .find(|token| input.starts_with(token.name))
}

#[cfg(test)]
mod tests {
    use super::{TokenKind, all_tokens, lookup, match_prefix};

    #[test]
    fn table_is_sorted_longest_first() {
        let lengths: Vec<usize> = all_tokens().iter().map(|token| token.name.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|left, right| right.cmp(left));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn four_digit_year_wins_over_two_digit_prefix() {
        let token = match_prefix("YYYY-MM").expect("token");
        assert_eq!(token.kind, TokenKind::Year);

        let token = match_prefix("YY/MM").expect("token");
        assert_eq!(token.kind, TokenKind::ShortYear);
    }

    #[test]
    fn month_and_minute_are_case_sensitive() {
        assert_eq!(lookup("MM").map(|token| token.kind), Some(TokenKind::Month));
        assert_eq!(lookup("mm").map(|token| token.kind), Some(TokenKind::Minute));
        assert!(lookup("M").is_none());
    }

    #[test]
    fn complete_patterns_are_anchored() {
        let month = lookup("MM").expect("month");
        assert!(month.pattern.is_match("12"));
        assert!(!month.pattern.is_match("120"));
        assert!(!month.pattern.is_match("00"));
    }

    #[test]
    fn meridiem_normalizes_case() {
        assert_eq!(lookup("A").expect("A").normalize('p'), 'P');
        assert_eq!(lookup("a").expect("a").normalize('M'), 'm');
        assert_eq!(lookup("HH").expect("HH").normalize('1'), '1');
    }
}
