use super::tokens::{self, FormatToken, TokenKind};

/// Whether `candidate` can still grow into a complete value for the token
/// named `token_name`.
pub fn is_partially_valid(candidate: &str, token_name: &str) -> bool {
    tokens::lookup(token_name).is_some_and(|token| accepts_prefix(token, candidate))
}

pub fn is_complete(value: &str, token_name: &str) -> bool {
    tokens::lookup(token_name).is_some_and(|token| accepts_complete(token, value))
}

pub(crate) fn accepts_complete(token: &FormatToken, value: &str) -> bool {
    value.chars().count() == token.length && token.pattern.is_match(value)
}

pub(crate) fn accepts_prefix(token: &FormatToken, candidate: &str) -> bool {
    let chars: Vec<char> = candidate.chars().collect();
    if chars.len() > token.length {
        return false;
    }
    if chars.len() == token.length {
        return accepts_complete(token, candidate);
    }

    match token.kind {
        TokenKind::Year | TokenKind::ShortYear => chars.iter().all(char::is_ascii_digit),
        TokenKind::Month | TokenKind::Hour12 => match chars.as_slice() {
            [] => true,
            [first] => matches!(first, '0' | '1'),
            _ => false,
        },
        TokenKind::Day => match chars.as_slice() {
            [] => true,
            [first] => matches!(first, '0'..='3'),
            _ => false,
        },
        TokenKind::Hour => match chars.as_slice() {
            [] => true,
            [first] => matches!(first, '0'..='2'),
            _ => false,
        },
        TokenKind::Minute | TokenKind::Second => match chars.as_slice() {
            [] => true,
            [first] => matches!(first, '0'..='5'),
            _ => false,
        },
        TokenKind::Meridiem => match chars.as_slice() {
            [] => true,
            [first] => matches!(first, 'A' | 'P'),
            _ => false,
        },
        TokenKind::MeridiemLower => match chars.as_slice() {
            [] => true,
            [first] => matches!(first, 'a' | 'p'),
            _ => false,
        },
    }
}
