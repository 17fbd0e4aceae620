use super::model::ParsedSegment;
use super::tokens::TokenKind;
use std::cmp::Ordering;

/// Two-digit years at or above this value belong to the 1900s.
pub const SHORT_YEAR_PIVOT: i32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateParts {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub pm: Option<bool>,
    hour_is_12h: bool,
}

impl DateParts {
    /// Reads token values from `raw` (literals already stripped).
    pub fn from_raw(raw: &str, segments: &[ParsedSegment]) -> Self {
        let mut parts = DateParts::default();
        let mut chars = raw.chars();

        for token in segments.iter().filter_map(ParsedSegment::token) {
            let value: String = chars.by_ref().take(token.length).collect();
            if value.chars().count() < token.length {
                break;
            }
            let number = value.parse::<u32>().ok();
            match token.kind {
                TokenKind::Year => parts.year = number.and_then(|n| i32::try_from(n).ok()),
                TokenKind::ShortYear => parts.year = number.map(expand_short_year),
                TokenKind::Month => parts.month = number,
                TokenKind::Day => parts.day = number,
                TokenKind::Hour => parts.hour = number,
                TokenKind::Hour12 => {
                    parts.hour = number;
                    parts.hour_is_12h = true;
                }
                TokenKind::Minute => parts.minute = number,
                TokenKind::Second => parts.second = number,
                TokenKind::Meridiem | TokenKind::MeridiemLower => {
                    parts.pm = match value.to_ascii_uppercase().as_str() {
                        "AM" => Some(false),
                        "PM" => Some(true),
                        _ => None,
                    };
                }
            }
        }
        parts
    }

    /// Hour on a 24-hour clock.
    pub fn hour24(&self) -> Option<u32> {
        let hour = self.hour?;
        if !self.hour_is_12h {
            return Some(hour);
        }
        match self.pm {
            Some(true) if hour == 12 => Some(12),
            Some(true) => Some(hour + 12),
            Some(false) if hour == 12 => Some(0),
            _ => Some(hour),
        }
    }

    /// Day-of-month check. Values without both month and day pass.
    pub fn is_calendar_valid(&self) -> bool {
        match (self.month, self.day) {
            (Some(month), Some(day)) => day >= 1 && day <= days_in_month(month, self.year),
            _ => true,
        }
    }

    fn sort_key(&self) -> (i32, u32, u32, u32, u32, u32) {
        (
            self.year.unwrap_or(0),
            self.month.unwrap_or(0),
            self.day.unwrap_or(0),
            self.hour24().unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        )
    }

    pub fn chronological_cmp(&self, other: &DateParts) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

pub fn expand_short_year(value: u32) -> i32 {
    let value = i32::try_from(value % 100).unwrap_or(0);
    if value >= SHORT_YEAR_PIVOT {
        1900 + value
    } else {
        2000 + value
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Zero for an impossible month. February allows 29 when the year is unknown.
pub fn days_in_month(month: u32, year: Option<i32>) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => match year {
            Some(y) if is_leap_year(y) => 29,
            Some(_) => 28,
            None => 29,
        },
        _ => 0,
    }
}
