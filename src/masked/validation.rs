use super::date::DateParts;
use super::engine::{apply_mask, expected_length, strip_literals};
use super::model::ParsedSegment;
use super::parser::parse_format;
use super::partial::accepts_complete;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskIssue {
    #[error("expected {required} characters, got {actual}")]
    Incomplete { required: usize, actual: usize },
    #[error("{value:?} is not a valid {token} value")]
    InvalidToken { token: String, value: String },
    #[error("expected {expected:?} at position {position}, found {found:?}")]
    UnexpectedLiteral {
        position: usize,
        expected: char,
        found: char,
    },
    #[error("invalid date")]
    InvalidDate,
    #[error("date is before the minimum {min}")]
    BeforeMinimum { min: String },
    #[error("date is after the maximum {max}")]
    AfterMaximum { max: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub length_ok: bool,
    pub semantic_ok: bool,
    pub issues: Vec<MaskIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn first_issue(&self) -> Option<&MaskIssue> {
        self.issues.first()
    }
}

/// Inclusive bounds, written in the same format as the checked value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateLimits {
    pub min: Option<String>,
    pub max: Option<String>,
}

impl DateLimits {
    pub fn new(min: Option<String>, max: Option<String>) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskState {
    Empty,
    PartiallyFilled,
    Complete,
    Invalid,
}

pub fn get_expected_length(format: &str, raw_mode: bool) -> usize {
    expected_length(&parse_format(format), raw_mode)
}

pub fn validate_complete(value: &str, format: &str) -> ValidationReport {
    validate_complete_with_limits(value, format, &DateLimits::default())
}

pub fn validate_complete_with_limits(
    value: &str,
    format: &str,
    limits: &DateLimits,
) -> ValidationReport {
    validate_segments(value, &parse_format(format), limits)
}

pub(crate) fn validate_segments(
    value: &str,
    segments: &[ParsedSegment],
    limits: &DateLimits,
) -> ValidationReport {
    if let Some(issue) = literal_mismatch(value, segments) {
        return ValidationReport {
            length_ok: true,
            semantic_ok: false,
            issues: vec![issue],
        };
    }
    let Some(raw) = to_raw(value, segments) else {
        let actual = value.chars().count();
        let required = expected_length(segments, !looks_formatted(value, segments));
        return ValidationReport {
            length_ok: false,
            semantic_ok: false,
            issues: vec![MaskIssue::Incomplete { required, actual }],
        };
    };

    let mut issues = Vec::<MaskIssue>::new();
    let mut chars = raw.chars();
    for token in segments.iter().filter_map(ParsedSegment::token) {
        let part: String = chars.by_ref().take(token.length).collect();
        if !accepts_complete(token, &part) {
            issues.push(MaskIssue::InvalidToken {
                token: token.name.to_string(),
                value: part,
            });
        }
    }

    let parts = DateParts::from_raw(&raw, segments);
    if issues.is_empty() && !parts.is_calendar_valid() {
        issues.push(MaskIssue::InvalidDate);
    }
    let semantic_ok = issues.is_empty();

    if semantic_ok {
        if let Some(min) = limits.min.as_deref()
            && let Some(bound) = limit_parts(min, segments)
            && parts.chronological_cmp(&bound) == Ordering::Less
        {
            issues.push(MaskIssue::BeforeMinimum {
                min: min.to_string(),
            });
        }
        if let Some(max) = limits.max.as_deref()
            && let Some(bound) = limit_parts(max, segments)
            && parts.chronological_cmp(&bound) == Ordering::Greater
        {
            issues.push(MaskIssue::AfterMaximum {
                max: max.to_string(),
            });
        }
    }

    ValidationReport {
        length_ok: true,
        semantic_ok,
        issues,
    }
}

pub fn mask_state(value: &str, format: &str, limits: &DateLimits) -> MaskState {
    let segments = parse_format(format);
    let output = apply_mask(value, &segments, 0);
    if output.raw.is_empty() {
        return MaskState::Empty;
    }
    if output.raw.chars().count() < expected_length(&segments, true) {
        return MaskState::PartiallyFilled;
    }
    if validate_segments(&output.formatted, &segments, limits).is_valid() {
        MaskState::Complete
    } else {
        MaskState::Invalid
    }
}

/// Token characters of `value` when it has the formatted or the raw length.
fn to_raw(value: &str, segments: &[ParsedSegment]) -> Option<String> {
    let len = value.chars().count();
    if len == expected_length(segments, false) && literal_mismatch(value, segments).is_none() {
        Some(strip_literals(value, segments))
    } else if len == expected_length(segments, true) {
        Some(value.to_string())
    } else {
        None
    }
}

/// First literal that does not sit where the format puts it, for values with
/// the formatted length.
fn literal_mismatch(value: &str, segments: &[ParsedSegment]) -> Option<MaskIssue> {
    if value.chars().count() != expected_length(segments, false) {
        return None;
    }
    let mut chars = value.chars().enumerate();
    for segment in segments {
        match segment {
            ParsedSegment::Token(token) => {
                for _ in 0..token.length {
                    chars.next();
                }
            }
            ParsedSegment::Literal(expected) => {
                let (position, found) = chars.next()?;
                if found != *expected {
                    return Some(MaskIssue::UnexpectedLiteral {
                        position,
                        expected: *expected,
                        found,
                    });
                }
            }
        }
    }
    None
}

fn looks_formatted(value: &str, segments: &[ParsedSegment]) -> bool {
    segments.iter().any(|segment| match segment {
        ParsedSegment::Literal(ch) => value.contains(*ch),
        ParsedSegment::Token(_) => false,
    })
}

fn limit_parts(limit: &str, segments: &[ParsedSegment]) -> Option<DateParts> {
    let parts = to_raw(limit, segments).map(|raw| DateParts::from_raw(&raw, segments));
    if parts.is_none() {
        tracing::warn!(limit, "ignoring date limit that does not fit the format");
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::{
        DateLimits, MaskIssue, MaskState, get_expected_length, mask_state, validate_complete,
        validate_complete_with_limits,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("02-29-2024", true)]
    #[case("02-29-2023", false)]
    #[case("02-30-2024", false)]
    #[case("04-30-2023", true)]
    #[case("04-31-2023", false)]
    fn day_in_month(#[case] value: &str, #[case] expected: bool) {
        let report = validate_complete(value, "MM-DD-YYYY");
        assert!(report.length_ok);
        assert_eq!(report.semantic_ok, expected);
    }

    #[test]
    fn feb_thirtieth_reports_invalid_date() {
        let report = validate_complete("02-30-2024", "MM-DD-YYYY");
        assert_eq!(report.issues, vec![MaskIssue::InvalidDate]);
    }

    #[test]
    fn accepts_raw_values() {
        let report = validate_complete("02292024", "MM-DD-YYYY");
        assert!(report.is_valid());
    }

    #[test]
    fn short_value_reports_required_length() {
        let report = validate_complete("12-25", "MM-DD-YYYY");
        assert!(!report.length_ok);
        assert_eq!(
            report.issues,
            vec![MaskIssue::Incomplete {
                required: 10,
                actual: 5
            }]
        );

        let report = validate_complete("1225", "MM-DD-YYYY");
        assert_eq!(
            report.issues,
            vec![MaskIssue::Incomplete {
                required: 8,
                actual: 4
            }]
        );
    }

    #[test]
    fn misplaced_separators_are_reported() {
        let report = validate_complete("12/25/2024", "MM-DD-YYYY");
        assert!(report.length_ok);
        assert!(!report.semantic_ok);
        assert_eq!(
            report.issues,
            vec![MaskIssue::UnexpectedLiteral {
                position: 2,
                expected: '-',
                found: '/'
            }]
        );
        assert_eq!(
            report.issues[0].to_string(),
            "expected '-' at position 2, found '/'"
        );
        assert!(validate_complete("12-25-2024", "MM-DD-YYYY").is_valid());
    }

    #[test]
    fn token_syntax_errors_are_reported() {
        let report = validate_complete("13-01-2024", "MM-DD-YYYY");
        assert!(!report.semantic_ok);
        assert_eq!(
            report.issues,
            vec![MaskIssue::InvalidToken {
                token: "MM".to_string(),
                value: "13".to_string()
            }]
        );
    }

    #[test]
    fn short_years_pivot_before_leap_check() {
        assert!(validate_complete("29/02/00", "DD/MM/YY").is_valid());
        assert!(!validate_complete("29/02/99", "DD/MM/YY").is_valid());
    }

    #[test]
    fn limits_produce_distinct_issues() {
        let limits = DateLimits::new(
            Some("01-01-2020".to_string()),
            Some("12-31-2024".to_string()),
        );
        let before = validate_complete_with_limits("12-31-2019", "MM-DD-YYYY", &limits);
        assert_eq!(
            before.issues,
            vec![MaskIssue::BeforeMinimum {
                min: "01-01-2020".to_string()
            }]
        );
        assert!(before.semantic_ok);

        let after = validate_complete_with_limits("01012025", "MM-DD-YYYY", &limits);
        assert_eq!(
            after.issues,
            vec![MaskIssue::AfterMaximum {
                max: "12-31-2024".to_string()
            }]
        );

        let inside = validate_complete_with_limits("12-31-2024", "MM-DD-YYYY", &limits);
        assert!(inside.is_valid());
    }

    #[test]
    fn malformed_limit_is_ignored() {
        let limits = DateLimits::new(Some("2020".to_string()), None);
        assert!(validate_complete_with_limits("01-01-2000", "MM-DD-YYYY", &limits).is_valid());
    }

    #[test]
    fn issue_messages() {
        assert_eq!(MaskIssue::InvalidDate.to_string(), "invalid date");
        assert_eq!(
            MaskIssue::Incomplete {
                required: 10,
                actual: 3
            }
            .to_string(),
            "expected 10 characters, got 3"
        );
    }

    #[rstest]
    #[case("", MaskState::Empty)]
    #[case("7", MaskState::Empty)]
    #[case("12", MaskState::PartiallyFilled)]
    #[case("12252024", MaskState::Complete)]
    #[case("02302024", MaskState::Invalid)]
    fn state_transitions(#[case] input: &str, #[case] expected: MaskState) {
        assert_eq!(mask_state(input, "MM-DD-YYYY", &DateLimits::default()), expected);
    }

    #[test]
    fn expected_length_by_mode() {
        assert_eq!(get_expected_length("MM-DD-YYYY", false), 10);
        assert_eq!(get_expected_length("MM-DD-YYYY", true), 8);
        assert_eq!(get_expected_length("hh:mm A", false), 8);
    }
}
