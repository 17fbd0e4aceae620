use inputmask::masked::{is_complete, is_partially_valid, segments_to_format, strip_literals};
use inputmask::{
    DateLimits, MaskIssue, MaskState, PatternMask, PatternTable, apply_mask, apply_pattern,
    get_expected_length, parse_format, validate_complete, validate_complete_with_limits,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn type_into(format: &str, input: &str) -> (String, String) {
    let output = apply_mask(input, &parse_format(format), input.chars().count());
    (output.formatted, output.raw)
}

#[rstest]
#[case("MM-DD-YYYY")]
#[case("DD.MM.YY")]
#[case("YYYY-MM-DDTHH:mm:ss")]
#[case("hh:mm a")]
fn format_parsing_round_trips(#[case] format: &str) {
    assert_eq!(segments_to_format(&parse_format(format)), format);
}

#[test]
fn date_digits_are_formatted() {
    assert_eq!(
        type_into("MM-DD-YYYY", "12252024"),
        ("12-25-2024".to_string(), "12252024".to_string())
    );
}

#[test]
fn invalid_hour_digit_is_dropped() {
    assert_eq!(type_into("HH:mm", "7"), (String::new(), String::new()));
}

#[test]
fn invalid_month_completion_is_dropped() {
    assert_eq!(type_into("MM-DD-YYYY", "13").0, "1");
}

#[rstest]
#[case("02-30-2024", false)]
#[case("02-29-2024", true)]
#[case("02-29-2023", false)]
fn day_of_month_is_checked(#[case] value: &str, #[case] valid: bool) {
    let report = validate_complete(value, "MM-DD-YYYY");
    assert!(report.length_ok);
    assert_eq!(report.semantic_ok, valid);
}

#[test]
fn generic_quantifiers() {
    let optional = PatternMask::parse("#?##", &PatternTable::new());
    assert_eq!(apply_pattern("12", &optional, 0).formatted, "12");
    assert_eq!(apply_pattern("123", &optional, 0).formatted, "123");
    assert!(optional.is_complete("12"));
    assert!(optional.is_complete("123"));

    let repeated = PatternMask::parse("#*@", &PatternTable::new());
    assert_eq!(apply_pattern("12345a", &repeated, 0).formatted, "12345a");
}

#[rstest]
#[case("MM-DD-YYYY", "12252024")]
#[case("DD/MM/YYYY HH:mm", "3112199923")]
#[case("hh:mm A", "1145p")]
#[case("[HH]", "9")]
fn masking_is_a_fixed_point(#[case] format: &str, #[case] input: &str) {
    let segments = parse_format(format);
    let first = apply_mask(input, &segments, 0);
    let again = apply_mask(&strip_literals(&first.formatted, &segments), &segments, 0);
    assert_eq!(again.formatted, first.formatted);
}

#[test]
fn token_validators_by_name() {
    assert!(is_partially_valid("1", "HH"));
    assert!(!is_partially_valid("3", "HH"));
    assert!(is_complete("23", "HH"));
    assert!(!is_complete("24", "HH"));
}

#[test]
fn expected_lengths() {
    assert_eq!(get_expected_length("DD/MM/YYYY", false), 10);
    assert_eq!(get_expected_length("DD/MM/YYYY", true), 8);
}

#[test]
fn limits_are_inclusive() {
    let limits = DateLimits::new(Some("2024-01-01".to_string()), Some("2024-12-31".to_string()));
    assert!(validate_complete_with_limits("2024-01-01", "YYYY-MM-DD", &limits).is_valid());
    assert!(validate_complete_with_limits("2024-12-31", "YYYY-MM-DD", &limits).is_valid());
    assert_eq!(
        validate_complete_with_limits("2025-01-01", "YYYY-MM-DD", &limits).issues,
        vec![MaskIssue::AfterMaximum {
            max: "2024-12-31".to_string()
        }]
    );
}

#[test]
fn state_summary() {
    let limits = DateLimits::default();
    assert_eq!(inputmask::masked::mask_state("", "HH:mm", &limits), MaskState::Empty);
    assert_eq!(inputmask::masked::mask_state("1", "HH:mm", &limits), MaskState::PartiallyFilled);
    assert_eq!(inputmask::masked::mask_state("1230", "HH:mm", &limits), MaskState::Complete);
}
