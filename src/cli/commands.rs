use inputmask::MaskConfig;
use inputmask::error::Result;
use inputmask::masked::{apply_mask, apply_pattern, expected_length, validate_complete_with_limits};
use inputmask::widgets::inputs::MaskKind;
use inputmask::widgets::validators::run_validators;
use serde::Serialize;
use std::process::ExitCode;

#[derive(Debug, Serialize)]
struct Checked<T> {
    #[serde(flatten)]
    mask: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PatternReport {
    complete: bool,
    formatted: String,
    raw: String,
}

pub fn apply(config: &MaskConfig, input: &str, cursor: Option<usize>) -> Result<ExitCode> {
    let (_, kind) = config.mask_kind()?;
    let cursor = cursor.unwrap_or_else(|| input.chars().count());
    let output = match &kind {
        MaskKind::Date(segments) => apply_mask(input, segments, cursor),
        MaskKind::Pattern(mask) => apply_pattern(input, mask, cursor),
    };
    print_json(&output)?;
    Ok(ExitCode::SUCCESS)
}

pub fn validate(config: &MaskConfig, value: &str) -> Result<ExitCode> {
    let (source, kind) = config.mask_kind()?;
    let rule_error = run_validators(&config.validators()?, value).err();
    let rules_ok = rule_error.is_none();
    let valid = match &kind {
        MaskKind::Date(_) => {
            let report = validate_complete_with_limits(value, &source, &config.limits());
            let valid = report.is_valid();
            print_json(&Checked {
                mask: report,
                rule_error,
            })?;
            valid
        }
        MaskKind::Pattern(mask) => {
            let output = apply_pattern(value, mask, 0);
            let complete = mask.is_complete(value);
            print_json(&Checked {
                mask: PatternReport {
                    complete,
                    formatted: output.formatted,
                    raw: output.raw,
                },
                rule_error,
            })?;
            complete
        }
    };
    let valid = valid && rules_ok;
    Ok(if valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn length(config: &MaskConfig) -> Result<ExitCode> {
    let (_, kind) = config.mask_kind()?;
    let raw_mode = config.value_mode == inputmask::ValueMode::Raw;
    let length = match &kind {
        MaskKind::Date(segments) => expected_length(segments, raw_mode),
        MaskKind::Pattern(mask) => mask.min_length(),
    };
    println!("{length}");
    Ok(ExitCode::SUCCESS)
}

pub fn schema() -> Result<ExitCode> {
    print_json(&MaskConfig::json_schema())?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
