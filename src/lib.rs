pub mod config;
pub mod error;
pub mod masked;
pub mod terminal;
pub mod widgets;

pub use config::{MaskConfig, RuleDef};
pub use error::{ConfigError, Error};
pub use masked::{
    DateLimits, MaskIssue, MaskOutput, MaskState, ParsedSegment, PatternMask, PatternTable,
    ValidationReport, apply_mask, apply_pattern, get_expected_length, parse_format,
    validate_complete, validate_complete_with_limits,
};
pub use widgets::inputs::{KeyResult, MaskedInput, ValueMode};
