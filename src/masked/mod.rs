//! Keystroke-level masking for text inputs.
//!
//! Two engines share the same output shape: [`apply_mask`] drives a
//! date/time format such as `MM-DD-YYYY`, [`apply_pattern`] drives a
//! character mask such as `(###) ###-####`. Both accept whatever the user has
//! typed so far and return the formatted text, the raw (literal free) text
//! and the cursor mapped into each.

pub mod date;
pub mod engine;
pub mod model;
pub mod parser;
pub mod partial;
pub mod pattern;
pub mod tokens;
pub mod validation;

pub use date::{DateParts, days_in_month, is_leap_year};
pub use engine::{apply_mask, expected_length, strip_literals};
pub use model::{MaskOutput, ParsedSegment};
pub use parser::{parse_format, segments_to_format};
pub use partial::{is_complete, is_partially_valid};
pub use pattern::{MaskPattern, MaskSlot, PatternMask, PatternTable, Quantifier, apply_pattern};
pub use tokens::{FormatToken, TokenKind};
pub use validation::{
    DateLimits, MaskIssue, MaskState, ValidationReport, get_expected_length, mask_state,
    validate_complete, validate_complete_with_limits,
};
