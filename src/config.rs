use crate::error::ConfigError;
use crate::masked::{DateLimits, MaskPattern, PatternTable};
use crate::widgets::inputs::{MaskKind, MaskedInput, ValueMode};
use crate::widgets::validators::{Validator, matches, none_of, required};
use indexmap::IndexMap;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A user-defined pattern character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PatternDef {
    /// Regex one input character must match.
    pub regex: String,
    #[serde(default)]
    pub optional: bool,
}

/// A check run on the bound value once the mask itself is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleDef {
    Required {
        #[serde(default)]
        message: Option<String>,
    },
    /// Non-empty values must match `regex`.
    Matches {
        regex: String,
        #[serde(default)]
        message: Option<String>,
    },
    NoneOf {
        values: Vec<String>,
        #[serde(default)]
        message: Option<String>,
    },
}

impl RuleDef {
    pub fn build(&self) -> Result<Validator, ConfigError> {
        Ok(match self {
            RuleDef::Required { message } => {
                required(message.as_deref().unwrap_or("A value is required"))
            }
            RuleDef::Matches { regex, message } => {
                let compiled = Regex::new(regex).map_err(|source| ConfigError::InvalidRule {
                    regex: regex.clone(),
                    source,
                })?;
                let message = message
                    .clone()
                    .unwrap_or_else(|| format!("Value must match {regex}"));
                matches(compiled, message)
            }
            RuleDef::NoneOf { values, message } => none_of(
                values.clone(),
                message.as_deref().unwrap_or("Value is not allowed"),
            ),
        })
    }
}

/// Describes one masked field. Exactly one of `format` and `pattern` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct MaskConfig {
    /// Date/time format such as `MM-DD-YYYY` or `hh:mm A`.
    pub format: Option<String>,
    /// Character mask such as `(###) ###-####`.
    pub pattern: Option<String>,
    pub value_mode: ValueMode,
    /// Earliest accepted date, written in `format`.
    pub min: Option<String>,
    /// Latest accepted date, written in `format`.
    pub max: Option<String>,
    /// Extra pattern characters, keyed by a single character.
    pub patterns: IndexMap<String, PatternDef>,
    /// Checks applied after the mask, in order.
    pub rules: Vec<RuleDef>,
}

impl MaskConfig {
    /// Reads YAML for `.yaml`/`.yml` files and JSON otherwise.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "yaml" | "yml"));

        tracing::debug!(path = %path.display(), is_yaml, "loading mask config");
        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(MaskConfig)).unwrap_or_default()
    }

    pub fn limits(&self) -> DateLimits {
        DateLimits::new(self.min.clone(), self.max.clone())
    }

    pub fn pattern_table(&self) -> Result<PatternTable, ConfigError> {
        let mut table = PatternTable::new();
        for (key, def) in &self.patterns {
            let mut chars = key.chars();
            let (Some(symbol), None) = (chars.next(), chars.next()) else {
                return Err(ConfigError::InvalidSymbol(key.clone()));
            };
            let pattern = MaskPattern::new(&def.regex, def.optional)
                .map_err(|source| ConfigError::InvalidPattern { symbol, source })?;
            table.insert(symbol, pattern);
        }
        Ok(table)
    }

    pub fn mask_kind(&self) -> Result<(String, MaskKind), ConfigError> {
        match (&self.format, &self.pattern) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingMask),
            (None, None) => Err(ConfigError::MissingMask),
            (Some(format), None) => Ok((format.clone(), MaskKind::date(format))),
            (None, Some(pattern)) => Ok((
                pattern.clone(),
                MaskKind::pattern(pattern, &self.pattern_table()?),
            )),
        }
    }

    pub fn validators(&self) -> Result<Vec<Validator>, ConfigError> {
        self.rules.iter().map(RuleDef::build).collect()
    }

    pub fn build_input(&self, id: impl Into<String>) -> Result<MaskedInput, ConfigError> {
        let (source, kind) = self.mask_kind()?;
        let mut input = MaskedInput::new(id, source, kind)
            .with_value_mode(self.value_mode)
            .with_limits(self.limits());
        for validator in self.validators()? {
            input = input.with_validator(validator);
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::{MaskConfig, RuleDef};
    use crate::error::ConfigError;
    use crate::masked::{MaskState, apply_pattern};
    use crate::widgets::inputs::{MaskKind, ValueMode};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_yaml_with_custom_patterns() {
        let config = MaskConfig::from_yaml_str(
            r#"
pattern: "HH-HH"
value_mode: raw
patterns:
  H:
    regex: "[0-9a-f]"
"#,
        )
        .expect("yaml config");
        assert_eq!(config.value_mode, ValueMode::Raw);

        let (source, kind) = config.mask_kind().expect("mask");
        assert_eq!(source, "HH-HH");
        let MaskKind::Pattern(mask) = kind else {
            panic!("expected a pattern mask");
        };
        assert_eq!(apply_pattern("0fzz1a", &mask, 0).formatted, "0f-1a");
    }

    #[test]
    fn parses_json_with_limits() {
        let config = MaskConfig::from_json_str(
            r#"{"format": "MM-DD-YYYY", "min": "01-01-2000", "max": "12-31-2030"}"#,
        )
        .expect("json config");
        let mut input = config.build_input("dob").expect("input");
        input.set_value("12-31-1999");
        assert_eq!(input.state(), MaskState::Invalid);
        input.set_value("06-15-2010");
        assert_eq!(input.state(), MaskState::Complete);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = MaskConfig::from_json_str(r#"{"format": "HH:mm", "mask": "x"}"#)
            .expect_err("unknown field");
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn mask_must_be_unambiguous() {
        let config = MaskConfig::default();
        assert!(matches!(config.mask_kind(), Err(ConfigError::MissingMask)));

        let config = MaskConfig {
            format: Some("HH:mm".to_string()),
            pattern: Some("##".to_string()),
            ..MaskConfig::default()
        };
        assert!(matches!(config.mask_kind(), Err(ConfigError::ConflictingMask)));
    }

    #[test]
    fn pattern_keys_must_be_single_characters() {
        let config = MaskConfig::from_yaml_str(
            r#"
pattern: "00"
patterns:
  XY:
    regex: "x"
"#,
        )
        .expect("yaml config");
        assert!(matches!(
            config.pattern_table(),
            Err(ConfigError::InvalidSymbol(key)) if key == "XY"
        ));
    }

    #[test]
    fn invalid_pattern_regex_is_reported() {
        let config = MaskConfig::from_yaml_str(
            r#"
pattern: "Q"
patterns:
  Q:
    regex: "[a-"
"#,
        )
        .expect("yaml config");
        assert!(matches!(
            config.pattern_table(),
            Err(ConfigError::InvalidPattern { symbol: 'Q', .. })
        ));
    }

    #[test]
    fn rules_are_attached_to_built_inputs() {
        let config = MaskConfig::from_yaml_str(
            r######"
pattern: "#####"
rules:
  - rule: matches
    regex: "^9"
    message: "Only 9xxxx zip codes"
  - rule: none_of
    values: ["99999"]
"######,
        )
        .expect("yaml config");
        assert_eq!(config.rules.len(), 2);

        let mut input = config.build_input("zip").expect("input");
        input.set_value("12345");
        assert_eq!(input.validate(), Err("Only 9xxxx zip codes".to_string()));
        input.set_value("99999");
        assert_eq!(input.validate(), Err("Value is not allowed".to_string()));
        input.set_value("90210");
        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn invalid_rule_regex_is_reported() {
        let config = MaskConfig {
            format: Some("HH:mm".to_string()),
            rules: vec![RuleDef::Matches {
                regex: "(".to_string(),
                message: None,
            }],
            ..MaskConfig::default()
        };
        assert!(matches!(
            config.build_input("at"),
            Err(ConfigError::InvalidRule { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = MaskConfig::load(std::path::Path::new("/nonexistent/mask.yaml"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn schema_lists_config_fields() {
        let schema = MaskConfig::json_schema();
        let properties = schema
            .get("properties")
            .and_then(|value| value.as_object())
            .expect("properties");
        for field in ["format", "pattern", "value_mode", "min", "max", "patterns", "rules"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }
}
