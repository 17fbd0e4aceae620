use regex::Regex;

pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), String> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.trim().is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn matches(regex: Regex, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.is_empty() || regex.is_match(value) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}

pub fn none_of(values: Vec<String>, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if values.iter().any(|blocked| blocked == value) {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}
