pub mod inputs;
pub mod validators;
