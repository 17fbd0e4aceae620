pub mod masked_input;
pub mod text_edit;

pub use masked_input::{KeyResult, MaskKind, MaskedInput, ValueMode};
