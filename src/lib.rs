pub mod app;
pub mod cli;
pub mod config;
pub mod field;
pub mod mask;
pub mod output;
pub mod script;
pub mod template;

pub use field::{EventRecord, Field};
pub use mask::{EventKind, KeyState, MaskConfig, MaskEvent, MaskState, Masked, PhoneMask};
pub use template::{Template, TemplateError};

#[cfg(test)]
mod tests;
