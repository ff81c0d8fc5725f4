//! CLI library components for the card marketplace client.

pub mod logging;
pub mod prompt;
pub mod render;
pub mod settings;
