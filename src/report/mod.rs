//! Dashboard rendering.

pub mod format;
pub mod generator;
pub mod terminal;

pub use generator::{generate_json_report, generate_markdown_report};
pub use terminal::render_terminal;
