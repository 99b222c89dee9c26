//! Reporter implementations consuming audit output.

mod console;
mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
