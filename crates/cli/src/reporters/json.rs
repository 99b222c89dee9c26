use tracing::debug;

use a11y_core::{Message, MessageType, Reporter};

/// Machine-readable reporter: findings as a JSON array on stdout, progress
/// kept off stdout entirely.
#[derive(Default)]
pub struct JsonReporter {
    errors: usize,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error-level findings seen, for exit-code decisions.
    pub fn error_count(&self) -> usize {
        self.errors
    }
}

impl Reporter for JsonReporter {
    fn log(&mut self, message: &str) {
        debug!(target = "a11y", "{message}");
    }

    fn error(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn handle_result(&mut self, messages: Vec<Message>) {
        self.errors = messages
            .iter()
            .filter(|message| message.message_type == MessageType::Error)
            .count();
        match serde_json::to_string_pretty(&messages) {
            Ok(body) => println!("{body}"),
            Err(err) => eprintln!("failed to serialize results: {err}"),
        }
    }
}
