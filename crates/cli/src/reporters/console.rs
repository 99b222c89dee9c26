use colored::Colorize;

use a11y_core::{Message, MessageType, Reporter};

/// Human-readable reporter: one line per finding plus a summary.
#[derive(Default)]
pub struct ConsoleReporter {
    errors: usize,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error-level findings seen, for exit-code decisions.
    pub fn error_count(&self) -> usize {
        self.errors
    }
}

impl Reporter for ConsoleReporter {
    fn begin(&mut self) {
        println!("{}", "Starting accessibility audit...".cyan());
    }

    fn log(&mut self, message: &str) {
        println!("  {} {message}", ">".dimmed());
    }

    fn error(&mut self, message: &str) {
        eprintln!("{} {message}", "Error:".red().bold());
    }

    fn handle_result(&mut self, messages: Vec<Message>) {
        let mut warnings = 0;
        let mut notices = 0;

        for message in &messages {
            let label = match message.message_type {
                MessageType::Error => {
                    self.errors += 1;
                    "error".red()
                }
                MessageType::Warning => {
                    warnings += 1;
                    "warning".yellow()
                }
                MessageType::Notice => {
                    notices += 1;
                    "notice".cyan()
                }
            };
            println!("{:>8}  {}", label.bold(), message.message);
            println!("          {}", message.code.dimmed());
            if let Some(selector) = &message.selector {
                println!("          {}", selector.dimmed());
            }
        }

        println!();
        println!(
            "{}",
            format!("{} errors, {warnings} warnings, {notices} notices", self.errors).bold()
        );
    }
}
