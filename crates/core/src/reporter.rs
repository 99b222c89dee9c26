use crate::results::Message;

/// Downstream consumer of audit progress and outcome.
///
/// Per audit the calls arrive in exactly this order: `begin`, zero or more
/// `log`, then either `handle_result` (success) or `error` (failure), then
/// `end`. `handle_result` and `error` are mutually exclusive; each audit
/// produces at most one of them.
pub trait Reporter {
    /// Audit is starting.
    fn begin(&mut self) {}

    /// Progress message.
    fn log(&mut self, message: &str);

    /// The audit failed; `message` is human-readable.
    fn error(&mut self, message: &str);

    /// The audit succeeded with these findings, in discovery order.
    fn handle_result(&mut self, messages: Vec<Message>);

    /// Audit is over, success or failure.
    fn end(&mut self) {}
}
