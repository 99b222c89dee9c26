// a11y-core: accessibility audit pipeline
//
// Drives a headless browser to load one page, injects HTML_CodeSniffer into
// the page's own JavaScript context, waits for it to finish, and hands the
// normalized findings to a `Reporter`.

pub mod audit;
pub mod error;
pub mod poll;
pub mod reporter;
pub mod results;
pub mod script;
pub mod session;

/// Default deadline in milliseconds for a whole audit.
///
/// One deadline governs the entire pipeline, from browser launch through
/// message collection. Stages are never individually timed.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub use audit::{AuditOptions, Standard, run_audit, run_audit_with};
pub use error::{AuditError, Result};
pub use reporter::Reporter;
pub use results::{Message, MessageType, RawMessage, build_messages};
pub use session::{ChromiumSession, PageBackend};
