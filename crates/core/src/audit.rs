//! The audit pipeline: one page, one ruleset, one deadline.
//!
//! Stages run strictly in sequence with no branching except the failure
//! short-circuit: begin, open session, navigate, expose parameters, inject
//! sniffer, execute sniffer, collect, end. The terminal stage releases the
//! browser and notifies the reporter exactly once, success or failure.

use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::DEFAULT_TIMEOUT_MS;
use crate::error::{AuditError, Result};
use crate::poll::{self, POLL_INTERVAL};
use crate::reporter::Reporter;
use crate::results::{RawMessage, build_messages};
use crate::script;
use crate::session::{ChromiumSession, PageBackend};

/// Accessibility ruleset for HTML_CodeSniffer to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Standard {
    Section508,
    WCAG2A,
    #[default]
    WCAG2AA,
    WCAG2AAA,
}

impl std::fmt::Display for Standard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Standard::Section508 => write!(f, "Section508"),
            Standard::WCAG2A => write!(f, "WCAG2A"),
            Standard::WCAG2AA => write!(f, "WCAG2AA"),
            Standard::WCAG2AAA => write!(f, "WCAG2AAA"),
        }
    }
}

impl FromStr for Standard {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "section508" => Ok(Standard::Section508),
            "wcag2a" => Ok(Standard::WCAG2A),
            "wcag2aa" => Ok(Standard::WCAG2AA),
            "wcag2aaa" => Ok(Standard::WCAG2AAA),
            other => Err(format!(
                "unknown standard '{other}' (expected Section508, WCAG2A, WCAG2AA or WCAG2AAA)"
            )),
        }
    }
}

/// One audit request.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Target URL, already sanitized and query-annotated with the standard
    /// by the caller.
    pub url: String,
    pub standard: Standard,
    /// Wall-clock budget for the whole pipeline.
    pub timeout: Duration,
}

impl AuditOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            standard: Standard::default(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum Stage {
    Open = 0,
    Navigate = 1,
    Expose = 2,
    InjectSniffer = 3,
    RunSniffer = 4,
    Collect = 5,
}

/// Records which stage is in flight so a fired deadline can be classified
/// after the race is decided. Atomic because the tracker is read outside
/// the pipeline future it is shared with.
struct StageTracker(AtomicU8);

impl StageTracker {
    fn new() -> Self {
        Self(AtomicU8::new(Stage::Open as u8))
    }

    fn enter(&self, stage: Stage) {
        self.0.store(stage as u8, Ordering::Relaxed);
    }

    fn timeout_error(&self, ms: u64) -> AuditError {
        match self.0.load(Ordering::Relaxed) {
            v if v == Stage::InjectSniffer as u8 => AuditError::ScriptLoadTimeout,
            v if v == Stage::RunSniffer as u8 => AuditError::ExecutionTimeout,
            _ => AuditError::Timeout { ms },
        }
    }
}

/// Runs one audit against a freshly launched headless browser.
///
/// The reporter is the result channel; the returned `Result` mirrors it so
/// callers can pick exit behavior without re-parsing reporter output.
pub async fn run_audit<R: Reporter>(opts: AuditOptions, reporter: &mut R) -> Result<()> {
    run_audit_with(ChromiumSession::launch, opts, reporter).await
}

/// Runs one audit against whatever backend `launcher` yields.
///
/// A single deadline armed here governs the entire pipeline; there are no
/// per-stage timeouts. When the deadline fires, the in-flight stage future
/// is dropped (abandoning any poll loop with it) and its late completion
/// can never double-close the session or double-report, because both live
/// only in the terminal stage below. A collect read still in flight at the
/// deadline is discarded the same way.
pub async fn run_audit_with<P, L, Fut, R>(
    launcher: L,
    opts: AuditOptions,
    reporter: &mut R,
) -> Result<()>
where
    P: PageBackend,
    L: FnOnce() -> Fut,
    Fut: Future<Output = Result<P>>,
    R: Reporter,
{
    let timeout_ms = opts.timeout.as_millis() as u64;
    info!(
        target = "a11y",
        url = %opts.url,
        standard = %opts.standard,
        timeout_ms,
        "audit start"
    );
    reporter.begin();

    let stage = StageTracker::new();
    let mut session: Option<P> = None;
    let timed = tokio::time::timeout(
        opts.timeout,
        pipeline(&mut session, launcher, &opts, &stage, reporter),
    )
    .await;
    let outcome = match timed {
        Ok(result) => result,
        Err(_) => Err(stage.timeout_error(timeout_ms)),
    };

    // Terminal stage: release resources exactly once on every exit path,
    // then notify the reporter.
    if let Some(mut page) = session.take() {
        if let Err(err) = page.close().await {
            warn!(target = "a11y", error = %err, "browser did not close cleanly");
        }
    }

    match outcome {
        Ok(raw) => {
            info!(target = "a11y", findings = raw.len(), "audit complete");
            reporter.log("Done");
            reporter.handle_result(build_messages(raw));
            reporter.end();
            Ok(())
        }
        Err(err) => {
            reporter.error(&err.to_string());
            reporter.end();
            Err(err)
        }
    }
}

async fn pipeline<P, L, Fut, R>(
    session: &mut Option<P>,
    launcher: L,
    opts: &AuditOptions,
    stage: &StageTracker,
    reporter: &mut R,
) -> Result<Vec<RawMessage>>
where
    P: PageBackend,
    L: FnOnce() -> Fut,
    Fut: Future<Output = Result<P>>,
    R: Reporter,
{
    stage.enter(Stage::Open);
    // The handle lives in the caller's slot so it survives deadline
    // cancellation of this future and can still be closed.
    let page: &P = session.insert(launcher().await?);

    stage.enter(Stage::Navigate);
    reporter.log("Loading page...");
    page.navigate(&opts.url).await?;

    stage.enter(Stage::Expose);
    page.evaluate(script::PAGE_SETUP).await?;

    stage.enter(Stage::InjectSniffer);
    reporter.log("Loading HTML CodeSniffer...");
    page.evaluate(script::INJECT_SNIFFER).await?;
    poll::wait_until(POLL_INTERVAL, move || async move {
        let ready = page.evaluate(script::SNIFFER_READY).await?;
        Ok(ready.as_bool().unwrap_or(false))
    })
    .await?;

    stage.enter(Stage::RunSniffer);
    reporter.log("Running HTML CodeSniffer...");
    page.evaluate(script::RUN_SNIFFER).await?;
    poll::wait_until(POLL_INTERVAL, move || async move {
        let complete = page.evaluate(script::SNIFF_COMPLETE).await?;
        Ok(complete.as_bool().unwrap_or(false))
    })
    .await?;

    stage.enter(Stage::Collect);
    let value = page.evaluate(script::COLLECT_MESSAGES).await?;
    debug!(target = "a11y", "collected sniffer output");
    serde_json::from_value(value)
        .map_err(|err| AuditError::Eval(format!("unreadable sniffer output: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_round_trips_through_strings() {
        for standard in [
            Standard::Section508,
            Standard::WCAG2A,
            Standard::WCAG2AA,
            Standard::WCAG2AAA,
        ] {
            assert_eq!(standard.to_string().parse::<Standard>(), Ok(standard));
        }
    }

    #[test]
    fn standard_parse_is_case_insensitive() {
        assert_eq!("wcag2aaa".parse::<Standard>(), Ok(Standard::WCAG2AAA));
        assert!("wcag3".parse::<Standard>().is_err());
    }

    #[test]
    fn options_default_to_wcag2aa_and_standard_deadline() {
        let opts = AuditOptions::new("http://example.com/");
        assert_eq!(opts.standard, Standard::WCAG2AA);
        assert_eq!(opts.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }
}
