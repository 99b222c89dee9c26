//! Pipeline behavior over a scripted fake backend: stage ordering,
//! deadline classification, and exactly-once resource release.

use std::time::Duration;

use serde_json::json;

use a11y_core::session::fake::FakePage;
use a11y_core::{AuditError, AuditOptions, Message, MessageType, Reporter, run_audit_with};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Begin,
    Log(String),
    Error(String),
    Result(Vec<Message>),
    End,
}

#[derive(Default)]
struct RecordingReporter {
    events: Vec<Event>,
}

impl RecordingReporter {
    fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    fn results(&self) -> Vec<&Vec<Message>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Result(messages) => Some(messages),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn begin(&mut self) {
        self.events.push(Event::Begin);
    }

    fn log(&mut self, message: &str) {
        self.events.push(Event::Log(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.events.push(Event::Error(message.to_string()));
    }

    fn handle_result(&mut self, messages: Vec<Message>) {
        self.events.push(Event::Result(messages));
    }

    fn end(&mut self) {
        self.events.push(Event::End);
    }
}

fn opts(timeout: Duration) -> AuditOptions {
    let mut options = AuditOptions::new("http://example.com/?__a11y_standard=WCAG2AA");
    options.timeout = timeout;
    options
}

async fn run(page: FakePage, timeout: Duration) -> (Result<(), AuditError>, RecordingReporter) {
    let mut reporter = RecordingReporter::default();
    let outcome = run_audit_with(
        move || async move { Ok(page) },
        opts(timeout),
        &mut reporter,
    )
    .await;
    (outcome, reporter)
}

#[tokio::test(start_paused = true)]
async fn successful_run_observes_every_stage_once_in_order() {
    let page = FakePage::builder()
        .sniffer_ready_after(3)
        .complete_after(2)
        .messages(json!([
            {"type": 1, "code": "E.1", "msg": "missing alt text"},
            {"type": 3, "code": "N.1", "msg": "check contrast"},
        ]))
        .build();
    let probe = page.clone();

    let (outcome, reporter) = run(page, Duration::from_secs(30)).await;

    outcome.expect("audit should succeed");
    assert_eq!(
        probe.calls(),
        vec![
            "navigate",
            "evaluate:setup",
            "evaluate:inject",
            "evaluate:run",
            "evaluate:collect",
            "close",
        ],
    );
    // Ready on the fourth probe, complete on the third.
    assert_eq!(probe.ready_probes(), 4);
    assert_eq!(probe.complete_probes(), 3);
    assert_eq!(probe.close_calls(), 1);

    assert_eq!(reporter.events[0], Event::Begin);
    assert_eq!(*reporter.events.last().expect("events"), Event::End);
    assert!(reporter.errors().is_empty());

    let results = reporter.results();
    assert_eq!(results.len(), 1);
    let messages = results[0];
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message_type, MessageType::Error);
    assert_eq!(messages[0].code, "E.1");
    assert_eq!(messages[0].message, "missing alt text");
    assert_eq!(messages[1].message_type, MessageType::Notice);
    assert_eq!(messages[1].code, "N.1");
}

#[tokio::test(start_paused = true)]
async fn navigation_failure_reports_and_releases() {
    let page = FakePage::builder().navigation_fails().build();
    let probe = page.clone();

    let (outcome, reporter) = run(page, Duration::from_secs(30)).await;

    assert!(matches!(outcome, Err(AuditError::Navigation { .. })));
    let errors = reporter.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("URL could not be loaded"));
    assert!(reporter.results().is_empty());
    assert_eq!(probe.close_calls(), 1);
    // Failure short-circuits: nothing past navigate ever ran.
    assert_eq!(probe.calls(), vec!["navigate", "close"]);
}

#[tokio::test(start_paused = true)]
async fn missing_sniffer_entry_point_is_a_script_load_timeout() {
    let page = FakePage::builder().sniffer_never_ready().build();
    let probe = page.clone();

    let (outcome, reporter) = run(page, Duration::from_secs(1)).await;

    assert!(matches!(outcome, Err(AuditError::ScriptLoadTimeout)));
    assert_eq!(reporter.errors().len(), 1);
    assert!(reporter.results().is_empty());
    assert_eq!(probe.close_calls(), 1);
    assert!(probe.ready_probes() > 1, "the poll loop should have spun");
}

#[tokio::test(start_paused = true)]
async fn stalled_sniffer_is_an_execution_timeout() {
    let page = FakePage::builder().never_completes().build();
    let probe = page.clone();

    let (outcome, reporter) = run(page, Duration::from_secs(1)).await;

    assert!(matches!(outcome, Err(AuditError::ExecutionTimeout)));
    assert_eq!(reporter.errors().len(), 1);
    assert!(reporter.results().is_empty());
    assert_eq!(probe.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_during_navigation_reports_one_timeout_and_one_release() {
    let page = FakePage::builder()
        .navigate_delay(Duration::from_secs(60))
        .build();
    let probe = page.clone();

    let (outcome, reporter) = run(page, Duration::from_secs(1)).await;

    assert!(matches!(outcome, Err(AuditError::Timeout { ms: 1000 })));
    // Never both a result and an error, and each terminal action once.
    assert_eq!(reporter.errors().len(), 1);
    assert!(reporter.results().is_empty());
    assert_eq!(probe.close_calls(), 1);
    assert_eq!(
        reporter
            .events
            .iter()
            .filter(|event| matches!(event, Event::End))
            .count(),
        1,
    );
}

#[tokio::test(start_paused = true)]
async fn launch_failure_still_reports_through_the_error_channel() {
    let mut reporter = RecordingReporter::default();

    let outcome = run_audit_with(
        || async { Err::<FakePage, _>(AuditError::Browser("spawn failed".into())) },
        opts(Duration::from_secs(30)),
        &mut reporter,
    )
    .await;

    assert!(matches!(outcome, Err(AuditError::Browser(_))));
    assert_eq!(reporter.errors().len(), 1);
    assert!(reporter.results().is_empty());
    assert_eq!(*reporter.events.last().expect("events"), Event::End);
}
