//! Fake page backend for testing the audit pipeline without browsers.
//!
//! Behavior is scripted up front through [`FakePageBuilder`]; the fake
//! records every lifecycle call so tests can assert on stage ordering and
//! on exactly-once resource release.
//!
//! # Example
//!
//! ```ignore
//! let page = FakePage::builder()
//!     .sniffer_ready_after(3)
//!     .complete_after(2)
//!     .messages(json!([{"type": 1, "code": "X", "msg": "m"}]))
//!     .build();
//! let probe = page.clone();
//! run_audit_with(move || async move { Ok(page) }, opts, &mut reporter).await?;
//! assert_eq!(probe.close_calls(), 1);
//! ```

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AuditError, Result};
use crate::script;

use super::PageBackend;

/// Builder scripting a [`FakePage`]'s behavior.
pub struct FakePageBuilder {
    navigation_fails: bool,
    navigate_delay: Option<Duration>,
    ready_after: Option<usize>,
    complete_after: Option<usize>,
    messages: Value,
}

impl FakePageBuilder {
    /// Navigation reports a load failure.
    pub fn navigation_fails(mut self) -> Self {
        self.navigation_fails = true;
        self
    }

    /// Navigation succeeds only after `delay` has elapsed.
    pub fn navigate_delay(mut self, delay: Duration) -> Self {
        self.navigate_delay = Some(delay);
        self
    }

    /// The sniffer entry point appears after `probes` readiness probes
    /// have returned false.
    pub fn sniffer_ready_after(mut self, probes: usize) -> Self {
        self.ready_after = Some(probes);
        self
    }

    /// The sniffer entry point never appears.
    pub fn sniffer_never_ready(mut self) -> Self {
        self.ready_after = None;
        self
    }

    /// The completion flag flips after `probes` probes have returned false.
    pub fn complete_after(mut self, probes: usize) -> Self {
        self.complete_after = Some(probes);
        self
    }

    /// The completion flag never flips.
    pub fn never_completes(mut self) -> Self {
        self.complete_after = None;
        self
    }

    /// Raw records returned by the collect stage.
    pub fn messages(mut self, messages: Value) -> Self {
        self.messages = messages;
        self
    }

    pub fn build(self) -> FakePage {
        FakePage {
            state: Arc::new(FakeState {
                navigation_fails: self.navigation_fails,
                navigate_delay: self.navigate_delay,
                ready_after: self.ready_after,
                complete_after: self.complete_after,
                messages: self.messages,
                calls: Mutex::new(Vec::new()),
                ready_probes: AtomicUsize::new(0),
                complete_probes: AtomicUsize::new(0),
                close_calls: AtomicUsize::new(0),
            }),
        }
    }
}

struct FakeState {
    navigation_fails: bool,
    navigate_delay: Option<Duration>,
    ready_after: Option<usize>,
    complete_after: Option<usize>,
    messages: Value,
    calls: Mutex<Vec<String>>,
    ready_probes: AtomicUsize,
    complete_probes: AtomicUsize,
    close_calls: AtomicUsize,
}

/// Scripted in-memory [`PageBackend`]. Clones share the same state, so a
/// test can keep a probe handle while the pipeline consumes the original.
#[derive(Clone)]
pub struct FakePage {
    state: Arc<FakeState>,
}

impl FakePage {
    /// Starts a builder whose defaults succeed immediately: navigation
    /// works, the sniffer is ready on the first probe, completes on the
    /// first probe, and yields no findings.
    pub fn builder() -> FakePageBuilder {
        FakePageBuilder {
            navigation_fails: false,
            navigate_delay: None,
            ready_after: Some(0),
            complete_after: Some(0),
            messages: Value::Array(Vec::new()),
        }
    }

    /// Lifecycle calls observed so far, in order. Poll probes are counted
    /// separately to keep the log readable.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().expect("calls lock").clone()
    }

    pub fn ready_probes(&self) -> usize {
        self.state.ready_probes.load(Ordering::SeqCst)
    }

    pub fn complete_probes(&self) -> usize {
        self.state.complete_probes.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.state.close_calls.load(Ordering::SeqCst)
    }

    fn record(&self, call: &str) {
        self.state
            .calls
            .lock()
            .expect("calls lock")
            .push(call.to_string());
    }
}

#[async_trait]
impl PageBackend for FakePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record("navigate");
        if let Some(delay) = self.state.navigate_delay {
            tokio::time::sleep(delay).await;
        }
        if self.state.navigation_fails {
            return Err(AuditError::Navigation {
                url: url.to_string(),
            });
        }
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value> {
        match expression {
            script::PAGE_SETUP => {
                self.record("evaluate:setup");
                Ok(Value::Bool(true))
            }
            script::INJECT_SNIFFER => {
                self.record("evaluate:inject");
                Ok(Value::Bool(true))
            }
            script::SNIFFER_READY => {
                let probe = self.state.ready_probes.fetch_add(1, Ordering::SeqCst);
                let ready = self.state.ready_after.is_some_and(|after| probe >= after);
                Ok(Value::Bool(ready))
            }
            script::RUN_SNIFFER => {
                self.record("evaluate:run");
                Ok(Value::Bool(true))
            }
            script::SNIFF_COMPLETE => {
                let probe = self.state.complete_probes.fetch_add(1, Ordering::SeqCst);
                let complete = self.state.complete_after.is_some_and(|after| probe >= after);
                Ok(Value::Bool(complete))
            }
            script::COLLECT_MESSAGES => {
                self.record("evaluate:collect");
                Ok(self.state.messages.clone())
            }
            _ => {
                self.record("evaluate:other");
                Ok(Value::Null)
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.record("close");
        self.state.close_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
