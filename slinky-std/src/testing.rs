//! Testing utilities for Slinky.
//!
//! This module provides doubles that make testing chains, handlers and
//! monitors easier.
//!
//! # Features
//!
//! - [`RecordingHandler`]: A handler that records the ids of items it acts on
//! - [`CountingHandler`]: A handler that counts invocations
//! - [`FailingHandler`]: A handler that always errors (or panics)
//! - [`CountingRule`]: A rule with a fixed verdict that counts evaluations
//! - [`ErrorRule`]: A rule that always fails to evaluate

use slinky_core::{BoxError, Handler, Item, Rule, Verdict};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

type Callback = Arc<dyn Fn(usize, &Item) + Send + Sync>;

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records the ids of all items it acts on.
///
/// Clones share the same record, so keep one clone for assertions.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new("recorder");
/// registry.register(recorder.clone());
///
/// registry.dispatch(&item).await;
/// assert_eq!(recorder.ids(), vec!["abc"]);
/// ```
#[derive(Clone)]
pub struct RecordingHandler {
    name: String,
    ids: Arc<Mutex<Vec<String>>>,
    on_call: Option<Callback>,
}

impl RecordingHandler {
    /// Create a new recording handler.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ids: Arc::new(Mutex::new(Vec::new())),
            on_call: None,
        }
    }

    /// Runs `callback` after each recorded item with the 1-based call number.
    pub fn on_call<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, &Item) + Send + Sync + 'static,
    {
        self.on_call = Some(Arc::new(callback));
        self
    }

    /// Get a clone of the recorded ids.
    pub fn ids(&self) -> Vec<String> {
        self.ids.lock().unwrap().clone()
    }

    /// Get the number of recorded items.
    pub fn count(&self) -> usize {
        self.ids.lock().unwrap().len()
    }

    /// Clear all recorded items.
    pub fn clear(&self) {
        self.ids.lock().unwrap().clear();
    }
}

impl Handler for RecordingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    async fn act(&self, item: &Item) -> Result<(), BoxError> {
        let call = {
            let mut ids = self.ids.lock().unwrap();
            ids.push(item.id().to_string());
            ids.len()
        };
        if let Some(callback) = &self.on_call {
            callback(call, item);
        }
        Ok(())
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Handler for CountingHandler {
    fn name(&self) -> &str {
        "counting"
    }

    async fn act(&self, _item: &Item) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler that fails every time it acts.
#[derive(Clone)]
pub struct FailingHandler {
    panics: bool,
    attempts: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// A handler returning an error.
    pub fn new() -> Self {
        Self {
            panics: false,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A handler that panics instead of returning.
    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::new()
        }
    }

    /// How many times the action was attempted.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Default for FailingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for FailingHandler {
    fn name(&self) -> &str {
        "failing"
    }

    async fn act(&self, item: &Item) -> Result<(), BoxError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.panics {
            panic!("intentional panic on {}", item.id());
        }
        Err(format!("intentional failure on {}", item.id()).into())
    }
}

// ============================================================================
// Rules
// ============================================================================

/// A rule with a fixed verdict that counts how often it was evaluated.
#[derive(Clone)]
pub struct CountingRule {
    name: String,
    verdict: Verdict,
    evaluations: Arc<AtomicUsize>,
}

impl CountingRule {
    /// A rule that always passes items.
    pub fn passing(name: impl Into<String>) -> Self {
        Self::with_verdict(name, Verdict::Pass)
    }

    /// A rule that always blocks items.
    pub fn blocking(name: impl Into<String>) -> Self {
        Self::with_verdict(name, Verdict::Block)
    }

    fn with_verdict(name: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            name: name.into(),
            verdict,
            evaluations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

impl Rule for CountingRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, _item: &Item) -> Result<Verdict, BoxError> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        Ok(self.verdict)
    }
}

/// A rule that always fails to evaluate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorRule;

impl Rule for ErrorRule {
    fn name(&self) -> &str {
        "error"
    }

    fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError> {
        Err(format!("cannot evaluate {}", item.id()).into())
    }
}
