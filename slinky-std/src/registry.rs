//! Ordered handler registry.
//!
//! Handlers run one after another, in registration order, each inside its
//! own fault boundary: an error or panic in one handler is logged and
//! counted, and the next handler still sees the item.

use futures::FutureExt;
use slinky_core::{FilteredHandler, Handled, Handler, HandlerError, Item};
use std::panic::AssertUnwindSafe;

/// Summary of one item's trip through the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers whose action ran successfully.
    pub acted: usize,
    /// Handlers whose own chain blocked the item.
    pub blocked: usize,
    /// Handlers that failed, panicked or timed out.
    pub failed: usize,
}

impl DispatchReport {
    /// Whether every handler either acted or declined cleanly.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// A registry of handlers dispatched sequentially.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: Vec<FilteredHandler>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler with a pass-all chain.
    pub fn register<H: Handler>(&mut self, handler: H) {
        self.handlers.push(FilteredHandler::new(handler));
    }

    /// Appends a handler that already carries its own chain.
    pub fn register_filtered(&mut self, handler: FilteredHandler) {
        self.handlers.push(handler);
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered handlers in dispatch order.
    pub fn handlers(&self) -> impl Iterator<Item = &FilteredHandler> {
        self.handlers.iter()
    }

    /// Dispatch an item to all registered handlers sequentially.
    pub async fn dispatch(&self, item: &Item) -> DispatchReport {
        let mut report = DispatchReport::default();

        for handler in &self.handlers {
            let outcome = AssertUnwindSafe(handler.handle(item))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(HandlerError::Panicked {
                        handler: handler.name().to_string(),
                        message: panic_message(payload.as_ref()),
                    })
                });

            match outcome {
                Ok(Handled::Acted) => report.acted += 1,
                Ok(Handled::Blocked) => report.blocked += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::error!(
                        handler = handler.name(),
                        item = item.id(),
                        error = %err,
                        "handler failed, continuing with the next one"
                    );
                }
            }
        }

        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Builder for constructing a [`HandlerRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: HandlerRegistry,
}

impl RegistryBuilder {
    /// Create a new empty registry builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    pub fn register<H: Handler>(mut self, handler: H) -> Self {
        self.registry.register(handler);
        self
    }

    /// Register a handler with its own chain.
    pub fn register_filtered(mut self, handler: FilteredHandler) -> Self {
        self.registry.register_filtered(handler);
        self
    }

    /// Build the registry.
    pub fn build(self) -> HandlerRegistry {
        self.registry
    }
}
