//! # Handlers
//!
//! A handler is the reaction point of a monitor: it receives every item the
//! monitor accepted and decides, through its own [`FilterChain`], whether to
//! act on it.
//!
//! # Usage Patterns
//!
//! 1. **Struct implementation**: `impl Handler for MyHandler` with an
//!    `async fn act`.
//! 2. **Type-erased**: store handlers as `Arc<dyn DynHandler>` when the set
//!    is assembled at runtime (this is what registries do).
//! 3. **Filtered**: wrap any handler in a [`FilteredHandler`] to give it a
//!    private rule chain on top of the monitor's chain.

use crate::{
    error::{BoxError, HandlerError},
    filter::FilterChain,
    item::Item,
};
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// What a [`FilteredHandler`] did with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// The handler's chain let the item through and the action ran.
    Acted,
    /// The handler's chain blocked the item; the action was not invoked.
    Blocked,
}

/// A reaction to accepted items.
///
/// Implementors override [`act`](Handler::act). The provided `act` fails
/// with [`HandlerError::NotImplemented`]: reaching it means a handler was
/// registered without ever being specialized.
///
/// This trait uses native `async fn` for static dispatch. For collections
/// use [`DynHandler`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Handler`",
    label = "missing `Handler` implementation",
    note = "Handlers must implement `act` to react to items."
)]
pub trait Handler: Send + Sync + 'static {
    /// A short name used in logs. Defaults to the type name.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Reacts to an item.
    fn act(&self, item: &Item) -> impl Future<Output = Result<(), BoxError>> + Send {
        let _ = item;
        let err: BoxError = Box::new(HandlerError::NotImplemented(self.name().to_string()));
        std::future::ready(Err(err))
    }
}

/// Dynamic object-safe version of [`Handler`].
pub trait DynHandler: Send + Sync + 'static {
    /// The handler's name (dynamic dispatch version).
    fn name_dyn(&self) -> &str;

    /// Reacts to an item (dynamic dispatch version).
    fn act_dyn<'a>(
        &'a self,
        item: &'a Item,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>>;
}

// Blanket implementation: every Handler is a DynHandler.
impl<T: Handler> DynHandler for T {
    fn name_dyn(&self) -> &str {
        self.name()
    }

    fn act_dyn<'a>(
        &'a self,
        item: &'a Item,
    ) -> Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send + 'a>> {
        Box::pin(self.act(item))
    }
}

// Allow a shared type-erased handler to be used where Handler is expected.
impl Handler for Arc<dyn DynHandler> {
    fn name(&self) -> &str {
        (**self).name_dyn()
    }

    async fn act(&self, item: &Item) -> Result<(), BoxError> {
        (**self).act_dyn(item).await
    }
}

/// A handler paired with its own filter chain.
///
/// The chain defaults to an empty (pass-all) chain.
pub struct FilteredHandler {
    filter: FilterChain,
    handler: Arc<dyn DynHandler>,
}

impl FilteredHandler {
    /// Wraps a handler with a pass-all chain.
    pub fn new<H: Handler>(handler: H) -> Self {
        Self::from_shared(Arc::new(handler))
    }

    /// Wraps an already shared handler.
    pub fn from_shared(handler: Arc<dyn DynHandler>) -> Self {
        Self {
            filter: FilterChain::default(),
            handler,
        }
    }

    /// The wrapped handler's name.
    pub fn name(&self) -> &str {
        self.handler.name_dyn()
    }

    /// The handler's own chain.
    pub fn filter(&self) -> &FilterChain {
        &self.filter
    }

    /// Mutable access to the handler's own chain.
    pub fn filter_mut(&mut self) -> &mut FilterChain {
        &mut self.filter
    }

    /// Replaces the handler's chain.
    ///
    /// `None` is silently ignored and the current chain is kept.
    pub fn set_filter(&mut self, filter: impl Into<Option<FilterChain>>) {
        if let Some(filter) = filter.into() {
            self.filter = filter;
        }
    }

    /// Builder-style [`set_filter`](Self::set_filter).
    pub fn with_filter(mut self, filter: FilterChain) -> Self {
        self.set_filter(filter);
        self
    }

    /// Runs the action unless the handler's own chain blocks the item.
    pub async fn handle(&self, item: &Item) -> Result<Handled, HandlerError> {
        if self.filter.test(item)? {
            return Ok(Handled::Blocked);
        }

        self.handler
            .act_dyn(item)
            .await
            .map_err(|source| HandlerError::action(self.name(), source))?;
        Ok(Handled::Acted)
    }
}

impl fmt::Debug for FilteredHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredHandler")
            .field("handler", &self.name())
            .field("filter", &self.filter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        item::{Comment, Submission},
        rule::{Rule, Verdict},
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Unspecialized;

    impl Handler for Unspecialized {
        fn name(&self) -> &str {
            "unspecialized"
        }
    }

    #[derive(Default)]
    struct Counter {
        calls: Arc<AtomicUsize>,
    }

    impl Handler for Counter {
        async fn act(&self, _item: &Item) -> Result<(), BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct BlockComments;

    impl Rule for BlockComments {
        fn name(&self) -> &str {
            "block-comments"
        }

        fn evaluate(&self, item: &Item) -> Result<Verdict, BoxError> {
            Ok(item.as_comment().is_some().into())
        }
    }

    fn submission() -> Item {
        Submission {
            id: "s1".into(),
            ..Default::default()
        }
        .into()
    }

    fn comment() -> Item {
        Comment {
            id: "c1".into(),
            ..Default::default()
        }
        .into()
    }

    #[tokio::test]
    async fn base_action_is_not_implemented() {
        let handler = FilteredHandler::new(Unspecialized);
        let err = handler.handle(&submission()).await.unwrap_err();
        assert!(matches!(err, HandlerError::NotImplemented(name) if name == "unspecialized"));
    }

    #[tokio::test]
    async fn own_chain_blocks_action() {
        let counter = Counter::default();
        let calls = counter.calls.clone();
        let handler = FilteredHandler::new(counter)
            .with_filter(FilterChain::new("own").with_rule(Arc::new(BlockComments)));

        assert_eq!(handler.handle(&comment()).await.unwrap(), Handled::Blocked);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(handler.handle(&submission()).await.unwrap(), Handled::Acted);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn set_filter_ignores_none() {
        let mut handler = FilteredHandler::new(Counter::default());
        handler.set_filter(FilterChain::new("kept").with_rule(Arc::new(BlockComments)));
        handler.set_filter(None);

        assert_eq!(handler.filter().name(), "kept");
        assert_eq!(handler.handle(&comment()).await.unwrap(), Handled::Blocked);
    }

    #[tokio::test]
    async fn shared_handler_keeps_its_name() {
        let shared: Arc<dyn DynHandler> = Arc::new(Unspecialized);
        let handler = FilteredHandler::new(shared);
        assert_eq!(handler.name(), "unspecialized");
    }
}
