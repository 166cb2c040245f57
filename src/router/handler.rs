//! Route handlers and the middleware continuation.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::BoxError;
use crate::pattern::ParamMap;
use crate::router::Context;

/// Type alias for a boxed future that returns the context once a stage is done.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Context, BoxError>> + Send>>;

/// Type alias for a handler function that takes a context and the next stage.
pub type HandlerFn = Arc<dyn Fn(Context, Next) -> HandlerFuture + Send + Sync>;

type NextFn = Box<dyn FnOnce(Context) -> HandlerFuture + Send>;

/// The rest of the middleware chain after the current handler.
///
/// A handler yields control onward by calling [`Next::run`]; not calling it
/// ends the chain at that handler.
pub struct Next {
    inner: Option<NextFn>,
}

impl Next {
    /// Wrap a downstream stage.
    pub fn new<F, Fut>(stage: F) -> Self
    where
        F: FnOnce(Context) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        Self {
            inner: Some(Box::new(move |ctx: Context| -> HandlerFuture {
                Box::pin(stage(ctx))
            })),
        }
    }

    /// A continuation with nothing downstream: running it returns the context.
    pub fn end() -> Self {
        Self { inner: None }
    }

    /// Run the downstream stage.
    pub fn run(self, ctx: Context) -> HandlerFuture {
        match self.inner {
            Some(stage) => stage(ctx),
            None => Box::pin(async move { Ok(ctx) }),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("is_end", &self.inner.is_none())
            .finish()
    }
}

/// Box an async closure into a [`HandlerFn`].
pub fn handler_fn<F, Fut>(handler: F) -> HandlerFn
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
{
    Arc::new(move |ctx: Context, next: Next| -> HandlerFuture { Box::pin(handler(ctx, next)) })
}

/// The handler used when no route or method matches: it only runs `next`.
pub fn pass_through() -> HandlerFn {
    Arc::new(|ctx: Context, next: Next| next.run(ctx))
}

/// A handler together with the parameter positions of the path it was declared on.
#[derive(Clone)]
pub struct Binding {
    handler: HandlerFn,
    params: ParamMap,
}

impl Binding {
    pub fn new(handler: HandlerFn, params: ParamMap) -> Self {
        Self { handler, params }
    }

    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    pub fn params(&self) -> &ParamMap {
        &self.params
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
