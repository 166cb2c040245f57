//! The router: a frozen route table usable as middleware or as a nested child.

use std::fmt;
use std::sync::Arc;

use log::info;

use crate::config::RouterOptions;
use crate::error::Error;
use crate::pattern::parse_prefix;
use crate::router::dispatch::Dispatch;
use crate::router::handler::{HandlerFn, HandlerFuture, Next};
use crate::router::table::{RouteBuilder, RouteTable};
use crate::router::Context;

type BuilderFn = dyn Fn(&mut RouteBuilder) -> Result<(), Error> + Send + Sync;

/// A router built once from a builder closure.
///
/// Cloning is cheap and clones share the same table.
#[derive(Clone)]
pub struct Router {
    options: RouterOptions,
    builder: Arc<BuilderFn>,
    table: Arc<RouteTable>,
}

impl Router {
    /// Build a router.
    ///
    /// `options` is a [`RouterOptions`] or a bare prefix string. The builder
    /// runs once here; it runs again only when the router is nested into
    /// another one, to compile the routes under the parent prefix.
    pub fn new<O, F>(options: O, builder: F) -> Result<Self, Error>
    where
        O: Into<RouterOptions>,
        F: Fn(&mut RouteBuilder) -> Result<(), Error> + Send + Sync + 'static,
    {
        let options = options.into();
        parse_prefix(&options.prefix)?;
        let builder: Arc<BuilderFn> = Arc::new(builder);
        let table = RouteTable::build(options.clone(), |routes| builder(routes))?;

        Ok(Self {
            options,
            builder,
            table: Arc::new(table),
        })
    }

    /// Build a router with default options.
    pub fn with_defaults<F>(builder: F) -> Result<Self, Error>
    where
        F: Fn(&mut RouteBuilder) -> Result<(), Error> + Send + Sync + 'static,
    {
        Self::new(RouterOptions::default(), builder)
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Select the handler for a path and method. See [`RouteTable::dispatch`].
    pub fn dispatch(&self, path: &str, method: &str) -> Dispatch {
        self.table.dispatch(path, method)
    }

    /// Route one request.
    ///
    /// The extracted parameters are stored in `ctx.request.params` before the
    /// selected handler is called with `ctx` and `next`. The handler's future
    /// is returned without being polled.
    pub fn as_middleware(&self, mut ctx: Context, next: Next) -> HandlerFuture {
        let (handler, params) = self
            .table
            .dispatch(ctx.request.path(), &ctx.request.method)
            .into_parts();
        ctx.request.params = params;
        handler(ctx, next)
    }

    /// This router as a boxed handler, for use in a middleware chain.
    pub fn middleware(&self) -> HandlerFn {
        let router = self.clone();
        Arc::new(move |ctx: Context, next: Next| router.as_middleware(ctx, next))
    }

    /// Build a fresh table with `prefix` in front of this router's own prefix.
    pub fn nested_factory(&self, prefix: &str) -> Result<RouteTable, Error> {
        parse_prefix(prefix)?;
        let options = self.options.nested_under(prefix);
        RouteTable::build(options, |routes| (self.builder)(routes))
    }

    /// Log every registered pattern and its methods.
    pub fn log_routes(&self) {
        info!("Registered routes:");
        for (pattern, entry) in self.table.routes() {
            let methods = entry
                .methods()
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<String>>()
                .join(", ");
            info!("  {methods} {pattern}");
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
