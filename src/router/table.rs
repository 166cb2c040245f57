//! Route table and the builder that fills it.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use log::debug;

use crate::config::RouterOptions;
use crate::error::{BoxError, Error};
use crate::method::Method;
use crate::pattern::{compile, extract_params, CompiledPattern, PathPattern};
use crate::router::handler::{handler_fn, pass_through, Binding, HandlerFn, Next};
use crate::router::{Context, Router};

/// Handlers declared for one path, keyed by method.
#[derive(Debug, Clone, Default)]
pub struct RouteEntry {
    bindings: HashMap<Method, Binding>,
}

impl RouteEntry {
    /// The binding declared for exactly this method.
    pub fn get(&self, method: Method) -> Option<&Binding> {
        self.bindings.get(&method)
    }

    /// Declared methods, in [`Method::METHODS`] order.
    pub fn methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.bindings.keys().copied().collect();
        methods.sort();
        methods
    }

    /// The exact-method binding, else the `ALL` binding.
    ///
    /// `None` as the requested method stands for a method no route can be
    /// declared for; only `ALL` answers it.
    pub fn resolve(&self, method: Option<Method>) -> Option<(Method, &Binding)> {
        method
            .and_then(|m| self.bindings.get(&m).map(|binding| (m, binding)))
            .or_else(|| self.bindings.get(&Method::ALL).map(|binding| (Method::ALL, binding)))
    }

    fn insert(&mut self, method: Method, binding: Binding) {
        self.bindings.insert(method, binding);
    }
}

/// Compiled patterns mapped to their route entries, in declaration order.
///
/// A table is only produced by [`RouteTable::build`] and has no mutating API
/// afterwards, so it can be shared between concurrent dispatches without
/// locking.
pub struct RouteTable {
    pub(crate) routes: Vec<(CompiledPattern, RouteEntry)>,
    index: HashMap<String, usize>,
    pub(crate) fallback: HandlerFn,
}

impl RouteTable {
    /// Run `builder` once against a fresh [`RouteBuilder`] and freeze the result.
    pub fn build<F>(options: RouterOptions, builder: F) -> Result<Self, Error>
    where
        F: FnOnce(&mut RouteBuilder) -> Result<(), Error>,
    {
        let mut routes = RouteBuilder {
            options,
            table: RouteTable::empty(),
        };
        builder(&mut routes)?;
        Ok(routes.table)
    }

    fn empty() -> Self {
        Self {
            routes: Vec::new(),
            index: HashMap::new(),
            fallback: pass_through(),
        }
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The entry registered for a pattern.
    pub fn get(&self, pattern: &CompiledPattern) -> Option<&RouteEntry> {
        self.index
            .get(pattern.source())
            .map(|&position| &self.routes[position].1)
    }

    /// Iterate over patterns and entries in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = (&CompiledPattern, &RouteEntry)> {
        self.routes.iter().map(|(pattern, entry)| (pattern, entry))
    }

    fn entry_mut(&mut self, pattern: CompiledPattern) -> &mut RouteEntry {
        let position = match self.index.get(pattern.source()) {
            Some(&position) => position,
            None => {
                self.index.insert(pattern.source().to_string(), self.routes.len());
                self.routes.push((pattern, RouteEntry::default()));
                self.routes.len() - 1
            }
        };
        &mut self.routes[position].1
    }

    // Nested entries replace an existing entry whole, in place.
    fn merge(&mut self, child: RouteTable) {
        for (pattern, entry) in child.routes {
            *self.entry_mut(pattern) = entry;
        }
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.routes
                    .iter()
                    .map(|(pattern, entry)| (pattern.source(), entry.methods())),
            )
            .finish()
    }
}

/// The surface a router's builder closure declares routes on.
pub struct RouteBuilder {
    options: RouterOptions,
    table: RouteTable,
}

impl RouteBuilder {
    /// Options every declaration on this builder is compiled with.
    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Declare a route for `method`.
    ///
    /// Declaring a path that compiles to an already known pattern adds the
    /// method to that entry, replacing an earlier binding for the same method.
    pub fn route<H, Fut>(
        &mut self,
        method: Method,
        path: impl Into<PathPattern>,
        handler: H,
    ) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        self.route_fn(method, path, handler_fn(handler))
    }

    /// Declare a route for a method given by name, matched case-insensitively.
    pub fn route_named<H, Fut>(
        &mut self,
        method: &str,
        path: impl Into<PathPattern>,
        handler: H,
    ) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        let method = method.parse()?;
        self.route(method, path, handler)
    }

    /// Declare a route with an already boxed handler.
    pub fn route_fn(
        &mut self,
        method: Method,
        path: impl Into<PathPattern>,
        handler: HandlerFn,
    ) -> Result<&mut Self, Error> {
        let path = path.into();
        let pattern = compile(&path, &self.options)?;
        let params = extract_params(&path, &self.options)?;

        debug!("Registering {method} {pattern}");
        self.table
            .entry_mut(pattern)
            .insert(method, Binding::new(handler, params));
        Ok(self)
    }

    pub fn get<H, Fut>(&mut self, path: impl Into<PathPattern>, handler: H) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        self.route(Method::GET, path, handler)
    }

    pub fn post<H, Fut>(&mut self, path: impl Into<PathPattern>, handler: H) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        self.route(Method::POST, path, handler)
    }

    pub fn put<H, Fut>(&mut self, path: impl Into<PathPattern>, handler: H) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        self.route(Method::PUT, path, handler)
    }

    pub fn patch<H, Fut>(&mut self, path: impl Into<PathPattern>, handler: H) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        self.route(Method::PATCH, path, handler)
    }

    pub fn delete<H, Fut>(&mut self, path: impl Into<PathPattern>, handler: H) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        self.route(Method::DELETE, path, handler)
    }

    /// Declare a fallback for every method without its own binding on `path`.
    pub fn all<H, Fut>(&mut self, path: impl Into<PathPattern>, handler: H) -> Result<&mut Self, Error>
    where
        H: Fn(Context, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Context, BoxError>> + Send + 'static,
    {
        self.route(Method::ALL, path, handler)
    }

    /// Mount a child router under this builder's prefix.
    ///
    /// The child is rebuilt with `self prefix + child prefix` and its entries
    /// are copied in. An entry for a pattern that is already present replaces
    /// it, the same way a later declaration does.
    pub fn nest(&mut self, child: &Router) -> Result<&mut Self, Error> {
        let nested = child.nested_factory(&self.options.prefix)?;
        debug!(
            "Nesting {count} route(s) under {prefix:?}",
            count = nested.len(),
            prefix = self.options.prefix
        );
        self.table.merge(nested);
        Ok(self)
    }
}

impl fmt::Debug for RouteBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBuilder")
            .field("options", &self.options)
            .field("table", &self.table)
            .finish()
    }
}
