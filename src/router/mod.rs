//! Router module.
//!
//! This module builds route tables from a builder closure, composes nested
//! routers, and dispatches requests to the declared handlers.

mod context;
mod dispatch;
mod handler;
mod http_router;
mod table;
mod tests;

// Re-export public items
pub use context::{Context, ParamBag, Request, Response};
pub use dispatch::Dispatch;
pub use handler::{handler_fn, pass_through, Binding, HandlerFn, HandlerFuture, Next};
pub use http_router::Router;
pub use table::{RouteBuilder, RouteEntry, RouteTable};
