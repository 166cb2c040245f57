//! A small path router for async middleware pipelines.
//!
//! Routes are declared once, in a builder closure, as path templates such as
//! `/users/:id` bound to per-method handlers. The router compiles every
//! template into a matcher, merges nested routers under their prefixes, and
//! at request time picks the handler for a `(path, method)` pair and hands it
//! the named path parameters.
//!
//! # Features
//!
//! - Literal and `:name` parameter segments, with prefixes for whole routers
//! - Prefix-style or end-anchored matching, case-insensitive by default
//! - `GET`, `POST`, `PUT`, `PATCH`, `DELETE` and an `ALL` fallback per path
//! - Nested routers composed under the parent prefix
//! - Native [`regex::Regex`] patterns with named captures as parameters
//! - Unmatched requests fall through to the next middleware stage
//! - All configuration errors are reported when the router is built
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```
//! use microroute_rs::{Context, Next, Router};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let router = Router::with_defaults(|r| {
//!     r.get("/user/:id", |mut ctx: Context, _next: Next| async move {
//!         ctx.response.body = ctx.request.param("id").map(str::to_string);
//!         Ok(ctx)
//!     })?;
//!     Ok(())
//! })?;
//!
//! let ctx = router.as_middleware(Context::new("GET", "/user/7f3a"), Next::end()).await?;
//! assert_eq!(ctx.response.body.as_deref(), Some("7f3a"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Nesting
//!
//! ```
//! use microroute_rs::{Router, RouterOptions};
//!
//! # fn main() -> Result<(), microroute_rs::Error> {
//! let api = Router::new("/api", |r| {
//!     r.get("/items/:item", |ctx, _next| async move { Ok(ctx) })?;
//!     Ok(())
//! })?;
//!
//! let app = Router::new(RouterOptions::new().with_end(true), move |r| {
//!     r.nest(&api)?;
//!     Ok(())
//! })?;
//!
//! let dispatch = app.dispatch("/api/items/42", "get");
//! assert_eq!(dispatch.params().get("item"), Some("42"));
//! assert!(app.dispatch("/items/42", "GET").is_pass_through());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! ```
//! use microroute_rs::{Error, Router};
//!
//! let result = Router::with_defaults(|r| {
//!     r.get("/files//:name", |ctx, _next| async move { Ok(ctx) })?;
//!     Ok(())
//! });
//!
//! match result {
//!     Err(Error::InvalidPath(path)) => println!("Invalid path: {path}"),
//!     Err(err) => println!("Other error: {err}"),
//!     Ok(_) => println!("Router built"),
//! }
//! ```

pub mod config;
pub mod error;
pub mod method;
pub mod pattern;
pub mod router;

// Re-export commonly used items for convenience
pub use config::RouterOptions;
pub use error::{BoxError, Error};
pub use method::Method;
pub use pattern::{CompiledPattern, ParamMap, PathPattern};
pub use router::{Context, Dispatch, HandlerFn, HandlerFuture, Next, ParamBag, RouteBuilder, RouteTable, Router};
