//! Request-time route selection.

use std::fmt;

use log::{debug, trace, warn};

use crate::method::Method;
use crate::router::handler::HandlerFn;
use crate::router::table::{RouteEntry, RouteTable};
use crate::router::ParamBag;

/// The outcome of dispatching one request against a route table.
pub struct Dispatch {
    handler: HandlerFn,
    params: ParamBag,
    pattern: Option<String>,
    method: Option<Method>,
    ambiguous: bool,
}

impl Dispatch {
    fn pass_through(handler: HandlerFn) -> Self {
        Self {
            handler,
            params: ParamBag::new(),
            pattern: None,
            method: None,
            ambiguous: false,
        }
    }

    /// The handler to invoke.
    pub fn handler(&self) -> &HandlerFn {
        &self.handler
    }

    /// Parameters extracted from the path.
    pub fn params(&self) -> &ParamBag {
        &self.params
    }

    /// Source of the selected pattern, if any pattern matched.
    pub fn matched_pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// The method of the binding that was selected. `None` for the pass-through.
    pub fn resolved_method(&self) -> Option<Method> {
        self.method
    }

    /// Whether the default pass-through binding was selected.
    pub fn is_pass_through(&self) -> bool {
        self.method.is_none()
    }

    /// Whether several patterns matched equally well and declaration order decided.
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    pub fn into_parts(self) -> (HandlerFn, ParamBag) {
        (self.handler, self.params)
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("params", &self.params)
            .field("pattern", &self.pattern)
            .field("method", &self.method)
            .field("ambiguous", &self.ambiguous)
            .finish_non_exhaustive()
    }
}

struct Selection<'a> {
    position: usize,
    entry: &'a RouteEntry,
    ambiguous: bool,
}

impl RouteTable {
    /// Select the handler for `path` and `method` and extract its parameters.
    ///
    /// Never fails: an unmatched path or method yields the pass-through binding
    /// with an empty parameter bag.
    pub fn dispatch(&self, path: &str, method: &str) -> Dispatch {
        let Some(selection) = self.select(path) else {
            trace!("No route matches {path}");
            return Dispatch::pass_through(self.fallback.clone());
        };

        let requested = method.parse::<Method>().ok();
        let Some((resolved, binding)) = selection.entry.resolve(requested) else {
            trace!("No {method} binding for {path}");
            return Dispatch::pass_through(self.fallback.clone());
        };

        let pattern = &self.routes[selection.position].0;
        let segments: Vec<&str> = path.split('/').skip(1).collect();
        let mut params = ParamBag::new();
        for (name, index) in binding.params().iter() {
            if let Some(value) = segments.get(index) {
                params.insert(name, *value);
            }
        }
        pattern.capture_into(path, &mut params);

        trace!("{method} {path} -> {resolved} {pattern}");
        Dispatch {
            handler: binding.handler().clone(),
            params,
            pattern: Some(pattern.source().to_string()),
            method: Some(resolved),
            ambiguous: selection.ambiguous,
        }
    }

    // The longest match wins; equal lengths go to the first declared pattern.
    fn select(&self, path: &str) -> Option<Selection<'_>> {
        let mut best: Option<(usize, usize)> = None;
        let mut candidates = 0;
        let mut tied = false;

        for (position, (pattern, _)) in self.routes.iter().enumerate() {
            let Some(len) = pattern.match_len(path) else {
                continue;
            };
            candidates += 1;
            match best {
                Some((_, best_len)) if len < best_len => {}
                Some((_, best_len)) if len == best_len => tied = true,
                _ => {
                    best = Some((position, len));
                    tied = false;
                }
            }
        }

        let (position, _) = best?;
        if tied {
            warn!(
                "Ambiguous routes for {path}: several patterns match equally, using first declared {pattern}",
                pattern = self.routes[position].0
            );
        } else if candidates > 1 {
            debug!("{candidates} patterns match {path}, using longest match");
        }

        Some(Selection {
            position,
            entry: &self.routes[position].1,
            ambiguous: tied,
        })
    }
}
