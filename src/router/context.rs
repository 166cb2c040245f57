//! Per-request context handed to handlers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Named path parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamBag(HashMap<String, String>);

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Add or replace a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The request half of a context.
#[derive(Debug, Clone)]
pub struct Request {
    /// The request method as received. Matched case-insensitively.
    pub method: String,
    /// The full request target, possibly with a query string.
    pub url: String,
    /// Path parameters, filled in by the router before the handler runs.
    pub params: ParamBag,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            params: ParamBag::new(),
        }
    }

    /// The URL without its query string.
    pub fn path(&self) -> &str {
        match self.url.split_once('?') {
            Some((path, _)) => path,
            None => &self.url,
        }
    }

    /// Get a path parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

/// The response half of a context. Left untouched by the router.
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Status code chosen by a handler, if any.
    pub status: Option<u16>,
    /// Response body chosen by a handler, if any.
    pub body: Option<String>,
}

impl Response {
    /// Set the body to the JSON encoding of `value`.
    pub fn set_json<T: Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        self.body = Some(serde_json::to_string(value)?);
        Ok(())
    }
}

/// State that travels through a middleware chain for one request.
#[derive(Debug, Clone)]
pub struct Context {
    pub request: Request,
    pub response: Response,
}

impl Context {
    /// Create a context for a request with an empty response.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            request: Request::new(method, url),
            response: Response::default(),
        }
    }
}
