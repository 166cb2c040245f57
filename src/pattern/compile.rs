//! Translation of path templates into matchers.

use std::fmt;
use std::hash::{Hash, Hasher};

use regex::Regex;

use crate::config::RouterOptions;
use crate::error::Error;
use crate::pattern::template::{parse_path, parse_prefix, Segment, PARAM_VALUE_CLASS};
use crate::router::ParamBag;

/// A path as handed to the route builder.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// A template such as `/users/:id`, compiled under the router options.
    Template(String),
    /// A ready-made matcher used as is. Prefix and flags are not applied,
    /// and its named capture groups become request parameters.
    Native(Regex),
}

impl From<&str> for PathPattern {
    fn from(template: &str) -> Self {
        PathPattern::Template(template.to_string())
    }
}

impl From<String> for PathPattern {
    fn from(template: String) -> Self {
        PathPattern::Template(template)
    }
}

impl From<Regex> for PathPattern {
    fn from(regex: Regex) -> Self {
        PathPattern::Native(regex)
    }
}

/// A compiled, testable form of a path pattern.
///
/// Identity is the matcher source: two patterns are equal exactly when their
/// sources are, which is how declarations of the same path end up sharing a
/// route entry. Case-insensitive sources start with `(?i)`.
#[derive(Clone)]
pub struct CompiledPattern {
    regex: Regex,
    native: bool,
}

impl CompiledPattern {
    /// The matcher source string.
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the pattern was supplied as a native regex.
    pub fn is_native(&self) -> bool {
        self.native
    }

    /// Test a candidate path.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Byte offset where the match ends, if the path matches.
    pub fn match_len(&self, path: &str) -> Option<usize> {
        self.regex.find(path).map(|m| m.end())
    }

    /// Copy named capture groups of a native matcher into `params`.
    pub(crate) fn capture_into(&self, path: &str, params: &mut ParamBag) {
        if !self.native {
            return;
        }
        let Some(captures) = self.regex.captures(path) else {
            return;
        };
        for name in self.regex.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                params.insert(name, value.as_str());
            }
        }
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source()
    }
}

impl Eq for CompiledPattern {}

impl Hash for CompiledPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source().hash(state);
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompiledPattern").field(&self.source()).finish()
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

/// Build the matcher source for `prefix + path`.
///
/// Without `case`, literals are lower-cased so that spellings differing only
/// in case produce the same source.
pub fn pattern_source(path: &str, options: &RouterOptions) -> Result<String, Error> {
    let prefix = parse_prefix(&options.prefix)?;
    let segments = parse_path(path)?;

    let mut source = String::from(if options.case { "^" } else { "(?i)^" });
    for segment in prefix.iter().chain(segments.iter()) {
        source.push('/');
        match segment {
            Segment::Literal(text) if options.case => source.push_str(&regex::escape(text)),
            Segment::Literal(text) => source.push_str(&regex::escape(&text.to_ascii_lowercase())),
            Segment::Param(_) => source.push_str(PARAM_VALUE_CLASS),
            Segment::Trailing => {}
        }
    }
    if options.end {
        source.push('$');
    }
    Ok(source)
}

/// Compile a pattern under the given router options.
///
/// Templates are validated here, so a malformed path or prefix fails the
/// router build rather than a later request.
pub fn compile(pattern: &PathPattern, options: &RouterOptions) -> Result<CompiledPattern, Error> {
    match pattern {
        PathPattern::Native(regex) => Ok(CompiledPattern {
            regex: regex.clone(),
            native: true,
        }),
        PathPattern::Template(path) => {
            let source = pattern_source(path, options)?;
            Ok(CompiledPattern {
                regex: Regex::new(&source)?,
                native: false,
            })
        }
    }
}
