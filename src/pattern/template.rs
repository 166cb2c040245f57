//! Path template grammar.
//!
//! A template is `/`, or a run of `/segment` groups optionally closed by a
//! trailing slash. A segment is either a literal made of letters, digits,
//! `-`, `_` and `.`, or a parameter: `:` followed by a name drawn from the
//! same characters. Prefixes follow the same rules but may also be empty and
//! never end with a slash.

use crate::error::Error;

/// Characters a parameter value may contain, as a regex class.
pub(crate) const PARAM_VALUE_CLASS: &str = r"[A-Za-z0-9\-_.:]+";

/// One slash-delimited piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Matched verbatim.
    Literal(&'a str),
    /// Matched against the parameter value grammar; carries the name without `:`.
    Param(&'a str),
    /// The empty piece after a trailing slash, or the root path `/`.
    Trailing,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn classify(piece: &str) -> Option<Segment<'_>> {
    let (body, param) = match piece.strip_prefix(':') {
        Some(name) => (name, true),
        None => (piece, false),
    };
    if body.is_empty() || !body.chars().all(is_name_char) {
        return None;
    }
    Some(if param {
        Segment::Param(body)
    } else {
        Segment::Literal(body)
    })
}

fn split(path: &str) -> Option<Vec<Segment<'_>>> {
    let rest = path.strip_prefix('/')?;
    let pieces: Vec<&str> = rest.split('/').collect();
    let last = pieces.len() - 1;

    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| match *piece {
            "" if i == last => Some(Segment::Trailing),
            piece => classify(piece),
        })
        .collect()
}

/// Split a declared path into segments, rejecting malformed templates.
pub fn parse_path(path: &str) -> Result<Vec<Segment<'_>>, Error> {
    split(path).ok_or_else(|| Error::InvalidPath(path.to_string()))
}

/// Split a router prefix into segments. The empty prefix has none.
pub fn parse_prefix(prefix: &str) -> Result<Vec<Segment<'_>>, Error> {
    if prefix.is_empty() {
        return Ok(Vec::new());
    }
    match split(prefix) {
        Some(segments) if !segments.contains(&Segment::Trailing) => Ok(segments),
        _ => Err(Error::InvalidPrefix(prefix.to_string())),
    }
}
