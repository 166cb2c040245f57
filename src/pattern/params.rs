//! Parameter positions of a declared path.

use crate::config::RouterOptions;
use crate::error::Error;
use crate::pattern::compile::PathPattern;
use crate::pattern::template::{parse_path, parse_prefix, Segment};

/// Parameter names mapped to their segment index in the full path.
///
/// Indices count from the first segment after the leading slash and include
/// the prefix segments. Entries keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    positions: Vec<(String, usize)>,
}

impl ParamMap {
    /// Segment index of the named parameter.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.positions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, index)| *index)
    }

    /// Iterate over `(name, index)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.positions.iter().map(|(name, index)| (name.as_str(), *index))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Locate the parameters of `prefix + path`.
///
/// Native patterns have no positional parameters. A name used twice fails
/// with [`Error::DuplicateParam`].
pub fn extract_params(pattern: &PathPattern, options: &RouterOptions) -> Result<ParamMap, Error> {
    let PathPattern::Template(path) = pattern else {
        return Ok(ParamMap::default());
    };
    let prefix = parse_prefix(&options.prefix)?;
    let segments = parse_path(path)?;

    let mut params = ParamMap::default();
    for (index, segment) in prefix.iter().chain(segments.iter()).enumerate() {
        let Segment::Param(name) = segment else {
            continue;
        };
        if params.get(name).is_some() {
            return Err(Error::DuplicateParam {
                name: name.to_string(),
                path: format!("{}{path}", options.prefix),
            });
        }
        params.positions.push((name.to_string(), index));
    }
    Ok(params)
}
