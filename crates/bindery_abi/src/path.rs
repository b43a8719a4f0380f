//! Hierarchical grouping of symbols.
//!
//! A module path is pure organization: wrapping a declaration in any number
//! of named scopes changes how calling code refers to it and nothing else.
//! Layout and call signatures never consult it.

use std::fmt;

use itertools::Itertools;

/// Zero or more named grouping scopes wrapped around a declaration.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModulePath {
    segments: Vec<String>,
}

impl ModulePath {
    /// Returns the root path, i.e. no grouping scopes at all.
    pub fn root() -> Self {
        ModulePath::default()
    }

    /// Creates a path from its segments.
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ModulePath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the path's segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns true when the path has no scopes.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns this path extended with one more scope.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        ModulePath { segments }
    }

    /// Returns the path callers use to refer to `symbol` from outside all
    /// scopes.
    pub fn qualify(&self, symbol: &str) -> String {
        if self.is_root() {
            symbol.to_owned()
        } else {
            format!("{self}::{symbol}")
        }
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.iter().join("::"))
    }
}

impl From<&str> for ModulePath {
    fn from(path: &str) -> Self {
        ModulePath {
            segments: path
                .split("::")
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }
}
