use std::fmt;

/// Identifier path of a tracked input source, e.g. `/user/hand/left`.
///
/// The string is opaque here; only the input provider interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceId {
    fn from(path: &str) -> Self {
        Self(path.to_string())
    }
}

impl From<String> for SourceId {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
