use crate::foundation::error::{PanoError, PanoResult};

/// 1-based position of a view in the batch; also names its output file.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct OutputIndex(pub u32);

impl OutputIndex {
    /// Output file name for this index, e.g. `37.jpg`.
    pub fn file_name(self) -> String {
        format!("{}.jpg", self.0)
    }
}

impl std::fmt::Display for OutputIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Inclusive output index range `[first, last]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IndexRange {
    /// First index in the range.
    pub first: OutputIndex,
    /// Last index in the range (inclusive).
    pub last: OutputIndex,
}

impl IndexRange {
    /// Number of indices covered.
    pub fn len(self) -> u32 {
        self.last.0 - self.first.0 + 1
    }

    /// Always `false`; an inclusive range holds at least one index.
    pub fn is_empty(self) -> bool {
        false
    }

    /// Return `true` when `idx` is inside `[first, last]`.
    pub fn contains(self, idx: OutputIndex) -> bool {
        self.first.0 <= idx.0 && idx.0 <= self.last.0
    }
}

impl std::fmt::Display for IndexRange {
    /// Renders as `1-24.jpg`, the literal file span of the range.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}.jpg", self.first.0, self.last.0)
    }
}

/// Encoder quality passed to `-q:v`; lower is better.
///
/// Only constructible through [`Quality::new`] (or deserialization, which applies the same
/// check), so a held value is always within `1..=10`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Smallest accepted value.
    pub const MIN: u8 = 1;
    /// Largest accepted value.
    pub const MAX: u8 = 10;

    /// Create a quality value, rejecting anything outside `1..=10`.
    pub fn new(q: u8) -> PanoResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&q) {
            return Err(PanoError::validation(format!(
                "quality must be within {}..={}, got {q}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(q))
    }

    /// The raw `-q:v` value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Quality {
    type Error = PanoError;

    fn try_from(q: u8) -> PanoResult<Self> {
        Self::new(q)
    }
}

impl From<Quality> for u8 {
    fn from(q: Quality) -> u8 {
        q.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(2)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
