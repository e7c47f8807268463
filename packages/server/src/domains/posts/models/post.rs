use std::fmt;

use serde::Serialize;

/// Stable identifier of a post: its data-row index in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// 1-based number shown to users
    pub const fn display_number(self) -> u64 {
        self.0 + 1
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A post with its precomputed embedding
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: PostId,
    pub text: String,
    pub link: Option<String>,
    pub vector: Vec<f32>,
}

impl PostRecord {
    pub fn new(id: u64, text: impl Into<String>, link: Option<String>, vector: Vec<f32>) -> Self {
        Self {
            id: PostId::new(id),
            text: text.into(),
            link,
            vector,
        }
    }
}

/// A stored post paired with its cosine similarity to a query, in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedPost<'a> {
    pub post: &'a PostRecord,
    pub score: f32,
}
