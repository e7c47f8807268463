//! Display-ready view of a ranked post, shared by the web UI and the CLI.

use serde::Serialize;

use crate::domains::posts::models::post::{PostId, RankedPost};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub id: PostId,
    /// 1-based number shown as the result heading
    pub number: u64,
    pub preview: String,
    /// True when `preview` is shorter than `text`
    pub truncated: bool,
    pub text: String,
    pub link: Option<String>,
    pub score: f32,
}

impl PostView {
    pub fn from_ranked(ranked: &RankedPost<'_>, preview_chars: usize) -> Self {
        let (preview, truncated) = preview(&ranked.post.text, preview_chars);

        Self {
            id: ranked.post.id,
            number: ranked.post.id.display_number(),
            preview,
            truncated,
            text: ranked.post.text.clone(),
            link: ranked.post.link.clone(),
            score: ranked.score,
        }
    }
}

/// First `max_chars` characters of `text`, and whether anything was cut
pub fn preview(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (text[..cut].to_string(), true),
        None => (text.to_string(), false),
    }
}
