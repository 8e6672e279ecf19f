//! Text-search matching shared by both store implementations.
//!
//! Search matches a free-text term against the blog title (primary field)
//! with the content body as a secondary field. Results are ordered by
//! relevance (title hits before content-only hits), then newest first as the
//! tie-break. The full match set is returned; pagination is applied by the
//! caller.

use chrono::{DateTime, Utc};

use crate::models::Blog;

/// Relevance bucket for a matched blog. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    Title,
    Content,
}

/// Lowercased, whitespace-trimmed search term. An empty term matches nothing.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Case-insensitive containment test against title first, then content.
pub fn rank_match(blog: &Blog, normalized_term: &str) -> Option<MatchRank> {
    if normalized_term.is_empty() {
        return None;
    }
    if blog.name.to_lowercase().contains(normalized_term) {
        return Some(MatchRank::Title);
    }
    if blog.content.to_lowercase().contains(normalized_term) {
        return Some(MatchRank::Content);
    }
    None
}

/// Orders matches by relevance, then creation time descending.
pub fn order_matches(mut matches: Vec<(MatchRank, Blog)>) -> Vec<Blog> {
    matches.sort_by(|(rank_a, blog_a), (rank_b, blog_b)| {
        rank_a
            .cmp(rank_b)
            .then_with(|| created_key(blog_b).cmp(&created_key(blog_a)))
    });
    matches.into_iter().map(|(_, blog)| blog).collect()
}

fn created_key(blog: &Blog) -> (DateTime<Utc>, String) {
    (blog.created_at, blog.id.clone())
}
