/// Data models for the knowledge listing service
///
/// Row types mirror the platform-owned tables this service reads; response
/// models are the JSON view models handed to clients. Nothing here is ever
/// written back to the store.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// A published content item as stored in the `posts` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    /// Stable identifier, e.g. `projects/deep-dive`
    pub path: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub tldr: String,
    /// Comma-delimited keyword string, canonical form `,kw1,kw2,`
    pub keywords: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An author row from the `users` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub identifier: String,
    pub format_name: String,
}

/// Per-post engagement counters, aggregated from page views, votes, and
/// comments.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PostStats {
    pub all_views: i64,
    pub distinct_views: i64,
    pub total_likes: i64,
    pub total_comments: i64,
}

/// A post with its authors eagerly resolved, ready to leave the data-access
/// layer.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub authors: Vec<String>,
}

/// One bucket of the cluster view: a named group of posts.
#[derive(Debug, Clone, Serialize)]
pub struct PostGroup {
    pub key: String,
    /// Author identifier, present only when grouping by author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub posts: Vec<Post>,
}

/// Feed view model: the paginated post window, its stats, and the grouped
/// sidebar data.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub top_header: &'static str,
    pub posts: Vec<PostView>,
    pub post_stats: HashMap<String, PostStats>,
    pub posts_count: i64,
    pub page_count: i64,
    pub start: i64,
    pub results: i64,
    pub grouped_data: Vec<PostGroup>,
    pub filters: String,
    pub sort_by: String,
    pub group_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Table and favorites view model: posts and stats without grouping.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub top_header: &'static str,
    pub posts: Vec<PostView>,
    pub post_stats: HashMap<String, PostStats>,
    pub posts_count: i64,
    pub page_count: i64,
    pub start: i64,
    pub results: i64,
}

/// Favorites view model: the user's liked posts, unpaginated.
#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub top_header: &'static str,
    pub posts: Vec<PostView>,
    pub post_stats: HashMap<String, PostStats>,
}

/// Cluster view model: grouped data only.
#[derive(Debug, Serialize)]
pub struct ClusterResponse {
    pub grouped_data: Vec<PostGroup>,
    pub filters: String,
    pub sort_by: String,
    pub group_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// One search typeahead suggestion.
#[derive(Debug, Serialize)]
pub struct TypeaheadEntry {
    pub author: Vec<String>,
    pub title: String,
    pub path: String,
    pub keywords: String,
}
