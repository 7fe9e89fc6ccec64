/// HTTP handlers for the listing endpoints
///
/// - Feed/table: the filtered, sorted, paginated post window with stats
/// - Cluster: the grouped view
/// - Favorites: the signed-in user's liked posts
/// - Typeahead: JSON suggestions for search, tags, users, and paths
/// - Templates: knowledge template downloads for the create flow
pub mod cluster;
pub mod favorites;
pub mod feed;
pub mod templates;
pub mod typeahead;

// Re-export handler functions at module level
pub use cluster::get_cluster;
pub use favorites::get_favorites;
pub use feed::{get_feed, get_table, render_index};
pub use templates::{download_template, editor_config};
pub use typeahead::{paths_typeahead, post_typeahead, tags_typeahead, users_typeahead};
