/// Business logic for post listing and grouping
pub mod groups;
pub mod posts;

pub use groups::{get_post_groups, GroupBy, GroupParams};
pub use posts::{get_posts, page_count, query_param_set, FeedParams, PostPage};
