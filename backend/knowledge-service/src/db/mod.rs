/// Database access layer
///
/// Repositories are free functions over `&PgPool` returning
/// `Result<_, sqlx::Error>`; dynamic listing queries are composed through
/// the predicate builder in [`criteria`].
pub mod criteria;
pub mod group_repo;
pub mod post_repo;
pub mod typeahead_repo;
pub mod user_repo;

pub use criteria::{PostCriteria, Predicate, SortKey};
