/// Post querying: criteria assembly, pagination, and stats for the feed and
/// table views.
use std::collections::HashMap;

use sqlx::PgPool;

use crate::db::criteria::{PostCriteria, Predicate, SortKey};
use crate::db::post_repo;
use crate::error::Result;
use crate::models::{PostStats, PostView};

/// Resolved listing parameters, after request-level defaults and clamping.
#[derive(Debug, Clone)]
pub struct FeedParams {
    pub filters: String,
    pub post_paths: String,
    pub tags: String,
    pub authors: String,
    pub sort_by: String,
    pub sort_desc: bool,
    pub start: i64,
    pub results: i64,
}

/// One page of the listing plus its stats and pagination totals.
#[derive(Debug)]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub post_stats: HashMap<String, PostStats>,
    pub posts_count: i64,
    pub page_count: i64,
}

/// Strip, lowercase, and drop empty tokens from a free-text filter string.
pub fn query_param_set(params: &str) -> Vec<String> {
    params
        .trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Pages needed to show `total` rows at `page_size` rows per page.
pub fn page_count(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}

/// Translate the listing parameters into criteria over visible posts.
pub fn build_criteria(excluded_tags: &[String], params: &FeedParams) -> PostCriteria {
    let mut criteria = PostCriteria::visible(excluded_tags);

    for token in query_param_set(&params.filters) {
        criteria = criteria.and(Predicate::KeywordToken(token));
    }

    if !params.post_paths.is_empty() {
        let prefixes: Vec<String> = params
            .post_paths
            .split(',')
            .map(str::to_string)
            .collect();
        criteria = criteria.and(Predicate::PathUnder(prefixes));
    }

    if !params.tags.is_empty() {
        let tags: Vec<String> = params.tags.split(',').map(str::to_string).collect();
        criteria = criteria.and(Predicate::HasAnyTag(tags));
    }

    if !params.authors.is_empty() {
        let authors: Vec<String> = params
            .authors
            .split(',')
            .map(|name| name.trim().to_string())
            .collect();
        criteria = criteria.and(Predicate::HasAnyAuthor(authors));
    }

    criteria
}

/// Return the ordered, paginated list of matching published posts plus the
/// per-post stats mapping.
pub async fn get_posts(
    pool: &PgPool,
    excluded_tags: &[String],
    params: &FeedParams,
) -> Result<PostPage> {
    let criteria = build_criteria(excluded_tags, params);

    let posts_count = post_repo::count_posts(pool, &criteria).await?;

    let sort = SortKey::parse(&params.sort_by);
    let posts = post_repo::list_posts(
        pool,
        &criteria,
        sort,
        params.sort_desc,
        params.results,
        params.start,
    )
    .await?;

    // Resolve authors for the page before the rows leave the data-access
    // layer; relations are never loaded after the fact.
    let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let mut authors = post_repo::authors_for_posts(pool, &post_ids).await?;

    let paths: Vec<String> = posts.iter().map(|p| p.path.clone()).collect();
    let post_stats = post_repo::stats_for_paths(pool, &paths).await?;

    let posts = posts
        .into_iter()
        .map(|post| {
            let authors = authors
                .remove(&post.id)
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.format_name)
                .collect();
            PostView { post, authors }
        })
        .collect();

    Ok(PostPage {
        posts,
        post_stats,
        posts_count,
        page_count: page_count(posts_count, params.results),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_set_normalizes() {
        assert_eq!(query_param_set("  Deep   LEARNING "), vec!["deep", "learning"]);
        assert!(query_param_set("").is_empty());
        assert!(query_param_set("   ").is_empty());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 10), 3);
    }

    #[test]
    fn page_count_tolerates_bad_page_size() {
        assert_eq!(page_count(5, 0), 0);
    }

    fn params(filters: &str, post_paths: &str, tags: &str, authors: &str) -> FeedParams {
        FeedParams {
            filters: filters.to_string(),
            post_paths: post_paths.to_string(),
            tags: tags.to_string(),
            authors: authors.to_string(),
            sort_by: "updated_at".to_string(),
            sort_desc: true,
            start: 0,
            results: 10,
        }
    }

    #[test]
    fn criteria_includes_each_requested_filter() {
        let excluded = vec!["private".to_string()];
        let criteria = build_criteria(&excluded, &params("ml ops", "a/b", "t1,t2", "ann, bob"));
        let expected = PostCriteria::visible(&excluded)
            .and(Predicate::KeywordToken("ml".into()))
            .and(Predicate::KeywordToken("ops".into()))
            .and(Predicate::PathUnder(vec!["a/b".into()]))
            .and(Predicate::HasAnyTag(vec!["t1".into(), "t2".into()]))
            .and(Predicate::HasAnyAuthor(vec!["ann".into(), "bob".into()]));
        assert_eq!(criteria, expected);
    }

    #[test]
    fn empty_params_add_no_predicates() {
        let criteria = build_criteria(&[], &params("", "", "", ""));
        assert_eq!(criteria, PostCriteria::visible(&[]));
    }
}
