use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::db::criteria::{PostCriteria, SortKey};
use crate::models::{Author, Post, PostStats};

/// Columns selected for every post row, in `Post` field order.
pub const POST_COLUMNS: &str =
    "p.id, p.path, p.title, p.subtitle, p.tldr, p.keywords, p.status, p.created_at, p.updated_at";

/// Compose the listing query: criteria, sort resolution, and the always-on
/// `id DESC` tiebreak, sliced to one page.
pub fn build_list_query(
    criteria: &PostCriteria,
    sort: Option<SortKey>,
    sort_desc: bool,
    limit: i64,
    offset: i64,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM posts p", POST_COLUMNS));
    if let Some(join) = sort.and_then(SortKey::join_clause) {
        qb.push(join);
    }
    criteria.push_where(&mut qb);
    if sort.map(SortKey::is_aggregate).unwrap_or(false) {
        qb.push(" GROUP BY p.id");
    }
    qb.push(" ORDER BY ");
    if let Some(sort) = sort {
        qb.push(sort.order_expr());
        qb.push(if sort_desc { " DESC" } else { " ASC" });
        qb.push(", ");
    }
    qb.push("p.id DESC");
    qb.push(" LIMIT ");
    qb.push_bind(limit);
    qb.push(" OFFSET ");
    qb.push_bind(offset);
    qb
}

/// Fetch one page of posts matching the criteria under the resolved order.
pub async fn list_posts(
    pool: &PgPool,
    criteria: &PostCriteria,
    sort: Option<SortKey>,
    sort_desc: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    build_list_query(criteria, sort, sort_desc, limit, offset)
        .build_query_as::<Post>()
        .fetch_all(pool)
        .await
}

/// Fetch every post matching the criteria, newest first.
pub async fn list_all_posts(
    pool: &PgPool,
    criteria: &PostCriteria,
) -> Result<Vec<Post>, sqlx::Error> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM posts p", POST_COLUMNS));
    criteria.push_where(&mut qb);
    qb.push(" ORDER BY p.id DESC");
    qb.build_query_as::<Post>().fetch_all(pool).await
}

/// Count all posts matching the criteria.
pub async fn count_posts(pool: &PgPool, criteria: &PostCriteria) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p");
    criteria.push_where(&mut qb);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Aggregate the four engagement counters for the given post paths.
pub async fn stats_for_paths(
    pool: &PgPool,
    paths: &[String],
) -> Result<HashMap<String, PostStats>, sqlx::Error> {
    if paths.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query(
        r#"
        SELECT p.path,
               (SELECT COUNT(*) FROM page_views pv WHERE pv.object_id = p.path) AS all_views,
               (SELECT COUNT(DISTINCT pv.user_id) FROM page_views pv WHERE pv.object_id = p.path) AS distinct_views,
               (SELECT COUNT(*) FROM votes v WHERE v.object_id = p.path) AS total_likes,
               (SELECT COUNT(*) FROM comments c WHERE c.post_path = p.path) AS total_comments
        FROM posts p
        WHERE p.path = ANY($1)
        "#,
    )
    .bind(paths)
    .fetch_all(pool)
    .await?;

    let stats = rows
        .into_iter()
        .map(|row| {
            (
                row.get::<String, _>("path"),
                PostStats {
                    all_views: row.get("all_views"),
                    distinct_views: row.get("distinct_views"),
                    total_likes: row.get("total_likes"),
                    total_comments: row.get("total_comments"),
                },
            )
        })
        .collect();

    Ok(stats)
}

/// Resolve the authors of the given posts in one query, keyed by post id.
/// Listing code attaches these before rows leave the data-access layer.
pub async fn authors_for_posts(
    pool: &PgPool,
    post_ids: &[i64],
) -> Result<HashMap<i64, Vec<Author>>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query(
        r#"
        SELECT pa.post_id, u.id, u.identifier, u.format_name
        FROM post_authors pa
        JOIN users u ON u.id = pa.user_id
        WHERE pa.post_id = ANY($1)
        ORDER BY pa.post_id, u.id
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let mut authors: HashMap<i64, Vec<Author>> = HashMap::new();
    for row in rows {
        authors
            .entry(row.get::<i64, _>("post_id"))
            .or_default()
            .push(Author {
                id: row.get("id"),
                identifier: row.get("identifier"),
                format_name: row.get("format_name"),
            });
    }

    Ok(authors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_order_is_id_desc_only() {
        let qb = build_list_query(&PostCriteria::visible(&[]), None, true, 10, 0);
        let sql = qb.sql();
        assert!(sql.contains("ORDER BY p.id DESC"));
        assert!(!sql.contains("GROUP BY"));
    }

    #[test]
    fn column_sort_keeps_id_tiebreak() {
        let qb = build_list_query(
            &PostCriteria::visible(&[]),
            Some(SortKey::Title),
            false,
            10,
            0,
        );
        assert!(qb.sql().contains("ORDER BY p.title ASC, p.id DESC"));
    }

    #[test]
    fn aggregate_sort_joins_and_groups() {
        let qb = build_list_query(
            &PostCriteria::visible(&[]),
            Some(SortKey::Upvotes),
            true,
            10,
            0,
        );
        let sql = qb.sql();
        assert!(sql.contains("LEFT JOIN votes v ON v.object_id = p.path"));
        assert!(sql.contains("GROUP BY p.id"));
        assert!(sql.contains("ORDER BY COUNT(v.id) DESC, p.id DESC"));
    }

    #[test]
    fn pagination_binds_trail_the_query() {
        let qb = build_list_query(&PostCriteria::visible(&[]), None, true, 25, 50);
        let sql = qb.sql();
        assert!(sql.ends_with("LIMIT $2 OFFSET $3"));
    }
}
