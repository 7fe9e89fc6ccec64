use sqlx::{PgPool, Row};

use crate::db::criteria::PUBLISHED;
use crate::models::{Author, Post};

fn post_from_row(row: &sqlx::postgres::PgRow) -> Post {
    Post {
        id: row.get("id"),
        path: row.get("path"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        tldr: row.get("tldr"),
        keywords: row.get("keywords"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Every (author, qualifying post) pair, author order then newest post
/// first. Authors without qualifying posts do not appear.
pub async fn author_post_pairs(
    pool: &PgPool,
    excluded_tags: &[String],
) -> Result<Vec<(Author, Post)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT u.id AS author_id, u.identifier, u.format_name,
               p.id, p.path, p.title, p.subtitle, p.tldr, p.keywords, p.status,
               p.created_at, p.updated_at
        FROM users u
        JOIN post_authors pa ON pa.user_id = u.id
        JOIN posts p ON p.id = pa.post_id
        WHERE p.status = $1
          AND NOT EXISTS (
              SELECT 1 FROM post_tags pt
              JOIN tags t ON t.id = pt.tag_id
              WHERE pt.post_id = p.id AND t.name = ANY($2)
          )
        ORDER BY u.id, p.id DESC
        "#,
    )
    .bind(PUBLISHED)
    .bind(excluded_tags)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| {
            let author = Author {
                id: row.get("author_id"),
                identifier: row.get("identifier"),
                format_name: row.get("format_name"),
            };
            (author, post_from_row(row))
        })
        .collect())
}

/// Every (tag name, qualifying post) pair. Excluded tags never appear as
/// keys, and tags without qualifying posts do not appear.
pub async fn tag_post_pairs(
    pool: &PgPool,
    excluded_tags: &[String],
) -> Result<Vec<(String, Post)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT t.name AS tag_name,
               p.id, p.path, p.title, p.subtitle, p.tldr, p.keywords, p.status,
               p.created_at, p.updated_at
        FROM tags t
        JOIN post_tags pt ON pt.tag_id = t.id
        JOIN posts p ON p.id = pt.post_id
        WHERE t.name <> ALL($2)
          AND p.status = $1
          AND NOT EXISTS (
              SELECT 1 FROM post_tags xpt
              JOIN tags xt ON xt.id = xpt.tag_id
              WHERE xpt.post_id = p.id AND xt.name = ANY($2)
          )
        ORDER BY t.name, p.id DESC
        "#,
    )
    .bind(PUBLISHED)
    .bind(excluded_tags)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get::<String, _>("tag_name"), post_from_row(row)))
        .collect())
}
