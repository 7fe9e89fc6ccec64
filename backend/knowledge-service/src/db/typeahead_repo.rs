use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::db::criteria::PUBLISHED;

/// A search suggestion candidate before authors are resolved.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub post_id: i64,
    pub title: String,
    pub path: String,
    pub keywords: String,
}

/// Top five published posts scored by how many search terms their keyword
/// string contains. Score ties fall back to newest first, so an empty
/// search degrades to the five most recent posts.
pub async fn search_posts(
    pool: &PgPool,
    terms: &[String],
) -> Result<Vec<SearchHit>, sqlx::Error> {
    let mut qb =
        QueryBuilder::<Postgres>::new("SELECT p.id, p.title, p.path, p.keywords, ");
    if terms.is_empty() {
        qb.push("0");
    } else {
        qb.push("(");
        for (i, term) in terms.iter().enumerate() {
            if i > 0 {
                qb.push(" + ");
            }
            qb.push("CASE WHEN lower(p.keywords) LIKE ");
            qb.push_bind(format!("%{}%", term.trim().to_lowercase()));
            qb.push(" THEN 1 ELSE 0 END");
        }
        qb.push(")");
    }
    qb.push(" AS match_score FROM posts p WHERE p.status = ");
    qb.push_bind(PUBLISHED);
    qb.push(" ORDER BY match_score DESC, p.id DESC LIMIT 5");

    let rows = qb.build().fetch_all(pool).await?;
    Ok(rows
        .iter()
        .map(|row| SearchHit {
            post_id: row.get("id"),
            title: row.get("title"),
            path: row.get("path"),
            keywords: row.get("keywords"),
        })
        .collect())
}

/// All tag names, for the tag filter typeahead.
pub async fn tag_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_scalar::<_, String>("SELECT name FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Paths of all posts; callers reduce these to distinct parent folders.
pub async fn post_paths(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_scalar::<_, String>("SELECT path FROM posts ORDER BY path")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_score_sums_one_case_per_term() {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT p.id, p.title, p.path, p.keywords, ");
        qb.push("(");
        for (i, _term) in ["deep", "learning"].iter().enumerate() {
            if i > 0 {
                qb.push(" + ");
            }
            qb.push("CASE WHEN lower(p.keywords) LIKE ");
            qb.push_bind("%x%");
            qb.push(" THEN 1 ELSE 0 END");
        }
        qb.push(")");
        let sql = qb.sql();
        assert_eq!(sql.matches("CASE WHEN").count(), 2);
        assert_eq!(sql.matches(" + ").count(), 1);
    }
}
