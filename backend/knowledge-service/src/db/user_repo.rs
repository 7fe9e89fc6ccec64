use sqlx::PgPool;

use crate::db::post_repo::POST_COLUMNS;
use crate::models::Post;

/// Posts the user has marked as favorites, newest first. The favorites view
/// shows exactly what the user liked, including posts that have since left
/// the public listings.
pub async fn liked_posts(pool: &PgPool, user_id: i64) -> Result<Vec<Post>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {}
        FROM posts p
        JOIN user_liked_posts ulp ON ulp.post_id = p.id
        WHERE ulp.user_id = $1
        ORDER BY p.id DESC
        "#,
        POST_COLUMNS
    );

    let posts = sqlx::query_as::<_, Post>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(posts)
}

/// All user identifiers, for the author filter typeahead.
pub async fn user_identifiers(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_scalar::<_, String>("SELECT identifier FROM users ORDER BY identifier")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
