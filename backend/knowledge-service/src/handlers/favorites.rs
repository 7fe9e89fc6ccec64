/// Favorites handler - the signed-in user's liked posts
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::db::{post_repo, user_repo};
use crate::error::Result;
use crate::metrics::listing::LISTING_REQUEST_TOTAL;
use crate::middleware::{permissions, Principal};
use crate::models::{FavoritesResponse, PostView};

/// Render the favorites view: everything the user liked, with stats.
pub async fn get_favorites(
    pool: web::Data<PgPool>,
    principal: Principal,
) -> Result<HttpResponse> {
    let user_id = permissions::require_user(&principal)?;
    LISTING_REQUEST_TOTAL.with_label_values(&["favorites"]).inc();

    let posts = user_repo::liked_posts(&pool, user_id).await?;

    let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    let mut authors = post_repo::authors_for_posts(&pool, &post_ids).await?;

    let paths: Vec<String> = posts.iter().map(|p| p.path.clone()).collect();
    let post_stats = post_repo::stats_for_paths(&pool, &paths).await?;

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

    Ok(HttpResponse::Ok().json(FavoritesResponse {
        top_header: "Favorites",
        posts,
        post_stats,
    }))
}
