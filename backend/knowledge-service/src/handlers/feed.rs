/// Feed and table handlers - the paginated listing views
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;
use crate::metrics::listing::{LISTING_REQUEST_DURATION_SECONDS, LISTING_REQUEST_TOTAL};
use crate::middleware::{permissions, Principal};
use crate::models::{FeedResponse, ListingResponse};
use crate::services::{self, FeedParams, GroupParams};

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    #[serde(default)]
    pub filters: String,
    #[serde(default)]
    pub post_paths: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_desc")]
    pub sort_desc: bool,
    #[serde(default)]
    pub start: i64,
    pub results: Option<i64>,
    #[serde(default = "default_group_by")]
    pub group_by: String,
    /// Tag the client is currently browsing, echoed back untouched
    pub tag: Option<String>,
}

fn default_sort_by() -> String {
    "updated_at".to_string()
}

fn default_sort_desc() -> bool {
    true
}

fn default_group_by() -> String {
    "tags".to_string()
}

impl FeedQueryParams {
    pub(crate) fn feed_params(&self, config: &Config) -> FeedParams {
        FeedParams {
            filters: self.filters.clone(),
            post_paths: self.post_paths.clone(),
            tags: self.tags.clone(),
            authors: self.authors.clone(),
            sort_by: self.sort_by.clone(),
            sort_desc: self.sort_desc,
            start: self.start.max(0),
            results: self
                .results
                .unwrap_or(config.index.default_page_size)
                .clamp(1, 100),
        }
    }

    pub(crate) fn group_params(&self) -> GroupParams {
        GroupParams {
            filters: self.filters.clone(),
            sort_by: self.sort_by.clone(),
            sort_desc: self.sort_desc,
            group_by: self.group_by.clone(),
        }
    }
}

/// Redirect the bare root to the feed view.
pub async fn render_index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/api/v1/feed"))
        .finish()
}

/// Render the feed view model: posts, stats, and the grouped sidebar data.
pub async fn get_feed(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    principal: Principal,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse> {
    permissions::check_index_view(&principal)?;
    LISTING_REQUEST_TOTAL.with_label_values(&["feed"]).inc();
    let timer = LISTING_REQUEST_DURATION_SECONDS
        .with_label_values(&["feed"])
        .start_timer();

    let excluded = &config.index.excluded_tags;
    let feed_params = query.feed_params(&config);
    let page = services::get_posts(&pool, excluded, &feed_params).await?;
    let grouped_data = services::get_post_groups(&pool, excluded, &query.group_params()).await?;

    timer.observe_duration();

    Ok(HttpResponse::Ok().json(FeedResponse {
        top_header: "Knowledge Feed",
        posts: page.posts,
        post_stats: page.post_stats,
        posts_count: page.posts_count,
        page_count: page.page_count,
        start: feed_params.start,
        results: feed_params.results,
        grouped_data,
        filters: query.filters.clone(),
        sort_by: query.sort_by.clone(),
        group_by: query.group_by.clone(),
        tag: query.tag.clone(),
    }))
}

/// Render the table view model: posts and stats without grouping.
pub async fn get_table(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    principal: Principal,
    query: web::Query<FeedQueryParams>,
) -> Result<HttpResponse> {
    permissions::check_index_view(&principal)?;
    LISTING_REQUEST_TOTAL.with_label_values(&["table"]).inc();
    let timer = LISTING_REQUEST_DURATION_SECONDS
        .with_label_values(&["table"])
        .start_timer();

    let feed_params = query.feed_params(&config);
    let page = services::get_posts(&pool, &config.index.excluded_tags, &feed_params).await?;

    timer.observe_duration();

    Ok(HttpResponse::Ok().json(ListingResponse {
        top_header: "Knowledge Table",
        posts: page.posts,
        post_stats: page.post_stats,
        posts_count: page.posts_count,
        page_count: page.page_count,
        start: feed_params.start,
        results: feed_params.results,
    }))
}
