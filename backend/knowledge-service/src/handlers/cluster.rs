/// Cluster handler - the grouped listing view
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;
use crate::metrics::listing::LISTING_REQUEST_TOTAL;
use crate::middleware::{permissions, Principal};
use crate::models::ClusterResponse;
use crate::services::{self, GroupParams};

#[derive(Debug, Deserialize)]
pub struct GroupQueryParams {
    #[serde(default)]
    pub filters: String,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_desc")]
    pub sort_desc: bool,
    #[serde(default = "default_group_by")]
    pub group_by: String,
    pub tag: Option<String>,
}

fn default_sort_by() -> String {
    "alpha".to_string()
}

fn default_sort_desc() -> bool {
    true
}

fn default_group_by() -> String {
    "tags".to_string()
}

/// Render the cluster view: posts grouped by author, tag, or folder.
pub async fn get_cluster(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    principal: Principal,
    query: web::Query<GroupQueryParams>,
) -> Result<HttpResponse> {
    permissions::check_index_view(&principal)?;
    LISTING_REQUEST_TOTAL.with_label_values(&["cluster"]).inc();

    let group_params = GroupParams {
        filters: query.filters.clone(),
        sort_by: query.sort_by.clone(),
        sort_desc: query.sort_desc,
        group_by: query.group_by.clone(),
    };
    let grouped_data =
        services::get_post_groups(&pool, &config.index.excluded_tags, &group_params).await?;

    Ok(HttpResponse::Ok().json(ClusterResponse {
        grouped_data,
        filters: query.filters.clone(),
        sort_by: query.sort_by.clone(),
        group_by: query.group_by.clone(),
        tag: query.tag.clone(),
    }))
}
