/// Typeahead handlers - JSON suggestion endpoints for the search box and
/// the filter inputs
///
/// Permission denial degrades every endpoint here to an empty array rather
/// than an error.
use std::collections::BTreeSet;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::db::{post_repo, typeahead_repo, user_repo};
use crate::error::Result;
use crate::metrics::listing::TYPEAHEAD_REQUEST_TOTAL;
use crate::middleware::Principal;
use crate::models::TypeaheadEntry;
use crate::services::groups::parent_folder;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

fn denied(kind: &str) -> HttpResponse {
    TYPEAHEAD_REQUEST_TOTAL
        .with_label_values(&[kind, "denied"])
        .inc();
    HttpResponse::Ok().json(Vec::<String>::new())
}

/// Top five published posts scored by keyword matches against the search
/// terms.
pub async fn post_typeahead(
    pool: web::Data<PgPool>,
    principal: Principal,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    if !principal.can_view_index() {
        return Ok(denied("search"));
    }
    TYPEAHEAD_REQUEST_TOTAL
        .with_label_values(&["search", "ok"])
        .inc();

    let terms: Vec<String> = query
        .search
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let hits = typeahead_repo::search_posts(&pool, &terms).await?;

    let post_ids: Vec<i64> = hits.iter().map(|h| h.post_id).collect();
    let mut authors = post_repo::authors_for_posts(&pool, &post_ids).await?;

    let matches: Vec<TypeaheadEntry> = hits
        .into_iter()
        .map(|hit| TypeaheadEntry {
            author: authors
                .remove(&hit.post_id)
                .unwrap_or_default()
                .into_iter()
                .map(|a| a.format_name)
                .collect(),
            title: hit.title,
            path: hit.path,
            keywords: hit.keywords,
        })
        .collect();

    Ok(HttpResponse::Ok().json(matches))
}

/// All tag names.
pub async fn tags_typeahead(
    pool: web::Data<PgPool>,
    principal: Principal,
) -> Result<HttpResponse> {
    if !principal.can_view_index() {
        return Ok(denied("tags"));
    }
    TYPEAHEAD_REQUEST_TOTAL
        .with_label_values(&["tags", "ok"])
        .inc();

    let names = typeahead_repo::tag_names(&pool).await?;
    Ok(HttpResponse::Ok().json(names))
}

/// All user identifiers.
pub async fn users_typeahead(
    pool: web::Data<PgPool>,
    principal: Principal,
) -> Result<HttpResponse> {
    if !principal.can_view_index() {
        return Ok(denied("users"));
    }
    TYPEAHEAD_REQUEST_TOTAL
        .with_label_values(&["users", "ok"])
        .inc();

    let identifiers = user_repo::user_identifiers(&pool).await?;
    Ok(HttpResponse::Ok().json(identifiers))
}

/// Distinct parent folders of all post paths.
pub async fn paths_typeahead(
    pool: web::Data<PgPool>,
    principal: Principal,
) -> Result<HttpResponse> {
    if !principal.can_view_index() {
        return Ok(denied("paths"));
    }
    TYPEAHEAD_REQUEST_TOTAL
        .with_label_values(&["paths", "ok"])
        .inc();

    let paths = typeahead_repo::post_paths(&pool).await?;
    let stubs: BTreeSet<String> = paths.iter().map(|p| parent_folder(p)).collect();
    Ok(HttpResponse::Ok().json(stubs))
}
