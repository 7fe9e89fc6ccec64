/// Knowledge Listing Service Library
///
/// Serves the listing views (feed, table, cluster, favorites) of the
/// knowledge-sharing platform and the query/filter/grouping logic behind
/// them. The service is read-only over the platform's relational store of
/// posts, tags, authors, and engagement events.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for listing and typeahead endpoints
/// - `models`: Row types and response view models
/// - `services`: Post querying and grouping logic
/// - `db`: Database access layer (criteria builder and repositories)
/// - `middleware`: Bearer-token authentication and capability checks
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
