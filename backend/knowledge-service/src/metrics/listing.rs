use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Total listing requests segmented by view (feed, table, cluster, favorites).
    pub static ref LISTING_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "listing_request_total",
        "Total listing requests segmented by view",
        &["view"]
    )
    .expect("failed to register listing_request_total");

    /// Duration of listing requests by view.
    pub static ref LISTING_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "listing_request_duration_seconds",
        "Listing request duration segmented by view",
        &["view"]
    )
    .expect("failed to register listing_request_duration_seconds");

    /// Typeahead requests segmented by kind and outcome (ok/denied).
    pub static ref TYPEAHEAD_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "typeahead_request_total",
        "Total typeahead requests segmented by kind and outcome",
        &["kind", "outcome"]
    )
    .expect("failed to register typeahead_request_total");
}
