use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::{
    metrics::RESOURCE_SEARCHES_TOTAL,
    models::resource::{ResourceQuery, ALL},
    services::AppState,
};

/// GET /api/v1/resources?search=&subject=&type= - Filter the resource catalog
pub async fn list_resources(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResourceQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let filtered = !query.search.trim().is_empty() || query.subject != ALL || query.kind != ALL;
    RESOURCE_SEARCHES_TOTAL
        .with_label_values(&[if filtered { "true" } else { "false" }])
        .inc();

    let catalog = state.content.catalog(&query);
    tracing::debug!(
        "Resource query search={:?} subject={} type={} matched {}",
        query.search,
        query.subject,
        query.kind,
        catalog.resources.len()
    );

    Ok(Json(catalog))
}
