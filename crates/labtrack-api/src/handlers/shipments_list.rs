use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::ShipmentsResponse;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// List all shipments, newest first. Pagination is applied by the UI over the
/// full result set.
#[utoipa::path(
    get,
    path = "/shipments",
    tag = "shipments",
    responses(
        (status = 200, description = "All shipments ordered by creation descending", body = ShipmentsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_shipments(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let shipments = state.shipments.list_all().await?;

    Ok(Json(ShipmentsResponse { shipments }))
}
