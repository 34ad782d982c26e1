use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, error::Result};

/// An empty collection produces no report and an empty 200 response.
pub async fn get_report(State(state): State<AppState>) -> Result<Response> {
    let report = state.products.report().await?;

    Ok(match report {
        Some(report) => (StatusCode::OK, Json(report)).into_response(),
        None => StatusCode::OK.into_response(),
    })
}
