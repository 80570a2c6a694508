use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::error::ApiResult;
use crate::api::state::{ActivitiesState, ManagementState, ReservationsState};
use crate::seed::{self, ActivitiesSeed, ManagementSeed, ReservationsSeed};

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Reset the management tables to the fixture rows
pub async fn seed_management(
    State(state): State<ManagementState>,
) -> ApiResult<(StatusCode, Json<ManagementSeed>)> {
    let seeded = seed::seed_management(&state).await?;
    Ok((StatusCode::CREATED, Json(seeded)))
}

pub async fn seed_activities(
    State(state): State<ActivitiesState>,
) -> ApiResult<(StatusCode, Json<ActivitiesSeed>)> {
    let seeded = seed::seed_activities(&state).await?;
    Ok((StatusCode::CREATED, Json(seeded)))
}

pub async fn seed_reservations(
    State(state): State<ReservationsState>,
) -> ApiResult<(StatusCode, Json<ReservationsSeed>)> {
    let seeded = seed::seed_reservations(&state).await?;
    Ok((StatusCode::CREATED, Json(seeded)))
}
