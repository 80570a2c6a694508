use axum::{extract::State, http::StatusCode, Json};
use log::info;

use crate::api::crud::{self, Resource};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{parse_body, require_fields, JsonBody, RecordId};
use crate::api::state::ReservationsState;
use crate::logic::reference::check_references;
use crate::model::{Reservation, ReservationPatch, Stored};
use crate::store::traits::EntityStore;

pub async fn create_reservation(
    State(state): State<ReservationsState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Stored<Reservation>>)> {
    require_fields(&body, Reservation::REQUIRED)?;
    let reservation: Reservation = parse_body(body)?;

    check_references(&[(&state.class_group_on_create, reservation.class_group_id)]).await?;

    let created = state.reservations.create(reservation).await?;
    info!("Created reserva {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Checks `turma_id` through [`ReservationsState::class_group_on_update`],
/// which resolves a different URL than create does.
pub async fn update_reservation(
    State(state): State<ReservationsState>,
    RecordId(id): RecordId,
    body: Result<JsonBody, ApiError>,
) -> ApiResult<Json<Stored<Reservation>>> {
    crud::ensure_exists(&state.reservations, id).await?;
    let JsonBody(body) = body?;
    let patch: ReservationPatch = parse_body(body)?;

    if let Some(&class_group_id) = patch.class_group_id.as_present() {
        check_references(&[(&state.class_group_on_update, class_group_id)]).await?;
    }

    Ok(Json(crud::apply_patch(&state.reservations, id, patch).await?))
}
