use axum::{extract::State, http::StatusCode, Json};
use log::info;

use crate::api::crud::{self, Resource};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{parse_body, require_fields, JsonBody, RecordId};
use crate::api::state::ActivitiesState;
use crate::logic::reference::{check_references, ForeignKey};
use crate::model::{Activity, ActivityPatch, Id, Score, ScorePatch, Stored};
use crate::store::traits::EntityStore;

/// Professor is checked before class group; the first failure is reported.
pub async fn create_activity(
    State(state): State<ActivitiesState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Stored<Activity>>)> {
    require_fields(&body, Activity::REQUIRED)?;
    let activity: Activity = parse_body(body)?;

    check_references(&[
        (&state.professor_ref, activity.professor_id),
        (&state.class_group_ref, activity.class_group_id),
    ])
    .await?;

    let created = state.activities.create(activity).await?;
    info!("Created atividade {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_activity(
    State(state): State<ActivitiesState>,
    RecordId(id): RecordId,
    body: Result<JsonBody, ApiError>,
) -> ApiResult<Json<Stored<Activity>>> {
    crud::ensure_exists(&state.activities, id).await?;
    let JsonBody(body) = body?;
    let patch: ActivityPatch = parse_body(body)?;

    let mut checks: Vec<(&ForeignKey, Id)> = Vec::new();
    if let Some(&professor_id) = patch.professor_id.as_present() {
        checks.push((&state.professor_ref, professor_id));
    }
    if let Some(&class_group_id) = patch.class_group_id.as_present() {
        checks.push((&state.class_group_ref, class_group_id));
    }
    check_references(&checks).await?;

    Ok(Json(crud::apply_patch(&state.activities, id, patch).await?))
}

/// The student is checked remotely first, then the activity locally.
pub async fn create_score(
    State(state): State<ActivitiesState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Stored<Score>>)> {
    require_fields(&body, Score::REQUIRED)?;
    let score: Score = parse_body(body)?;

    check_references(&[
        (&state.student_ref, score.student_id),
        (&state.activity_ref, score.activity_id),
    ])
    .await?;

    let created = state.scores.create(score).await?;
    info!("Created nota {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_score(
    State(state): State<ActivitiesState>,
    RecordId(id): RecordId,
    body: Result<JsonBody, ApiError>,
) -> ApiResult<Json<Stored<Score>>> {
    crud::ensure_exists(&state.scores, id).await?;
    let JsonBody(body) = body?;
    let patch: ScorePatch = parse_body(body)?;

    let mut checks: Vec<(&ForeignKey, Id)> = Vec::new();
    if let Some(&student_id) = patch.student_id.as_present() {
        checks.push((&state.student_ref, student_id));
    }
    if let Some(&activity_id) = patch.activity_id.as_present() {
        checks.push((&state.activity_ref, activity_id));
    }
    check_references(&checks).await?;

    Ok(Json(crud::apply_patch(&state.scores, id, patch).await?))
}
