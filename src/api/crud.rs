//! Handlers shared by every record type.
//!
//! Management records have no foreign references, so all five operations
//! come from here. Activities, scores and reservations reuse the read and
//! delete paths and bring their own create/update, which validate
//! references first.

use axum::{extract::State, http::StatusCode, Json};
use log::info;
use serde::{de::DeserializeOwned, Serialize};

use crate::api::error::{ApiError, ApiResult, MessageResponse};
use crate::api::extract::{parse_body, require_fields, JsonBody, RecordId};
use crate::model::{
    Activity, ActivityPatch, ClassGroup, ClassGroupPatch, Id, Professor, ProfessorPatch,
    Reservation, ReservationPatch, Score, ScorePatch, Stored, Student, StudentPatch,
};
use crate::store::traits::{EntityStore, SharedStore};

/// A record type exposed under `/api/<resource>`
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Patch: DeserializeOwned + Send + 'static;

    /// Singular name used in logs
    const LABEL: &'static str;
    /// Keys a create body must carry (non-null)
    const REQUIRED: &'static [&'static str];
    const NOT_FOUND: &'static str;

    fn removed_message(id: Id) -> String;
    fn apply(&mut self, patch: Self::Patch);
}

pub async fn list<T: Resource>(
    State(store): State<SharedStore<T>>,
) -> ApiResult<Json<Vec<Stored<T>>>> {
    Ok(Json(store.list().await?))
}

pub async fn fetch<T: Resource>(
    State(store): State<SharedStore<T>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<Stored<T>>> {
    Ok(Json(ensure_exists(&store, id).await?))
}

/// Create for records without foreign references
pub async fn create<T: Resource>(
    State(store): State<SharedStore<T>>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Stored<T>>)> {
    require_fields(&body, T::REQUIRED)?;
    let data: T = parse_body(body)?;
    let created = store.create(data).await?;
    info!("Created {} {}", T::LABEL, created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update for records without foreign references.
///
/// The body is inspected only after the record is known to exist, so a
/// missing id is a 404 whatever was sent.
pub async fn update<T: Resource>(
    State(store): State<SharedStore<T>>,
    RecordId(id): RecordId,
    body: Result<JsonBody, ApiError>,
) -> ApiResult<Json<Stored<T>>> {
    ensure_exists(&store, id).await?;
    let JsonBody(body) = body?;
    let patch: T::Patch = parse_body(body)?;
    Ok(Json(apply_patch(&store, id, patch).await?))
}

pub async fn remove<T: Resource>(
    State(store): State<SharedStore<T>>,
    RecordId(id): RecordId,
) -> ApiResult<Json<MessageResponse>> {
    if !store.delete(id).await? {
        return Err(ApiError::NotFound(T::NOT_FOUND.to_string()));
    }
    info!("Deleted {} {}", T::LABEL, id);
    Ok(Json(MessageResponse::new(T::removed_message(id))))
}

/// Load a record or fail with the resource's 404
pub async fn ensure_exists<T: Resource>(store: &SharedStore<T>, id: Id) -> ApiResult<Stored<T>> {
    store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(T::NOT_FOUND.to_string()))
}

/// Write an already validated patch. The record can vanish between the
/// existence check and the write; that is reported as a 404 too.
pub async fn apply_patch<T: Resource>(
    store: &SharedStore<T>,
    id: Id,
    patch: T::Patch,
) -> ApiResult<Stored<T>> {
    let updated = store
        .update(id, Box::new(move |record: &mut T| record.apply(patch)))
        .await?
        .ok_or_else(|| ApiError::NotFound(T::NOT_FOUND.to_string()))?;
    info!("Updated {} {}", T::LABEL, id);
    Ok(updated)
}

impl Resource for Professor {
    type Patch = ProfessorPatch;
    const LABEL: &'static str = "professor";
    const REQUIRED: &'static [&'static str] = &["nome"];
    const NOT_FOUND: &'static str = "Professor não encontrado";

    fn removed_message(id: Id) -> String {
        format!("Professor {} removido com sucesso", id)
    }

    fn apply(&mut self, patch: ProfessorPatch) {
        patch.apply(self);
    }
}

impl Resource for ClassGroup {
    type Patch = ClassGroupPatch;
    const LABEL: &'static str = "turma";
    const REQUIRED: &'static [&'static str] = &["nome"];
    const NOT_FOUND: &'static str = "Turma não encontrada";

    fn removed_message(id: Id) -> String {
        format!("Turma {} removida com sucesso", id)
    }

    fn apply(&mut self, patch: ClassGroupPatch) {
        patch.apply(self);
    }
}

impl Resource for Student {
    type Patch = StudentPatch;
    const LABEL: &'static str = "aluno";
    const REQUIRED: &'static [&'static str] = &["nome"];
    const NOT_FOUND: &'static str = "Aluno não encontrado";

    fn removed_message(id: Id) -> String {
        format!("Aluno {} removido com sucesso", id)
    }

    fn apply(&mut self, patch: StudentPatch) {
        patch.apply(self);
    }
}

impl Resource for Activity {
    type Patch = ActivityPatch;
    const LABEL: &'static str = "atividade";
    const REQUIRED: &'static [&'static str] = &["titulo", "professor_id", "turma_id"];
    const NOT_FOUND: &'static str = "Atividade não encontrada";

    fn removed_message(id: Id) -> String {
        format!("Atividade {} removida com sucesso", id)
    }

    fn apply(&mut self, patch: ActivityPatch) {
        patch.apply(self);
    }
}

impl Resource for Score {
    type Patch = ScorePatch;
    const LABEL: &'static str = "nota";
    const REQUIRED: &'static [&'static str] = &["valor", "aluno_id", "atividade_id"];
    const NOT_FOUND: &'static str = "Nota não encontrada";

    fn removed_message(id: Id) -> String {
        format!("Nota {} removida com sucesso", id)
    }

    fn apply(&mut self, patch: ScorePatch) {
        patch.apply(self);
    }
}

impl Resource for Reservation {
    type Patch = ReservationPatch;
    const LABEL: &'static str = "reserva";
    const REQUIRED: &'static [&'static str] = &["sala", "data_reserva", "turma_id"];
    const NOT_FOUND: &'static str = "Reserva não encontrada";

    fn removed_message(id: Id) -> String {
        format!("Reserva {} removida com sucesso", id)
    }

    fn apply(&mut self, patch: ReservationPatch) {
        patch.apply(self);
    }
}
