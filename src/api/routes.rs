use axum::{
    routing::{get, post, MethodRouter},
    Router,
};

use crate::api::state::{ActivitiesState, ManagementState, ReservationsState};
use crate::api::{activity_handlers, crud, handlers, reservation_handlers};
use crate::model::{Activity, ClassGroup, Professor, Reservation, Score, Student};

/// Collections answer both with and without the trailing slash
fn collection<S>(router: Router<S>, path: &str, methods: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, methods.clone())
        .route(&format!("{}/", path), methods)
}

pub fn management_router(state: ManagementState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/seed", post(handlers::seed_management));

    let router = collection(
        router,
        "/api/professores",
        get(crud::list::<Professor>).post(crud::create::<Professor>),
    )
    .route(
        "/api/professores/:id",
        get(crud::fetch::<Professor>)
            .put(crud::update::<Professor>)
            .delete(crud::remove::<Professor>),
    );

    let router = collection(
        router,
        "/api/turmas",
        get(crud::list::<ClassGroup>).post(crud::create::<ClassGroup>),
    )
    .route(
        "/api/turmas/:id",
        get(crud::fetch::<ClassGroup>)
            .put(crud::update::<ClassGroup>)
            .delete(crud::remove::<ClassGroup>),
    );

    collection(
        router,
        "/api/alunos",
        get(crud::list::<Student>).post(crud::create::<Student>),
    )
    .route(
        "/api/alunos/:id",
        get(crud::fetch::<Student>)
            .put(crud::update::<Student>)
            .delete(crud::remove::<Student>),
    )
    .with_state(state)
}

pub fn activities_router(state: ActivitiesState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/seed", post(handlers::seed_activities));

    let router = collection(
        router,
        "/api/atividades",
        get(crud::list::<Activity>).post(activity_handlers::create_activity),
    )
    .route(
        "/api/atividades/:id",
        get(crud::fetch::<Activity>)
            .put(activity_handlers::update_activity)
            .delete(crud::remove::<Activity>),
    );

    collection(
        router,
        "/api/notas",
        get(crud::list::<Score>).post(activity_handlers::create_score),
    )
    .route(
        "/api/notas/:id",
        get(crud::fetch::<Score>)
            .put(activity_handlers::update_score)
            .delete(crud::remove::<Score>),
    )
    .with_state(state)
}

pub fn reservations_router(state: ReservationsState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/seed", post(handlers::seed_reservations));

    collection(
        router,
        "/api/reservas",
        get(crud::list::<Reservation>).post(reservation_handlers::create_reservation),
    )
    .route(
        "/api/reservas/:id",
        get(crud::fetch::<Reservation>)
            .put(reservation_handlers::update_reservation)
            .delete(crud::remove::<Reservation>),
    )
    .with_state(state)
}
