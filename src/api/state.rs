use std::sync::Arc;

use axum::extract::FromRef;

use crate::logic::reference::{ForeignKey, LocalLookup, RemoteService};
use crate::model::{Activity, ClassGroup, Professor, Reservation, Score, Student};
use crate::store::memory::MemoryStore;
use crate::store::traits::SharedStore;

/// Tables owned by the management service. It depends on nobody.
#[derive(Clone)]
pub struct ManagementState {
    pub professors: SharedStore<Professor>,
    pub class_groups: SharedStore<ClassGroup>,
    pub students: SharedStore<Student>,
}

impl ManagementState {
    pub fn new(
        professors: SharedStore<Professor>,
        class_groups: SharedStore<ClassGroup>,
        students: SharedStore<Student>,
    ) -> Self {
        Self {
            professors,
            class_groups,
            students,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::shared(), MemoryStore::shared(), MemoryStore::shared())
    }
}

/// Activities and scores, plus the checks their writes go through
#[derive(Clone)]
pub struct ActivitiesState {
    pub activities: SharedStore<Activity>,
    pub scores: SharedStore<Score>,
    pub professor_ref: ForeignKey,
    pub class_group_ref: ForeignKey,
    pub student_ref: ForeignKey,
    /// Scores point at activities in this same service
    pub activity_ref: ForeignKey,
}

impl ActivitiesState {
    /// `management` is rooted at the management API, e.g. `http://host:8001/api`
    pub fn new(
        activities: SharedStore<Activity>,
        scores: SharedStore<Score>,
        management: &RemoteService,
    ) -> Self {
        let professor_ref = ForeignKey::new(
            "professor_id",
            "professores",
            Arc::new(management.resource("professores")),
            |id| format!("Professor {} não encontrado.", id),
            "Falha ao conectar ao serviço de gerenciamento (professores).",
        );
        let class_group_ref = ForeignKey::new(
            "turma_id",
            "turmas",
            Arc::new(management.resource("turmas")),
            |id| format!("Turma {} não encontrada.", id),
            "Falha ao conectar ao serviço de gerenciamento (turmas).",
        );
        let student_ref = ForeignKey::new(
            "aluno_id",
            "alunos",
            Arc::new(management.resource("alunos")),
            |id| format!("Aluno {} não encontrado.", id),
            "Falha ao conectar ao serviço de gerenciamento (alunos).",
        );
        let activity_ref = ForeignKey::new(
            "atividade_id",
            "atividades",
            Arc::new(LocalLookup::new(activities.clone())),
            |id| format!("Atividade {} não encontrada.", id),
            "Falha ao consultar as atividades.",
        );

        Self {
            activities,
            scores,
            professor_ref,
            class_group_ref,
            student_ref,
            activity_ref,
        }
    }

    pub fn in_memory(management: &RemoteService) -> Self {
        Self::new(MemoryStore::shared(), MemoryStore::shared(), management)
    }
}

/// Reservations, checked against the management service's class groups.
///
/// Create and update do not resolve the class group the same way: create
/// treats the configured URL as the class-group collection (`{base}/{id}`),
/// update appends `turmas` to it (`{base}/turmas/{id}`). With the default
/// `.../api/turmas` base the update path doubles the segment; both are kept
/// as deployed.
#[derive(Clone)]
pub struct ReservationsState {
    pub reservations: SharedStore<Reservation>,
    pub class_group_on_create: ForeignKey,
    pub class_group_on_update: ForeignKey,
}

impl ReservationsState {
    pub fn new(reservations: SharedStore<Reservation>, management: &RemoteService) -> Self {
        let class_group_on_create = ForeignKey::new(
            "turma_id",
            "turmas",
            Arc::new(management.collection()),
            |id| format!("Turma {} não encontrada no serviço de gerenciamento.", id),
            "Falha ao conectar ao serviço de gerenciamento.",
        );
        let class_group_on_update = ForeignKey::new(
            "turma_id",
            "turmas",
            Arc::new(management.resource("turmas")),
            |id| format!("Turma {} não encontrada.", id),
            "Falha ao conectar ao serviço de gerenciamento.",
        );

        Self {
            reservations,
            class_group_on_create,
            class_group_on_update,
        }
    }

    pub fn in_memory(management: &RemoteService) -> Self {
        Self::new(MemoryStore::shared(), management)
    }
}

impl FromRef<ManagementState> for SharedStore<Professor> {
    fn from_ref(state: &ManagementState) -> Self {
        state.professors.clone()
    }
}

impl FromRef<ManagementState> for SharedStore<ClassGroup> {
    fn from_ref(state: &ManagementState) -> Self {
        state.class_groups.clone()
    }
}

impl FromRef<ManagementState> for SharedStore<Student> {
    fn from_ref(state: &ManagementState) -> Self {
        state.students.clone()
    }
}

impl FromRef<ActivitiesState> for SharedStore<Activity> {
    fn from_ref(state: &ActivitiesState) -> Self {
        state.activities.clone()
    }
}

impl FromRef<ActivitiesState> for SharedStore<Score> {
    fn from_ref(state: &ActivitiesState) -> Self {
        state.scores.clone()
    }
}

impl FromRef<ReservationsState> for SharedStore<Reservation> {
    fn from_ref(state: &ReservationsState) -> Self {
        state.reservations.clone()
    }
}
