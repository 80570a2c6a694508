use anyhow::Result;
use log::info;
use serde::Serialize;

use crate::api::state::{ActivitiesState, ManagementState, ReservationsState};
use crate::model::{Activity, ClassGroup, Professor, Reservation, Score, Stored, Student};
use crate::store::traits::{EntityStore, SharedStore};

#[derive(Debug, Serialize)]
pub struct ManagementSeed {
    pub message: String,
    #[serde(rename = "professores")]
    pub professors: Vec<Stored<Professor>>,
    #[serde(rename = "turmas")]
    pub class_groups: Vec<Stored<ClassGroup>>,
    #[serde(rename = "alunos")]
    pub students: Vec<Stored<Student>>,
}

#[derive(Debug, Serialize)]
pub struct ActivitiesSeed {
    pub message: String,
    #[serde(rename = "atividades")]
    pub activities: Vec<Stored<Activity>>,
    #[serde(rename = "notas")]
    pub scores: Vec<Stored<Score>>,
}

#[derive(Debug, Serialize)]
pub struct ReservationsSeed {
    pub message: String,
    #[serde(rename = "reservas")]
    pub reservations: Vec<Stored<Reservation>>,
}

async fn insert_all<T: Send + 'static>(
    store: &SharedStore<T>,
    rows: Vec<T>,
) -> Result<Vec<Stored<T>>> {
    let mut created = Vec::with_capacity(rows.len());
    for row in rows {
        created.push(store.create(row).await?);
    }
    Ok(created)
}

/// Wipe the management tables and load two professors, two class groups
/// and three students. Class groups and students point at the rows
/// created here.
pub async fn seed_management(state: &ManagementState) -> Result<ManagementSeed> {
    state.students.reset().await?;
    state.class_groups.reset().await?;
    state.professors.reset().await?;

    let professors = insert_all(
        &state.professors,
        vec![
            Professor::new("Marcos Paulo", Some("Matemática".to_string())),
            Professor::new("Ana Beatriz", Some("Português".to_string())),
        ],
    )
    .await?;

    let class_groups = insert_all(
        &state.class_groups,
        vec![
            ClassGroup::new("1A", Some(professors[0].id)),
            ClassGroup::new("2B", Some(professors[1].id)),
        ],
    )
    .await?;

    let students = insert_all(
        &state.students,
        vec![
            Student::new("Carlos", Some(class_groups[0].id)),
            Student::new("Fernanda", Some(class_groups[0].id)),
            Student::new("Rafaela", Some(class_groups[1].id)),
        ],
    )
    .await?;

    info!(
        "Seeded management: {} professors, {} class groups, {} students",
        professors.len(),
        class_groups.len(),
        students.len()
    );

    Ok(ManagementSeed {
        message: "Banco populado com sucesso!".to_string(),
        professors,
        class_groups,
        students,
    })
}

/// Activities name management ids 1 and 2 without asking the management
/// service; scores point at the activities created here.
pub async fn seed_activities(state: &ActivitiesState) -> Result<ActivitiesSeed> {
    state.scores.reset().await?;
    state.activities.reset().await?;

    let activities = insert_all(
        &state.activities,
        vec![
            Activity::new("Prova de Matemática", 1, 1)
                .with_description("Geometria Espacial")
                .with_grade(8.5),
            Activity::new("Redação", 2, 2)
                .with_description("Tema: Meio Ambiente")
                .with_grade(9.0),
        ],
    )
    .await?;

    let scores = insert_all(
        &state.scores,
        vec![
            Score::new(9.5, 1, activities[0].id),
            Score::new(8.0, 2, activities[0].id),
            Score::new(9.8, 3, activities[1].id),
        ],
    )
    .await?;

    info!(
        "Seeded activities: {} activities, {} scores",
        activities.len(),
        scores.len()
    );

    Ok(ActivitiesSeed {
        message: "Banco de atividades e notas populado!".to_string(),
        activities,
        scores,
    })
}

pub async fn seed_reservations(state: &ReservationsState) -> Result<ReservationsSeed> {
    state.reservations.reset().await?;

    let reservations = insert_all(
        &state.reservations,
        vec![
            Reservation::new("Sala 101", "2025-11-20", 1),
            Reservation::new("Sala 202", "2025-11-21", 2),
        ],
    )
    .await?;

    info!("Seeded {} reservations", reservations.len());

    Ok(ReservationsSeed {
        message: "Banco de reservas populado!".to_string(),
        reservations,
    })
}
