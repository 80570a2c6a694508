use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgArguments, PgPoolOptions, PgRow},
    query::Query,
    PgPool, Postgres, Row,
};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::Service;
use crate::model::{
    Activity, ClassGroup, Id, Professor, Reservation, Score, Stored, Student,
};
use crate::store::traits::{EntityStore, Mutator, SharedStore};

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// Row mapping for a record type stored in its own table.
///
/// `COLUMNS` excludes `id`, which every table declares as `BIGSERIAL PRIMARY KEY`
/// so that identifiers are never handed out twice.
pub trait PgEntity: Clone + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Column definitions for `CREATE TABLE`, without the id column
    const COLUMN_DEFS: &'static str;

    fn from_row(row: &PgRow) -> sqlx::Result<Self>;
    /// Bind the values of `COLUMNS`, in order
    fn bind<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q>;
}

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Create the service's tables if they do not exist yet
    pub async fn migrate(&self, service: Service) -> Result<()> {
        match service {
            Service::Management => {
                self.ensure_table::<Professor>().await?;
                self.ensure_table::<ClassGroup>().await?;
                self.ensure_table::<Student>().await?;
            }
            Service::Activities => {
                self.ensure_table::<Activity>().await?;
                self.ensure_table::<Score>().await?;
            }
            Service::Reservations => {
                self.ensure_table::<Reservation>().await?;
            }
        }
        Ok(())
    }

    /// Handle to the table for one record type
    pub fn table<T: PgEntity>(&self) -> SharedStore<T> {
        Arc::new(PgTable::<T> {
            pool: self.pool.clone(),
            _record: PhantomData,
        })
    }

    async fn ensure_table<T: PgEntity>(&self) -> Result<()> {
        sqlx::query(&create_table_sql::<T>(true))
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to create table {}", T::TABLE))?;
        Ok(())
    }
}

fn create_table_sql<T: PgEntity>(if_not_exists: bool) -> String {
    format!(
        "CREATE TABLE {}{} (id BIGSERIAL PRIMARY KEY, {})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        T::TABLE,
        T::COLUMN_DEFS
    )
}

fn select_sql<T: PgEntity>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

fn insert_sql<T: PgEntity>() -> String {
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

fn update_sql<T: PgEntity>() -> String {
    let assignments: Vec<String> = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ${}",
        T::TABLE,
        assignments.join(", "),
        T::COLUMNS.len() + 1
    )
}

fn stored_from_row<T: PgEntity>(row: &PgRow) -> sqlx::Result<Stored<T>> {
    Ok(Stored::new(row.try_get("id")?, T::from_row(row)?))
}

/// One record type's table inside a [`PostgresStore`]
pub struct PgTable<T> {
    pool: PgPool,
    _record: PhantomData<fn() -> T>,
}

#[async_trait::async_trait]
impl<T: PgEntity> EntityStore<T> for PgTable<T> {
    async fn create(&self, data: T) -> Result<Stored<T>> {
        let sql = insert_sql::<T>();
        let row = data
            .bind(sqlx::query(&sql))
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to insert into {}", T::TABLE))?;

        Ok(Stored::new(row.try_get("id")?, data))
    }

    async fn get(&self, id: Id) -> Result<Option<Stored<T>>> {
        let sql = format!("{} WHERE id = $1", select_sql::<T>());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to fetch from {}", T::TABLE))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(stored_from_row(&row)?))
    }

    async fn list(&self) -> Result<Vec<Stored<T>>> {
        let sql = format!("{} ORDER BY id", select_sql::<T>());
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to list {}", T::TABLE))?;

        let records = rows
            .iter()
            .map(stored_from_row::<T>)
            .collect::<sqlx::Result<Vec<_>>>()?;

        Ok(records)
    }

    async fn update(&self, id: Id, mutate: Mutator<T>) -> Result<Option<Stored<T>>> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;

        let sql = format!("{} WHERE id = $1 FOR UPDATE", select_sql::<T>());
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .with_context(|| format!("Failed to lock row in {}", T::TABLE))?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut record: Stored<T> = stored_from_row(&row)?;
        mutate(&mut record.data);

        let sql = update_sql::<T>();
        record
            .data
            .bind(sqlx::query(&sql))
            .bind(id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to update {}", T::TABLE))?;

        tx.commit().await.context("Failed to commit update")?;

        Ok(Some(record))
    }

    async fn delete(&self, id: Id) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete from {}", T::TABLE))?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", T::TABLE))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to drop {}", T::TABLE))?;
        sqlx::query(&create_table_sql::<T>(false))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to recreate {}", T::TABLE))?;

        tx.commit().await.context("Failed to commit reset")?;
        Ok(())
    }
}

impl PgEntity for Professor {
    const TABLE: &'static str = "professores";
    const COLUMNS: &'static [&'static str] = &["nome", "materia"];
    const COLUMN_DEFS: &'static str = "nome VARCHAR(100) NOT NULL, materia VARCHAR(100)";

    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            name: row.try_get("nome")?,
            subject: row.try_get("materia")?,
        })
    }

    fn bind<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.name.clone()).bind(self.subject.clone())
    }
}

impl PgEntity for ClassGroup {
    const TABLE: &'static str = "turmas";
    const COLUMNS: &'static [&'static str] = &["nome", "professor_id"];
    const COLUMN_DEFS: &'static str = "nome VARCHAR(100) NOT NULL, professor_id BIGINT";

    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            name: row.try_get("nome")?,
            professor_id: row.try_get("professor_id")?,
        })
    }

    fn bind<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.name.clone()).bind(self.professor_id)
    }
}

impl PgEntity for Student {
    const TABLE: &'static str = "alunos";
    const COLUMNS: &'static [&'static str] = &["nome", "turma_id"];
    const COLUMN_DEFS: &'static str = "nome VARCHAR(100) NOT NULL, turma_id BIGINT";

    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            name: row.try_get("nome")?,
            class_group_id: row.try_get("turma_id")?,
        })
    }

    fn bind<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.name.clone()).bind(self.class_group_id)
    }
}

impl PgEntity for Activity {
    const TABLE: &'static str = "atividades";
    const COLUMNS: &'static [&'static str] =
        &["titulo", "descricao", "nota", "professor_id", "turma_id"];
    const COLUMN_DEFS: &'static str = "titulo VARCHAR(100) NOT NULL, descricao VARCHAR(255), \
         nota DOUBLE PRECISION, professor_id BIGINT NOT NULL, turma_id BIGINT NOT NULL";

    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            title: row.try_get("titulo")?,
            description: row.try_get("descricao")?,
            grade: row.try_get("nota")?,
            professor_id: row.try_get("professor_id")?,
            class_group_id: row.try_get("turma_id")?,
        })
    }

    fn bind<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.title.clone())
            .bind(self.description.clone())
            .bind(self.grade)
            .bind(self.professor_id)
            .bind(self.class_group_id)
    }
}

impl PgEntity for Score {
    const TABLE: &'static str = "notas";
    const COLUMNS: &'static [&'static str] = &["valor", "aluno_id", "atividade_id"];
    const COLUMN_DEFS: &'static str =
        "valor DOUBLE PRECISION NOT NULL, aluno_id BIGINT NOT NULL, atividade_id BIGINT NOT NULL";

    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            value: row.try_get("valor")?,
            student_id: row.try_get("aluno_id")?,
            activity_id: row.try_get("atividade_id")?,
        })
    }

    fn bind<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.value)
            .bind(self.student_id)
            .bind(self.activity_id)
    }
}

impl PgEntity for Reservation {
    const TABLE: &'static str = "reservas";
    const COLUMNS: &'static [&'static str] = &["sala", "data_reserva", "turma_id"];
    const COLUMN_DEFS: &'static str =
        "sala VARCHAR(100) NOT NULL, data_reserva VARCHAR(20) NOT NULL, turma_id BIGINT NOT NULL";

    fn from_row(row: &PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            room: row.try_get("sala")?,
            reservation_date: row.try_get("data_reserva")?,
            class_group_id: row.try_get("turma_id")?,
        })
    }

    fn bind<'q>(&self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.room.clone())
            .bind(self.reservation_date.clone())
            .bind(self.class_group_id)
    }
}
