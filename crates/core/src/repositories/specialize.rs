//! Specializations linking doctors to the disease types they treat.

use crate::constants::EMAIL_MAX_LEN;
use crate::error::Entity;
use crate::repositories::helpers::{ensure_reference, map_insert_error, Reference};
use crate::validation::require_email;
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Specialize {
    /// Disease type (column `id`).
    #[serde(rename = "id")]
    #[sqlx(rename = "id")]
    pub type_id: i32,
    pub email: String,
}

fn key(type_id: i32, email: &str) -> String {
    format!("{}/{}", type_id, email)
}

pub struct SpecializeRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SpecializeRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, type_id: i32, email: &str) -> StoreResult<Option<Specialize>> {
        let row = sqlx::query_as::<_, Specialize>(
            "SELECT id, email FROM specialize WHERE id = ? AND email = ?",
        )
        .bind(type_id)
        .bind(email)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    pub async fn get(&mut self, type_id: i32, email: &str) -> StoreResult<Specialize> {
        self.find(type_id, email)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Specialize, key(type_id, email)))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<Specialize>> {
        let rows =
            sqlx::query_as::<_, Specialize>("SELECT id, email FROM specialize ORDER BY id, email")
                .fetch_all(&mut *self.conn)
                .await?;
        Ok(rows)
    }

    /// Specializations held by one doctor, ordered by disease type.
    pub async fn list_for_doctor(&mut self, email: &str) -> StoreResult<Vec<Specialize>> {
        let rows = sqlx::query_as::<_, Specialize>(
            "SELECT id, email FROM specialize WHERE email = ? ORDER BY id",
        )
        .bind(email)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if the disease type or the doctor is unknown.
    pub async fn create(&mut self, row: Specialize) -> StoreResult<Specialize> {
        require_email("email", &row.email, EMAIL_MAX_LEN)?;

        if self.find(row.type_id, &row.email).await?.is_some() {
            return Err(StoreError::conflict(
                Entity::Specialize,
                key(row.type_id, &row.email),
            ));
        }
        ensure_reference(&mut *self.conn, Reference::DiseaseType(row.type_id)).await?;
        ensure_reference(&mut *self.conn, Reference::Doctor(&row.email)).await?;

        sqlx::query("INSERT INTO specialize (id, email) VALUES (?, ?)")
            .bind(row.type_id)
            .bind(&row.email)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| map_insert_error(e, Entity::Specialize, key(row.type_id, &row.email)))?;

        tracing::debug!(id = row.type_id, email = %row.email, "specialization created");
        Ok(row)
    }

    pub async fn delete(&mut self, type_id: i32, email: &str) -> StoreResult<()> {
        self.get(type_id, email).await?;

        sqlx::query("DELETE FROM specialize WHERE id = ? AND email = ?")
            .bind(type_id)
            .bind(email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(id = type_id, email = %email, "specialization deleted");
        Ok(())
    }
}
