//! Patients: a role row keyed by the user's email, with no columns of its own.

use crate::constants::EMAIL_MAX_LEN;
use crate::error::Entity;
use crate::repositories::helpers::{
    ensure_reference, ensure_unreferenced, map_insert_error, Reference,
};
use crate::validation::require_email;
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Patient {
    pub email: String,
}

pub struct PatientRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> PatientRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, email: &str) -> StoreResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>("SELECT email FROM patient WHERE email = ?")
            .bind(email)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(patient)
    }

    pub async fn get(&mut self, email: &str) -> StoreResult<Patient> {
        self.find(email)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Patient, email))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>("SELECT email FROM patient ORDER BY email")
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(patients)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if no user has this email.
    pub async fn create(&mut self, patient: Patient) -> StoreResult<Patient> {
        require_email("email", &patient.email, EMAIL_MAX_LEN)?;

        if self.find(&patient.email).await?.is_some() {
            return Err(StoreError::conflict(Entity::Patient, &patient.email));
        }
        ensure_reference(&mut *self.conn, Reference::User(&patient.email)).await?;

        sqlx::query("INSERT INTO patient (email) VALUES (?)")
            .bind(&patient.email)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| map_insert_error(e, Entity::Patient, &patient.email))?;

        tracing::debug!(email = %patient.email, "patient created");
        Ok(patient)
    }

    pub async fn delete(&mut self, email: &str) -> StoreResult<()> {
        self.get(email).await?;

        ensure_unreferenced(
            &mut *self.conn,
            Entity::Patient,
            email,
            &[(
                Entity::PatientDisease,
                "SELECT 1 FROM patient_disease WHERE email = ? LIMIT 1",
            )],
        )
        .await?;

        sqlx::query("DELETE FROM patient WHERE email = ?")
            .bind(email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, "patient deleted");
        Ok(())
    }
}
