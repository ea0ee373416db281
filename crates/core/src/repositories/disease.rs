//! Diseases, keyed by their code and classified by a disease type.

use crate::constants::{DESCRIPTION_MAX_LEN, DISEASE_CODE_MAX_LEN, PATHOGEN_MAX_LEN};
use crate::error::Entity;
use crate::repositories::helpers::{
    ensure_reference, ensure_unreferenced, map_insert_error, Reference,
};
use crate::validation::require_text;
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Disease {
    pub disease_code: String,
    pub pathogen: String,
    pub description: String,
    /// Disease type this disease belongs to (column `id`).
    #[serde(rename = "id")]
    #[sqlx(rename = "id")]
    pub type_id: i32,
}

impl Disease {
    pub fn validate(&self) -> StoreResult<()> {
        require_text("disease_code", &self.disease_code, DISEASE_CODE_MAX_LEN)?;
        require_text("pathogen", &self.pathogen, PATHOGEN_MAX_LEN)?;
        require_text("description", &self.description, DESCRIPTION_MAX_LEN)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct DiseasePatch {
    pub pathogen: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "id")]
    pub type_id: Option<i32>,
}

impl DiseasePatch {
    fn apply(self, disease: &mut Disease) {
        if let Some(pathogen) = self.pathogen {
            disease.pathogen = pathogen;
        }
        if let Some(description) = self.description {
            disease.description = description;
        }
        if let Some(type_id) = self.type_id {
            disease.type_id = type_id;
        }
    }
}

pub struct DiseaseRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> DiseaseRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, disease_code: &str) -> StoreResult<Option<Disease>> {
        let disease = sqlx::query_as::<_, Disease>(
            "SELECT disease_code, pathogen, description, id FROM disease WHERE disease_code = ?",
        )
        .bind(disease_code)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(disease)
    }

    pub async fn get(&mut self, disease_code: &str) -> StoreResult<Disease> {
        self.find(disease_code)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Disease, disease_code))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<Disease>> {
        let diseases = sqlx::query_as::<_, Disease>(
            "SELECT disease_code, pathogen, description, id FROM disease ORDER BY disease_code",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(diseases)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if the disease type does not exist.
    pub async fn create(&mut self, disease: Disease) -> StoreResult<Disease> {
        disease.validate()?;

        if self.find(&disease.disease_code).await?.is_some() {
            return Err(StoreError::conflict(Entity::Disease, &disease.disease_code));
        }
        ensure_reference(&mut *self.conn, Reference::DiseaseType(disease.type_id)).await?;

        sqlx::query(
            "INSERT INTO disease (disease_code, pathogen, description, id) VALUES (?, ?, ?, ?)",
        )
        .bind(&disease.disease_code)
        .bind(&disease.pathogen)
        .bind(&disease.description)
        .bind(disease.type_id)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| map_insert_error(e, Entity::Disease, &disease.disease_code))?;

        tracing::debug!(disease_code = %disease.disease_code, "disease created");
        Ok(disease)
    }

    pub async fn update(&mut self, disease_code: &str, patch: DiseasePatch) -> StoreResult<Disease> {
        let mut disease = self.get(disease_code).await?;
        patch.apply(&mut disease);
        disease.validate()?;
        ensure_reference(&mut *self.conn, Reference::DiseaseType(disease.type_id)).await?;

        sqlx::query(
            "UPDATE disease SET pathogen = ?, description = ?, id = ? WHERE disease_code = ?",
        )
        .bind(&disease.pathogen)
        .bind(&disease.description)
        .bind(disease.type_id)
        .bind(&disease.disease_code)
        .execute(&mut *self.conn)
        .await?;

        tracing::debug!(disease_code = %disease.disease_code, "disease updated");
        Ok(disease)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InUse` while discoveries, patient diagnoses or records mention it.
    pub async fn delete(&mut self, disease_code: &str) -> StoreResult<()> {
        self.get(disease_code).await?;

        ensure_unreferenced(
            &mut *self.conn,
            Entity::Disease,
            disease_code,
            &[
                (
                    Entity::Discover,
                    "SELECT 1 FROM discover WHERE disease_code = ? LIMIT 1",
                ),
                (
                    Entity::PatientDisease,
                    "SELECT 1 FROM patient_disease WHERE disease_code = ? LIMIT 1",
                ),
                (
                    Entity::Record,
                    "SELECT 1 FROM record WHERE disease_code = ? LIMIT 1",
                ),
            ],
        )
        .await?;

        sqlx::query("DELETE FROM disease WHERE disease_code = ?")
            .bind(disease_code)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(disease_code = %disease_code, "disease deleted");
        Ok(())
    }
}
