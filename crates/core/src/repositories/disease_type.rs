//! Disease types, the classification diseases and doctor specializations hang off.

use crate::constants::DESCRIPTION_MAX_LEN;
use crate::error::Entity;
use crate::repositories::helpers::{ensure_unreferenced, map_insert_error};
use crate::validation::require_text;
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DiseaseType {
    pub id: i32,
    pub description: String,
}

impl DiseaseType {
    pub fn validate(&self) -> StoreResult<()> {
        require_text("description", &self.description, DESCRIPTION_MAX_LEN)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct DiseaseTypePatch {
    pub description: Option<String>,
}

pub struct DiseaseTypeRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> DiseaseTypeRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, id: i32) -> StoreResult<Option<DiseaseType>> {
        let disease_type = sqlx::query_as::<_, DiseaseType>(
            "SELECT id, description FROM disease_type WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(disease_type)
    }

    pub async fn get(&mut self, id: i32) -> StoreResult<DiseaseType> {
        self.find(id)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::DiseaseType, id))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<DiseaseType>> {
        let types =
            sqlx::query_as::<_, DiseaseType>("SELECT id, description FROM disease_type ORDER BY id")
                .fetch_all(&mut *self.conn)
                .await?;
        Ok(types)
    }

    pub async fn create(&mut self, disease_type: DiseaseType) -> StoreResult<DiseaseType> {
        disease_type.validate()?;

        if self.find(disease_type.id).await?.is_some() {
            return Err(StoreError::conflict(Entity::DiseaseType, disease_type.id));
        }

        sqlx::query("INSERT INTO disease_type (id, description) VALUES (?, ?)")
            .bind(disease_type.id)
            .bind(&disease_type.description)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| map_insert_error(e, Entity::DiseaseType, disease_type.id))?;

        tracing::debug!(id = disease_type.id, "disease type created");
        Ok(disease_type)
    }

    pub async fn update(&mut self, id: i32, patch: DiseaseTypePatch) -> StoreResult<DiseaseType> {
        let mut disease_type = self.get(id).await?;
        if let Some(description) = patch.description {
            disease_type.description = description;
        }
        disease_type.validate()?;

        sqlx::query("UPDATE disease_type SET description = ? WHERE id = ?")
            .bind(&disease_type.description)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(id, "disease type updated");
        Ok(disease_type)
    }

    pub async fn delete(&mut self, id: i32) -> StoreResult<()> {
        self.get(id).await?;

        ensure_unreferenced(
            &mut *self.conn,
            Entity::DiseaseType,
            id,
            &[
                (Entity::Disease, "SELECT 1 FROM disease WHERE id = ? LIMIT 1"),
                (Entity::Specialize, "SELECT 1 FROM specialize WHERE id = ? LIMIT 1"),
            ],
        )
        .await?;

        sqlx::query("DELETE FROM disease_type WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(id, "disease type deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;
    use crate::Store;

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();

        uow.disease_types()
            .create(fixtures::disease_type(7))
            .await
            .unwrap();
        let updated = uow
            .disease_types()
            .update(
                7,
                DiseaseTypePatch {
                    description: Some("Bacterial infection".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "Bacterial infection");

        uow.disease_types().delete(7).await.unwrap();
        assert!(uow.disease_types().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_description() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();
        uow.disease_types()
            .create(fixtures::disease_type(7))
            .await
            .unwrap();

        let err = uow
            .disease_types()
            .update(
                7,
                DiseaseTypePatch {
                    description: Some("  ".into()),
                },
            )
            .await
            .expect_err("blank description should fail");
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(
            uow.disease_types().get(7).await.unwrap().description,
            "Viral infection"
        );
    }

    #[tokio::test]
    async fn test_delete_is_restricted_while_diseases_reference_it() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .disease_types()
            .delete(1)
            .await
            .expect_err("referenced type should not be deleted");
        assert!(matches!(
            err,
            StoreError::InUse {
                dependent: Entity::Disease,
                ..
            }
        ));
    }
}
