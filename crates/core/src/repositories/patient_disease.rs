//! Diagnoses linking a patient to a disease.

use crate::constants::{DISEASE_CODE_MAX_LEN, EMAIL_MAX_LEN};
use crate::error::Entity;
use crate::repositories::helpers::{ensure_reference, map_insert_error, Reference};
use crate::validation::{require_email, require_non_negative, require_text};
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PatientDisease {
    pub email: String,
    pub disease_code: String,
    pub salary: i32,
}

impl PatientDisease {
    pub fn validate(&self) -> StoreResult<()> {
        require_email("email", &self.email, EMAIL_MAX_LEN)?;
        require_text("disease_code", &self.disease_code, DISEASE_CODE_MAX_LEN)?;
        require_non_negative("salary", i64::from(self.salary))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct PatientDiseasePatch {
    pub salary: Option<i32>,
}

fn key(email: &str, disease_code: &str) -> String {
    format!("{}/{}", email, disease_code)
}

pub struct PatientDiseaseRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> PatientDiseaseRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(
        &mut self,
        email: &str,
        disease_code: &str,
    ) -> StoreResult<Option<PatientDisease>> {
        let row = sqlx::query_as::<_, PatientDisease>(
            "SELECT email, disease_code, salary FROM patient_disease \
             WHERE email = ? AND disease_code = ?",
        )
        .bind(email)
        .bind(disease_code)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    pub async fn get(&mut self, email: &str, disease_code: &str) -> StoreResult<PatientDisease> {
        self.find(email, disease_code)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::PatientDisease, key(email, disease_code)))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<PatientDisease>> {
        let rows = sqlx::query_as::<_, PatientDisease>(
            "SELECT email, disease_code, salary FROM patient_disease ORDER BY email, disease_code",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows)
    }

    pub async fn create(&mut self, row: PatientDisease) -> StoreResult<PatientDisease> {
        row.validate()?;

        if self.find(&row.email, &row.disease_code).await?.is_some() {
            return Err(StoreError::conflict(
                Entity::PatientDisease,
                key(&row.email, &row.disease_code),
            ));
        }
        ensure_reference(&mut *self.conn, Reference::Patient(&row.email)).await?;
        ensure_reference(&mut *self.conn, Reference::Disease(&row.disease_code)).await?;

        sqlx::query("INSERT INTO patient_disease (email, disease_code, salary) VALUES (?, ?, ?)")
            .bind(&row.email)
            .bind(&row.disease_code)
            .bind(row.salary)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| {
                map_insert_error(
                    e,
                    Entity::PatientDisease,
                    key(&row.email, &row.disease_code),
                )
            })?;

        tracing::debug!(email = %row.email, disease_code = %row.disease_code, "diagnosis created");
        Ok(row)
    }

    pub async fn update(
        &mut self,
        email: &str,
        disease_code: &str,
        patch: PatientDiseasePatch,
    ) -> StoreResult<PatientDisease> {
        let mut row = self.get(email, disease_code).await?;
        if let Some(salary) = patch.salary {
            row.salary = salary;
        }
        row.validate()?;

        sqlx::query("UPDATE patient_disease SET salary = ? WHERE email = ? AND disease_code = ?")
            .bind(row.salary)
            .bind(email)
            .bind(disease_code)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, disease_code = %disease_code, "diagnosis updated");
        Ok(row)
    }

    pub async fn delete(&mut self, email: &str, disease_code: &str) -> StoreResult<()> {
        self.get(email, disease_code).await?;

        sqlx::query("DELETE FROM patient_disease WHERE email = ? AND disease_code = ?")
            .bind(email)
            .bind(disease_code)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, disease_code = %disease_code, "diagnosis deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;
    use crate::repositories::patient::Patient;

    fn diagnosis() -> PatientDisease {
        PatientDisease {
            email: "p@b.com".into(),
            disease_code: "COVID-19".into(),
            salary: 1_200,
        }
    }

    #[tokio::test]
    async fn test_requires_a_patient_row_not_just_a_user() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();
        uow.users()
            .create(fixtures::user("p@b.com", "Cyprus"))
            .await
            .unwrap();

        let err = uow
            .patient_diseases()
            .create(diagnosis())
            .await
            .expect_err("user without patient row should fail");
        assert!(matches!(
            err,
            StoreError::InvalidReference {
                entity: Entity::Patient,
                ..
            }
        ));

        uow.patients()
            .create(Patient {
                email: "p@b.com".into(),
            })
            .await
            .unwrap();
        uow.patient_diseases().create(diagnosis()).await.unwrap();

        // The diagnosis now keeps the patient alive.
        assert!(matches!(
            uow.patients().delete("p@b.com").await,
            Err(StoreError::InUse {
                dependent: Entity::PatientDisease,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_update_salary_then_delete() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();
        uow.users()
            .create(fixtures::user("p@b.com", "Cyprus"))
            .await
            .unwrap();
        uow.patients()
            .create(Patient {
                email: "p@b.com".into(),
            })
            .await
            .unwrap();
        uow.patient_diseases().create(diagnosis()).await.unwrap();

        let updated = uow
            .patient_diseases()
            .update(
                "p@b.com",
                "COVID-19",
                PatientDiseasePatch { salary: Some(900) },
            )
            .await
            .unwrap();
        assert_eq!(updated.salary, 900);

        uow.patient_diseases()
            .delete("p@b.com", "COVID-19")
            .await
            .unwrap();
        assert!(matches!(
            uow.patient_diseases().get("p@b.com", "COVID-19").await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
