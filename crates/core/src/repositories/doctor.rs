//! Doctors: users with a degree and salary, specialised in disease types.

use crate::constants::{DEGREE_MAX_LEN, EMAIL_MAX_LEN};
use crate::error::Entity;
use crate::repositories::helpers::{
    ensure_reference, ensure_unreferenced, map_insert_error, Reference,
};
use crate::validation::{require_email, require_non_negative, require_text};
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Doctor {
    pub email: String,
    pub degree: String,
    pub salary: i32,
}

impl Doctor {
    pub fn validate(&self) -> StoreResult<()> {
        require_email("email", &self.email, EMAIL_MAX_LEN)?;
        require_text("degree", &self.degree, DEGREE_MAX_LEN)?;
        require_non_negative("salary", i64::from(self.salary))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct DoctorPatch {
    pub degree: Option<String>,
    pub salary: Option<i32>,
}

impl DoctorPatch {
    fn apply(self, doctor: &mut Doctor) {
        if let Some(degree) = self.degree {
            doctor.degree = degree;
        }
        if let Some(salary) = self.salary {
            doctor.salary = salary;
        }
    }
}

pub struct DoctorRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> DoctorRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, email: &str) -> StoreResult<Option<Doctor>> {
        let doctor =
            sqlx::query_as::<_, Doctor>("SELECT email, degree, salary FROM doctor WHERE email = ?")
                .bind(email)
                .fetch_optional(&mut *self.conn)
                .await?;
        Ok(doctor)
    }

    pub async fn get(&mut self, email: &str) -> StoreResult<Doctor> {
        self.find(email)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Doctor, email))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<Doctor>> {
        let doctors =
            sqlx::query_as::<_, Doctor>("SELECT email, degree, salary FROM doctor ORDER BY email")
                .fetch_all(&mut *self.conn)
                .await?;
        Ok(doctors)
    }

    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email is already a doctor and
    /// `StoreError::InvalidReference` if it has no user row.
    pub async fn create(&mut self, doctor: Doctor) -> StoreResult<Doctor> {
        doctor.validate()?;

        if self.find(&doctor.email).await?.is_some() {
            return Err(StoreError::conflict(Entity::Doctor, &doctor.email));
        }
        ensure_reference(&mut *self.conn, Reference::User(&doctor.email)).await?;

        sqlx::query("INSERT INTO doctor (email, degree, salary) VALUES (?, ?, ?)")
            .bind(&doctor.email)
            .bind(&doctor.degree)
            .bind(doctor.salary)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| map_insert_error(e, Entity::Doctor, &doctor.email))?;

        tracing::debug!(email = %doctor.email, "doctor created");
        Ok(doctor)
    }

    pub async fn update(&mut self, email: &str, patch: DoctorPatch) -> StoreResult<Doctor> {
        let mut doctor = self.get(email).await?;
        patch.apply(&mut doctor);
        doctor.validate()?;

        sqlx::query("UPDATE doctor SET degree = ?, salary = ? WHERE email = ?")
            .bind(&doctor.degree)
            .bind(doctor.salary)
            .bind(email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, "doctor updated");
        Ok(doctor)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InUse` while the doctor still has specializations.
    pub async fn delete(&mut self, email: &str) -> StoreResult<()> {
        self.get(email).await?;

        ensure_unreferenced(
            &mut *self.conn,
            Entity::Doctor,
            email,
            &[(
                Entity::Specialize,
                "SELECT 1 FROM specialize WHERE email = ? LIMIT 1",
            )],
        )
        .await?;

        sqlx::query("DELETE FROM doctor WHERE email = ?")
            .bind(email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, "doctor deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;

    #[tokio::test]
    async fn test_create_requires_user_row() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .doctors()
            .create(fixtures::doctor("doc@b.com"))
            .await
            .expect_err("doctor without user should fail");
        assert!(matches!(
            err,
            StoreError::InvalidReference {
                entity: Entity::User,
                ..
            }
        ));
        assert!(uow.doctors().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();
        uow.users()
            .create(fixtures::user("doc@b.com", "Cyprus"))
            .await
            .unwrap();

        uow.doctors()
            .create(fixtures::doctor("doc@b.com"))
            .await
            .unwrap();
        assert!(matches!(
            uow.doctors().create(fixtures::doctor("doc@b.com")).await,
            Err(StoreError::Conflict { .. })
        ));

        let updated = uow
            .doctors()
            .update(
                "doc@b.com",
                DoctorPatch {
                    salary: Some(6_500),
                    ..DoctorPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.degree, "MD");
        assert_eq!(updated.salary, 6_500);

        uow.doctors().delete("doc@b.com").await.unwrap();
        assert!(uow.doctors().list().await.unwrap().is_empty());
        assert!(matches!(
            uow.doctors().get("doc@b.com").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_overlong_degree() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();
        uow.users()
            .create(fixtures::user("doc@b.com", "Cyprus"))
            .await
            .unwrap();
        uow.doctors()
            .create(fixtures::doctor("doc@b.com"))
            .await
            .unwrap();

        let err = uow
            .doctors()
            .update(
                "doc@b.com",
                DoctorPatch {
                    degree: Some("D".repeat(DEGREE_MAX_LEN + 1)),
                    ..DoctorPatch::default()
                },
            )
            .await
            .expect_err("overlong degree should fail");
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(uow.doctors().get("doc@b.com").await.unwrap().degree, "MD");
    }
}
