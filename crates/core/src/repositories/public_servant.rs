//! Public servants: users who file epidemiological records.

use crate::constants::{DEPARTMENT_MAX_LEN, EMAIL_MAX_LEN};
use crate::error::Entity;
use crate::repositories::helpers::{
    ensure_reference, ensure_unreferenced, map_insert_error, Reference,
};
use crate::validation::{require_email, require_text};
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PublicServant {
    pub email: String,
    pub department: String,
}

impl PublicServant {
    pub fn validate(&self) -> StoreResult<()> {
        require_email("email", &self.email, EMAIL_MAX_LEN)?;
        require_text("department", &self.department, DEPARTMENT_MAX_LEN)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct PublicServantPatch {
    pub department: Option<String>,
}

pub struct PublicServantRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> PublicServantRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, email: &str) -> StoreResult<Option<PublicServant>> {
        let servant = sqlx::query_as::<_, PublicServant>(
            "SELECT email, department FROM public_servant WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(servant)
    }

    pub async fn get(&mut self, email: &str) -> StoreResult<PublicServant> {
        self.find(email)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::PublicServant, email))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<PublicServant>> {
        let servants = sqlx::query_as::<_, PublicServant>(
            "SELECT email, department FROM public_servant ORDER BY email",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(servants)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if the email has no user row.
    pub async fn create(&mut self, servant: PublicServant) -> StoreResult<PublicServant> {
        servant.validate()?;

        if self.find(&servant.email).await?.is_some() {
            return Err(StoreError::conflict(Entity::PublicServant, &servant.email));
        }
        ensure_reference(&mut *self.conn, Reference::User(&servant.email)).await?;

        sqlx::query("INSERT INTO public_servant (email, department) VALUES (?, ?)")
            .bind(&servant.email)
            .bind(&servant.department)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| map_insert_error(e, Entity::PublicServant, &servant.email))?;

        tracing::debug!(email = %servant.email, "public servant created");
        Ok(servant)
    }

    pub async fn update(
        &mut self,
        email: &str,
        patch: PublicServantPatch,
    ) -> StoreResult<PublicServant> {
        let mut servant = self.get(email).await?;
        if let Some(department) = patch.department {
            servant.department = department;
        }
        servant.validate()?;

        sqlx::query("UPDATE public_servant SET department = ? WHERE email = ?")
            .bind(&servant.department)
            .bind(email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, "public servant updated");
        Ok(servant)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InUse` while records filed by this servant exist.
    pub async fn delete(&mut self, email: &str) -> StoreResult<()> {
        self.get(email).await?;

        ensure_unreferenced(
            &mut *self.conn,
            Entity::PublicServant,
            email,
            &[(Entity::Record, "SELECT 1 FROM record WHERE email = ? LIMIT 1")],
        )
        .await?;

        sqlx::query("DELETE FROM public_servant WHERE email = ?")
            .bind(email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, "public servant deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;

    #[tokio::test]
    async fn test_seeded_servant_is_listed() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        assert_eq!(
            uow.public_servants().list().await.unwrap(),
            vec![fixtures::public_servant("ps@gov.cy")]
        );
    }

    #[tokio::test]
    async fn test_create_twice_is_conflict() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        assert!(matches!(
            uow.public_servants()
                .create(fixtures::public_servant("ps@gov.cy"))
                .await,
            Err(StoreError::Conflict {
                entity: Entity::PublicServant,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_update_department() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        let updated = uow
            .public_servants()
            .update(
                "ps@gov.cy",
                PublicServantPatch {
                    department: Some("Surveillance".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.department, "Surveillance");
    }

    #[tokio::test]
    async fn test_delete_then_user_can_be_deleted() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        uow.public_servants().delete("ps@gov.cy").await.unwrap();
        uow.users().delete("ps@gov.cy").await.unwrap();
        assert!(uow.users().find("ps@gov.cy").await.unwrap().is_none());
    }
}
