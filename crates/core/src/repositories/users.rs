//! Users: the base row shared by patients, doctors and public servants.
//!
//! The email is the identity for the whole hierarchy; a role row (doctor, patient, public
//! servant) can only exist for an email that already has a user row.

use crate::constants::{CNAME_MAX_LEN, EMAIL_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN, SURNAME_MAX_LEN};
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
pub struct User {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub cname: String,
}

impl User {
    pub fn validate(&self) -> StoreResult<()> {
        require_email("email", &self.email, EMAIL_MAX_LEN)?;
        require_text("name", &self.name, NAME_MAX_LEN)?;
        require_text("surname", &self.surname, SURNAME_MAX_LEN)?;
        require_text("phone", &self.phone, PHONE_MAX_LEN)?;
        require_text("cname", &self.cname, CNAME_MAX_LEN)
    }
}

/// Partial update for a user. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UserPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub cname: Option<String>,
}

impl UserPatch {
    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(surname) = self.surname {
            user.surname = surname;
        }
        if let Some(phone) = self.phone {
            user.phone = phone;
        }
        if let Some(cname) = self.cname {
            user.cname = cname;
        }
    }
}

pub struct UserRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> UserRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT email, name, surname, phone, cname FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(user)
    }

    pub async fn get(&mut self, email: &str) -> StoreResult<User> {
        self.find(email)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::User, email))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT email, name, surname, phone, cname FROM users ORDER BY email",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(users)
    }

    /// Inserts a user after checking the email is free and the country exists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` for a taken email and `StoreError::InvalidReference` for an
    /// unknown country.
    pub async fn create(&mut self, user: User) -> StoreResult<User> {
        user.validate()?;

        if self.find(&user.email).await?.is_some() {
            return Err(StoreError::conflict(Entity::User, &user.email));
        }
        ensure_reference(&mut *self.conn, Reference::Country(&user.cname)).await?;

        sqlx::query(
            "INSERT INTO users (email, name, surname, phone, cname) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.phone)
        .bind(&user.cname)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| map_insert_error(e, Entity::User, &user.email))?;

        tracing::debug!(email = %user.email, "user created");
        Ok(user)
    }

    /// Overwrites the supplied fields and re-validates the country reference.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown email and `StoreError::InvalidReference` if
    /// the resulting country does not exist.
    pub async fn update(&mut self, email: &str, patch: UserPatch) -> StoreResult<User> {
        let mut user = self.get(email).await?;
        patch.apply(&mut user);
        user.validate()?;
        ensure_reference(&mut *self.conn, Reference::Country(&user.cname)).await?;

        sqlx::query("UPDATE users SET name = ?, surname = ?, phone = ?, cname = ? WHERE email = ?")
            .bind(&user.name)
            .bind(&user.surname)
            .bind(&user.phone)
            .bind(&user.cname)
            .bind(&user.email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %user.email, "user updated");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InUse` while the email still has a patient, doctor or public
    /// servant row.
    pub async fn delete(&mut self, email: &str) -> StoreResult<()> {
        self.get(email).await?;

        ensure_unreferenced(
            &mut *self.conn,
            Entity::User,
            email,
            &[
                (Entity::Patient, "SELECT 1 FROM patient WHERE email = ?"),
                (Entity::Doctor, "SELECT 1 FROM doctor WHERE email = ?"),
                (
                    Entity::PublicServant,
                    "SELECT 1 FROM public_servant WHERE email = ?",
                ),
            ],
        )
        .await?;

        sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(email = %email, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;
    use crate::Store;

    async fn store_with_cyprus() -> Store {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();
        uow.countries().create(fixtures::country("Cyprus")).await.unwrap();
        uow.commit().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_with_known_country_succeeds() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();

        let user = uow
            .users()
            .create(fixtures::user("a@b.com", "Cyprus"))
            .await
            .expect("create should succeed");
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.users().get("a@b.com").await.unwrap(), user);
        assert_eq!(uow.users().list().await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_country_is_invalid_reference() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .users()
            .create(fixtures::user("a@b.com", "Mars"))
            .await
            .expect_err("unknown country should fail");
        assert!(matches!(
            err,
            StoreError::InvalidReference {
                entity: Entity::Country,
                ref key,
            } if key == "Mars"
        ));
        assert!(uow.users().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_email_is_conflict() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();
        uow.users()
            .create(fixtures::user("a@b.com", "Cyprus"))
            .await
            .unwrap();

        let err = uow
            .users()
            .create(fixtures::user("a@b.com", "Cyprus"))
            .await
            .expect_err("duplicate email should fail");
        assert!(matches!(
            err,
            StoreError::Conflict {
                entity: Entity::User,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_email() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .users()
            .create(fixtures::user("not-an-email", "Cyprus"))
            .await
            .expect_err("malformed email should fail");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_only_supplied_fields() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();
        uow.countries().create(fixtures::country("Greece")).await.unwrap();
        uow.users()
            .create(fixtures::user("a@b.com", "Cyprus"))
            .await
            .unwrap();

        let updated = uow
            .users()
            .update(
                "a@b.com",
                UserPatch {
                    phone: Some("+30 210 000".into()),
                    cname: Some("Greece".into()),
                    ..UserPatch::default()
                },
            )
            .await
            .expect("update should succeed");

        assert_eq!(updated.name, "Ada");
        assert_eq!(updated.surname, "Lovelace");
        assert_eq!(updated.phone, "+30 210 000");
        assert_eq!(updated.cname, "Greece");
        assert_eq!(uow.users().get("a@b.com").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_with_unknown_country_leaves_row_unchanged() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();
        let original = uow
            .users()
            .create(fixtures::user("a@b.com", "Cyprus"))
            .await
            .unwrap();

        let err = uow
            .users()
            .update(
                "a@b.com",
                UserPatch {
                    cname: Some("Mars".into()),
                    ..UserPatch::default()
                },
            )
            .await
            .expect_err("unknown country should fail");
        assert!(matches!(err, StoreError::InvalidReference { .. }));
        assert_eq!(uow.users().get("a@b.com").await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .users()
            .update("ghost@b.com", UserPatch::default())
            .await
            .expect_err("missing user should fail");
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: Entity::User,
                ..
            }
        ));
        assert!(uow.users().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = store_with_cyprus().await;
        let mut uow = store.begin().await.unwrap();
        uow.users()
            .create(fixtures::user("a@b.com", "Cyprus"))
            .await
            .unwrap();

        uow.users().delete("a@b.com").await.expect("delete");
        assert!(matches!(
            uow.users().get("a@b.com").await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(uow.users().list().await.unwrap().is_empty());

        assert!(matches!(
            uow.users().delete("a@b.com").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_is_restricted_while_a_role_row_exists() {
        let store = store_with_cyprus().await;
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
            .users()
            .delete("doc@b.com")
            .await
            .expect_err("user with doctor row should not be deleted");
        assert!(matches!(
            err,
            StoreError::InUse {
                dependent: Entity::Doctor,
                ..
            }
        ));
    }
}
