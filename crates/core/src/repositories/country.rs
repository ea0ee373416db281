//! Countries: the root of the reference data.
//!
//! Users, discoveries and records all point at a country by name, so a country can only be
//! removed once nothing references it.

use crate::constants::CNAME_MAX_LEN;
use crate::error::Entity;
use crate::repositories::helpers::{ensure_unreferenced, map_insert_error};
use crate::validation::{require_non_negative, require_text};
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Country {
    pub cname: String,
    pub population: i64,
}

impl Country {
    pub fn validate(&self) -> StoreResult<()> {
        require_text("cname", &self.cname, CNAME_MAX_LEN)?;
        require_non_negative("population", self.population)
    }
}

/// Fields of a country that may be changed after creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CountryPatch {
    pub population: Option<i64>,
}

impl CountryPatch {
    fn apply(self, country: &mut Country) {
        if let Some(population) = self.population {
            country.population = population;
        }
    }
}

pub struct CountryRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> CountryRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, cname: &str) -> StoreResult<Option<Country>> {
        let country =
            sqlx::query_as::<_, Country>("SELECT cname, population FROM country WHERE cname = ?")
                .bind(cname)
                .fetch_optional(&mut *self.conn)
                .await?;
        Ok(country)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no country has this name.
    pub async fn get(&mut self, cname: &str) -> StoreResult<Country> {
        self.find(cname)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Country, cname))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<Country>> {
        let countries =
            sqlx::query_as::<_, Country>("SELECT cname, population FROM country ORDER BY cname")
                .fetch_all(&mut *self.conn)
                .await?;
        Ok(countries)
    }

    /// # Errors
    ///
    /// Returns `StoreError::InvalidInput` for bad fields and `StoreError::Conflict` if the name
    /// is already taken.
    pub async fn create(&mut self, country: Country) -> StoreResult<Country> {
        country.validate()?;

        if self.find(&country.cname).await?.is_some() {
            return Err(StoreError::conflict(Entity::Country, &country.cname));
        }

        sqlx::query("INSERT INTO country (cname, population) VALUES (?, ?)")
            .bind(&country.cname)
            .bind(country.population)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| map_insert_error(e, Entity::Country, &country.cname))?;

        tracing::debug!(cname = %country.cname, "country created");
        Ok(country)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the country does not exist.
    pub async fn update(&mut self, cname: &str, patch: CountryPatch) -> StoreResult<Country> {
        let mut country = self.get(cname).await?;
        patch.apply(&mut country);
        country.validate()?;

        sqlx::query("UPDATE country SET population = ? WHERE cname = ?")
            .bind(country.population)
            .bind(&country.cname)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(cname = %country.cname, "country updated");
        Ok(country)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if absent and `StoreError::InUse` while users, discoveries
    /// or records still reference it.
    pub async fn delete(&mut self, cname: &str) -> StoreResult<()> {
        self.get(cname).await?;

        ensure_unreferenced(
            &mut *self.conn,
            Entity::Country,
            cname,
            &[
                (Entity::User, "SELECT 1 FROM users WHERE cname = ? LIMIT 1"),
                (Entity::Discover, "SELECT 1 FROM discover WHERE cname = ? LIMIT 1"),
                (Entity::Record, "SELECT 1 FROM record WHERE cname = ? LIMIT 1"),
            ],
        )
        .await?;

        sqlx::query("DELETE FROM country WHERE cname = ?")
            .bind(cname)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(cname = %cname, "country deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;
    use crate::Store;

    #[tokio::test]
    async fn test_create_then_list_and_get() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();

        let created = uow
            .countries()
            .create(fixtures::country("Cyprus"))
            .await
            .expect("create should succeed");
        assert_eq!(created.population, 900_000);

        let listed = uow.countries().list().await.unwrap();
        assert_eq!(listed, vec![fixtures::country("Cyprus")]);
        assert_eq!(
            uow.countries().get("Cyprus").await.unwrap(),
            fixtures::country("Cyprus")
        );
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();
        uow.countries().create(fixtures::country("Cyprus")).await.unwrap();

        let err = uow
            .countries()
            .create(fixtures::country("Cyprus"))
            .await
            .expect_err("duplicate should fail");
        assert!(matches!(
            err,
            StoreError::Conflict {
                entity: Entity::Country,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_population() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .countries()
            .create(Country {
                cname: "Atlantis".into(),
                population: -1,
            })
            .await
            .expect_err("negative population should fail");
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_population() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();
        uow.countries().create(fixtures::country("Cyprus")).await.unwrap();

        let updated = uow
            .countries()
            .update(
                "Cyprus",
                CountryPatch {
                    population: Some(1_250_000),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.population, 1_250_000);
        assert_eq!(
            uow.countries().get("Cyprus").await.unwrap().population,
            1_250_000
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .countries()
            .update("Mars", CountryPatch::default())
            .await
            .expect_err("missing country should fail");
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(uow.countries().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_restricted_while_users_reference_it() {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.unwrap();
        uow.countries().create(fixtures::country("Cyprus")).await.unwrap();
        uow.users()
            .create(fixtures::user("a@b.com", "Cyprus"))
            .await
            .unwrap();

        let err = uow
            .countries()
            .delete("Cyprus")
            .await
            .expect_err("referenced country should not be deleted");
        assert!(matches!(
            err,
            StoreError::InUse {
                dependent: Entity::User,
                ..
            }
        ));
        assert!(uow.countries().find("Cyprus").await.unwrap().is_some());

        uow.users().delete("a@b.com").await.unwrap();
        uow.countries().delete("Cyprus").await.unwrap();
        assert!(matches!(
            uow.countries().get("Cyprus").await,
            Err(StoreError::NotFound { .. })
        ));
    }
}
