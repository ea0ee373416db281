//! Discoveries: the date a disease was first encountered in a country.

use crate::constants::{CNAME_MAX_LEN, DISEASE_CODE_MAX_LEN};
use crate::error::Entity;
use crate::repositories::helpers::{ensure_reference, map_insert_error, Reference};
use crate::validation::require_text;
use crate::{StoreError, StoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Discover {
    pub cname: String,
    pub disease_code: String,
    pub first_enc_date: NaiveDate,
}

impl Discover {
    pub fn validate(&self) -> StoreResult<()> {
        require_text("cname", &self.cname, CNAME_MAX_LEN)?;
        require_text("disease_code", &self.disease_code, DISEASE_CODE_MAX_LEN)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct DiscoverPatch {
    pub first_enc_date: Option<NaiveDate>,
}

fn key(cname: &str, disease_code: &str) -> String {
    format!("{}/{}", cname, disease_code)
}

pub struct DiscoverRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> DiscoverRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, cname: &str, disease_code: &str) -> StoreResult<Option<Discover>> {
        let discover = sqlx::query_as::<_, Discover>(
            "SELECT cname, disease_code, first_enc_date FROM discover \
             WHERE cname = ? AND disease_code = ?",
        )
        .bind(cname)
        .bind(disease_code)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(discover)
    }

    pub async fn get(&mut self, cname: &str, disease_code: &str) -> StoreResult<Discover> {
        self.find(cname, disease_code)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Discover, key(cname, disease_code)))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<Discover>> {
        let discoveries = sqlx::query_as::<_, Discover>(
            "SELECT cname, disease_code, first_enc_date FROM discover \
             ORDER BY cname, disease_code",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(discoveries)
    }

    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the pair is already recorded and
    /// `StoreError::InvalidReference` if either the country or the disease is unknown.
    pub async fn create(&mut self, discover: Discover) -> StoreResult<Discover> {
        discover.validate()?;

        if self
            .find(&discover.cname, &discover.disease_code)
            .await?
            .is_some()
        {
            return Err(StoreError::conflict(
                Entity::Discover,
                key(&discover.cname, &discover.disease_code),
            ));
        }
        ensure_reference(&mut *self.conn, Reference::Country(&discover.cname)).await?;
        ensure_reference(&mut *self.conn, Reference::Disease(&discover.disease_code)).await?;

        sqlx::query(
            "INSERT INTO discover (cname, disease_code, first_enc_date) VALUES (?, ?, ?)",
        )
        .bind(&discover.cname)
        .bind(&discover.disease_code)
        .bind(discover.first_enc_date)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| {
            map_insert_error(
                e,
                Entity::Discover,
                key(&discover.cname, &discover.disease_code),
            )
        })?;

        tracing::debug!(
            cname = %discover.cname,
            disease_code = %discover.disease_code,
            "discovery created"
        );
        Ok(discover)
    }

    pub async fn update(
        &mut self,
        cname: &str,
        disease_code: &str,
        patch: DiscoverPatch,
    ) -> StoreResult<Discover> {
        let mut discover = self.get(cname, disease_code).await?;
        if let Some(first_enc_date) = patch.first_enc_date {
            discover.first_enc_date = first_enc_date;
        }

        sqlx::query(
            "UPDATE discover SET first_enc_date = ? WHERE cname = ? AND disease_code = ?",
        )
        .bind(discover.first_enc_date)
        .bind(cname)
        .bind(disease_code)
        .execute(&mut *self.conn)
        .await?;

        tracing::debug!(cname = %cname, disease_code = %disease_code, "discovery updated");
        Ok(discover)
    }

    pub async fn delete(&mut self, cname: &str, disease_code: &str) -> StoreResult<()> {
        self.get(cname, disease_code).await?;

        sqlx::query("DELETE FROM discover WHERE cname = ? AND disease_code = ?")
            .bind(cname)
            .bind(disease_code)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(cname = %cname, disease_code = %disease_code, "discovery deleted");
        Ok(())
    }
}
