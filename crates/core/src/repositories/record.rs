//! Epidemiological records: death and patient totals for a disease in a country, filed by a
//! public servant. Ids are assigned by the store.

use crate::constants::{CNAME_MAX_LEN, DISEASE_CODE_MAX_LEN, EMAIL_MAX_LEN};
use crate::error::Entity;
use crate::repositories::helpers::{ensure_reference, Reference};
use crate::validation::{require_email, require_non_negative, require_text};
use crate::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Record {
    pub id: i64,
    pub email: String,
    pub cname: String,
    pub disease_code: String,
    pub total_deaths: i32,
    pub total_patients: i32,
}

/// A record before the store has assigned its id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, ToSchema)]
pub struct NewRecord {
    pub email: String,
    pub cname: String,
    pub disease_code: String,
    pub total_deaths: i32,
    pub total_patients: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct RecordPatch {
    pub email: Option<String>,
    pub cname: Option<String>,
    pub disease_code: Option<String>,
    pub total_deaths: Option<i32>,
    pub total_patients: Option<i32>,
}

impl RecordPatch {
    fn apply(self, record: &mut Record) {
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(cname) = self.cname {
            record.cname = cname;
        }
        if let Some(disease_code) = self.disease_code {
            record.disease_code = disease_code;
        }
        if let Some(total_deaths) = self.total_deaths {
            record.total_deaths = total_deaths;
        }
        if let Some(total_patients) = self.total_patients {
            record.total_patients = total_patients;
        }
    }
}

fn validate_fields(
    email: &str,
    cname: &str,
    disease_code: &str,
    total_deaths: i32,
    total_patients: i32,
) -> StoreResult<()> {
    require_email("email", email, EMAIL_MAX_LEN)?;
    require_text("cname", cname, CNAME_MAX_LEN)?;
    require_text("disease_code", disease_code, DISEASE_CODE_MAX_LEN)?;
    require_non_negative("total_deaths", i64::from(total_deaths))?;
    require_non_negative("total_patients", i64::from(total_patients))
}

pub struct RecordRepo<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> RecordRepo<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn find(&mut self, id: i64) -> StoreResult<Option<Record>> {
        let record = sqlx::query_as::<_, Record>(
            "SELECT id, email, cname, disease_code, total_deaths, total_patients \
             FROM record WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(record)
    }

    pub async fn get(&mut self, id: i64) -> StoreResult<Record> {
        self.find(id)
            .await?
            .ok_or_else(|| StoreError::not_found(Entity::Record, id))
    }

    pub async fn list(&mut self) -> StoreResult<Vec<Record>> {
        let records = sqlx::query_as::<_, Record>(
            "SELECT id, email, cname, disease_code, total_deaths, total_patients \
             FROM record ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(records)
    }

    /// Records filed for one country, oldest first.
    pub async fn list_for_country(&mut self, cname: &str) -> StoreResult<Vec<Record>> {
        let records = sqlx::query_as::<_, Record>(
            "SELECT id, email, cname, disease_code, total_deaths, total_patients \
             FROM record WHERE cname = ? ORDER BY id",
        )
        .bind(cname)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(records)
    }

    async fn ensure_references(
        &mut self,
        email: &str,
        cname: &str,
        disease_code: &str,
    ) -> StoreResult<()> {
        ensure_reference(&mut *self.conn, Reference::PublicServant(email)).await?;
        ensure_reference(&mut *self.conn, Reference::Country(cname)).await?;
        ensure_reference(&mut *self.conn, Reference::Disease(disease_code)).await
    }

    /// Inserts a record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if the public servant, country or disease is
    /// unknown.
    pub async fn create(&mut self, new: NewRecord) -> StoreResult<Record> {
        validate_fields(
            &new.email,
            &new.cname,
            &new.disease_code,
            new.total_deaths,
            new.total_patients,
        )?;
        self.ensure_references(&new.email, &new.cname, &new.disease_code)
            .await?;

        let id = sqlx::query(
            "INSERT INTO record (email, cname, disease_code, total_deaths, total_patients) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new.email)
        .bind(&new.cname)
        .bind(&new.disease_code)
        .bind(new.total_deaths)
        .bind(new.total_patients)
        .execute(&mut *self.conn)
        .await?
        .last_insert_rowid();

        tracing::debug!(id, cname = %new.cname, "record created");
        Ok(Record {
            id,
            email: new.email,
            cname: new.cname,
            disease_code: new.disease_code,
            total_deaths: new.total_deaths,
            total_patients: new.total_patients,
        })
    }

    pub async fn update(&mut self, id: i64, patch: RecordPatch) -> StoreResult<Record> {
        let mut record = self.get(id).await?;
        patch.apply(&mut record);
        validate_fields(
            &record.email,
            &record.cname,
            &record.disease_code,
            record.total_deaths,
            record.total_patients,
        )?;
        self.ensure_references(&record.email, &record.cname, &record.disease_code)
            .await?;

        sqlx::query(
            "UPDATE record SET email = ?, cname = ?, disease_code = ?, total_deaths = ?, \
             total_patients = ? WHERE id = ?",
        )
        .bind(&record.email)
        .bind(&record.cname)
        .bind(&record.disease_code)
        .bind(record.total_deaths)
        .bind(record.total_patients)
        .bind(id)
        .execute(&mut *self.conn)
        .await?;

        tracing::debug!(id, "record updated");
        Ok(record)
    }

    pub async fn delete(&mut self, id: i64) -> StoreResult<()> {
        self.get(id).await?;

        sqlx::query("DELETE FROM record WHERE id = ?")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        tracing::debug!(id, "record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures;

    fn weekly_report() -> NewRecord {
        NewRecord {
            email: "ps@gov.cy".into(),
            cname: "Cyprus".into(),
            disease_code: "COVID-19".into(),
            total_deaths: 3,
            total_patients: 120,
        }
    }

    #[tokio::test]
    async fn test_ids_are_assigned_and_increase() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        let first = uow.records().create(weekly_report()).await.unwrap();
        let second = uow.records().create(weekly_report()).await.unwrap();
        assert!(second.id > first.id);

        assert_eq!(uow.records().get(first.id).await.unwrap(), first);
        assert_eq!(uow.records().list().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_create_requires_a_public_servant() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .records()
            .create(NewRecord {
                email: "nobody@gov.cy".into(),
                ..weekly_report()
            })
            .await
            .expect_err("unknown servant should fail");
        assert!(matches!(
            err,
            StoreError::InvalidReference {
                entity: Entity::PublicServant,
                ..
            }
        ));
        assert!(uow.records().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_totals_and_revalidate_country() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();
        let record = uow.records().create(weekly_report()).await.unwrap();

        let updated = uow
            .records()
            .update(
                record.id,
                RecordPatch {
                    total_deaths: Some(5),
                    ..RecordPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_deaths, 5);
        assert_eq!(updated.total_patients, 120);

        let err = uow
            .records()
            .update(
                record.id,
                RecordPatch {
                    cname: Some("Mars".into()),
                    ..RecordPatch::default()
                },
            )
            .await
            .expect_err("unknown country should fail");
        assert!(matches!(
            err,
            StoreError::InvalidReference {
                entity: Entity::Country,
                ..
            }
        ));
        assert_eq!(uow.records().get(record.id).await.unwrap().cname, "Cyprus");
    }

    #[tokio::test]
    async fn test_records_block_servant_delete_until_removed() {
        let store = fixtures::seeded_store().await;
        let mut uow = store.begin().await.unwrap();
        let record = uow.records().create(weekly_report()).await.unwrap();

        assert_eq!(
            uow.records().list_for_country("Cyprus").await.unwrap(),
            vec![record.clone()]
        );
        assert!(matches!(
            uow.public_servants().delete("ps@gov.cy").await,
            Err(StoreError::InUse {
                dependent: Entity::Record,
                ..
            })
        ));

        uow.records().delete(record.id).await.unwrap();
        assert!(matches!(
            uow.records().get(record.id).await,
            Err(StoreError::NotFound { .. })
        ));
        uow.public_servants().delete("ps@gov.cy").await.unwrap();
    }
}
