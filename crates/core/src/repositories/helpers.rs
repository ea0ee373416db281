//! Repository-related utilities.
//!
//! Existence checks for foreign keys, the RESTRICT delete guard, and translation of driver
//! errors into the store's error taxonomy.

use crate::error::Entity;
use crate::{StoreError, StoreResult};
use sqlx::{Encode, Sqlite, SqliteConnection, Type};
use std::fmt::Display;

/// A foreign-key value that must resolve to an existing row before a write.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Reference<'a> {
    Country(&'a str),
    User(&'a str),
    Patient(&'a str),
    DiseaseType(i32),
    Disease(&'a str),
    PublicServant(&'a str),
    Doctor(&'a str),
}

impl Reference<'_> {
    fn entity(&self) -> Entity {
        match self {
            Reference::Country(_) => Entity::Country,
            Reference::User(_) => Entity::User,
            Reference::Patient(_) => Entity::Patient,
            Reference::DiseaseType(_) => Entity::DiseaseType,
            Reference::Disease(_) => Entity::Disease,
            Reference::PublicServant(_) => Entity::PublicServant,
            Reference::Doctor(_) => Entity::Doctor,
        }
    }
}

/// Runs a `SELECT 1 ... WHERE key = ?` style query and reports whether it matched a row.
pub(crate) async fn exists<'q, K>(
    conn: &mut SqliteConnection,
    sql: &'q str,
    key: K,
) -> StoreResult<bool>
where
    K: 'q + Send + Encode<'q, Sqlite> + Type<Sqlite>,
{
    let row: Option<(i64,)> = sqlx::query_as(sql)
        .bind(key)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

/// Checks that `reference` points at an existing row.
///
/// # Errors
///
/// Returns `StoreError::InvalidReference` naming the referenced entity if no row matches.
pub(crate) async fn ensure_reference(
    conn: &mut SqliteConnection,
    reference: Reference<'_>,
) -> StoreResult<()> {
    let found = match reference {
        Reference::Country(cname) => {
            exists(conn, "SELECT 1 FROM country WHERE cname = ?", cname).await?
        }
        Reference::User(email) => exists(conn, "SELECT 1 FROM users WHERE email = ?", email).await?,
        Reference::Patient(email) => {
            exists(conn, "SELECT 1 FROM patient WHERE email = ?", email).await?
        }
        Reference::DiseaseType(id) => {
            exists(conn, "SELECT 1 FROM disease_type WHERE id = ?", id).await?
        }
        Reference::Disease(code) => {
            exists(conn, "SELECT 1 FROM disease WHERE disease_code = ?", code).await?
        }
        Reference::PublicServant(email) => {
            exists(conn, "SELECT 1 FROM public_servant WHERE email = ?", email).await?
        }
        Reference::Doctor(email) => {
            exists(conn, "SELECT 1 FROM doctor WHERE email = ?", email).await?
        }
    };

    if found {
        return Ok(());
    }

    let key = match reference {
        Reference::DiseaseType(id) => id.to_string(),
        Reference::Country(k)
        | Reference::User(k)
        | Reference::Patient(k)
        | Reference::Disease(k)
        | Reference::PublicServant(k)
        | Reference::Doctor(k) => k.to_string(),
    };
    tracing::warn!("rejected write: unknown {} {}", reference.entity().noun(), key);
    Err(StoreError::invalid_reference(reference.entity(), key))
}

/// Refuses to delete `entity` identified by `key` while any of `dependents` still matches it.
///
/// Each dependent query must take the parent key as its only parameter.
///
/// # Errors
///
/// Returns `StoreError::InUse` naming the first dependent that still references the row.
pub(crate) async fn ensure_unreferenced<'q, K>(
    conn: &mut SqliteConnection,
    entity: Entity,
    key: K,
    dependents: &[(Entity, &'q str)],
) -> StoreResult<()>
where
    K: 'q + Copy + Display + Send + Encode<'q, Sqlite> + Type<Sqlite>,
{
    for (dependent, sql) in dependents {
        if exists(&mut *conn, *sql, key).await? {
            tracing::warn!(
                "rejected delete: {} {} is still referenced by a {}",
                entity.noun(),
                key,
                dependent.noun()
            );
            return Err(StoreError::InUse {
                entity,
                key: key.to_string(),
                dependent: *dependent,
            });
        }
    }
    Ok(())
}

/// Maps a failed INSERT to `Conflict` when the primary key is already taken.
///
/// The explicit existence check before each insert catches the common case; this covers the
/// window between that check and the write.
pub(crate) fn map_insert_error(err: sqlx::Error, entity: Entity, key: impl Display) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::conflict(entity, key),
        _ => StoreError::Persistence(err),
    }
}
