//! Connection pool and unit of work.
//!
//! A [`Store`] owns the SQLite pool. Every request opens exactly one [`UnitOfWork`], performs
//! its reads and writes through the repositories borrowed from it, and then commits. Dropping a
//! unit of work without committing rolls its transaction back, so a failed request never leaves
//! partial writes behind.

use crate::config::CoreConfig;
use crate::repositories::{
    country::CountryRepo, discover::DiscoverRepo, disease::DiseaseRepo,
    disease_type::DiseaseTypeRepo, doctor::DoctorRepo, patient::PatientRepo,
    patient_disease::PatientDiseaseRepo, public_servant::PublicServantRepo, record::RecordRepo,
    specialize::SpecializeRepo, users::UserRepo,
};
use crate::{StoreError, StoreResult};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Handle to the relational store. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens a pool against `cfg.database_url()`, creating the database file if missing.
    ///
    /// Foreign-key enforcement is switched on for every pooled connection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connect` if the URL is malformed or the database cannot be opened.
    pub async fn connect(cfg: &CoreConfig) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(cfg.database_url())
            .map_err(StoreError::Connect)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections())
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        tracing::info!(
            max_connections = cfg.max_connections(),
            "connected to {}",
            cfg.database_url()
        );

        Ok(Self { pool })
    }

    /// Creates a migrated, single-connection in-memory store.
    ///
    /// Each SQLite in-memory connection is its own database, so the pool is pinned to one
    /// connection that is never recycled.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(StoreError::Connect)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(StoreError::Connect)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Applies any pending schema migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        MIGRATOR.run(&self.pool).await?;
        tracing::info!("database schema is up to date");
        Ok(())
    }

    /// Starts a new unit of work.
    ///
    /// Takes SQLite's write lock at begin (`BEGIN IMMEDIATE`), so overlapping units of work
    /// queue on the busy timeout instead of deadlocking at commit.
    pub async fn begin(&self) -> StoreResult<UnitOfWork> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(UnitOfWork { tx })
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// One database transaction, scoped to a single request.
///
/// Repositories borrow the transaction mutably, so only one of them can be in use at a time.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub fn countries(&mut self) -> CountryRepo<'_> {
        CountryRepo::new(&mut self.tx)
    }

    pub fn users(&mut self) -> UserRepo<'_> {
        UserRepo::new(&mut self.tx)
    }

    pub fn patients(&mut self) -> PatientRepo<'_> {
        PatientRepo::new(&mut self.tx)
    }

    pub fn disease_types(&mut self) -> DiseaseTypeRepo<'_> {
        DiseaseTypeRepo::new(&mut self.tx)
    }

    pub fn diseases(&mut self) -> DiseaseRepo<'_> {
        DiseaseRepo::new(&mut self.tx)
    }

    pub fn discoveries(&mut self) -> DiscoverRepo<'_> {
        DiscoverRepo::new(&mut self.tx)
    }

    pub fn patient_diseases(&mut self) -> PatientDiseaseRepo<'_> {
        PatientDiseaseRepo::new(&mut self.tx)
    }

    pub fn public_servants(&mut self) -> PublicServantRepo<'_> {
        PublicServantRepo::new(&mut self.tx)
    }

    pub fn doctors(&mut self) -> DoctorRepo<'_> {
        DoctorRepo::new(&mut self.tx)
    }

    pub fn specializations(&mut self) -> SpecializeRepo<'_> {
        SpecializeRepo::new(&mut self.tx)
    }

    pub fn records(&mut self) -> RecordRepo<'_> {
        RecordRepo::new(&mut self.tx)
    }

    /// Commits every write made through this unit of work.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the commit fails; the transaction is rolled back
    /// by the database in that case.
    pub async fn commit(self) -> StoreResult<()> {
        self.tx.commit().await.map_err(|e| {
            tracing::error!("commit failed, transaction rolled back: {}", e);
            StoreError::Persistence(e)
        })
    }

    /// Discards every write made through this unit of work.
    pub async fn rollback(self) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
