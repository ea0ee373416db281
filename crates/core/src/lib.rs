//! # HIS Core
//!
//! Core data layer for the health information system.
//!
//! This crate contains the relational model and the rules that keep it consistent:
//! - Countries, users and their roles (patients, doctors, public servants)
//! - Disease types, diseases, discoveries, diagnoses, specializations and records
//! - Request-scoped units of work over a SQLite pool, with embedded migrations
//! - Explicit foreign-key checks on every write and a RESTRICT policy on deletes
//!
//! **No API concerns**: HTTP servers, routing and response shaping belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod repositories;
pub mod store;
pub mod validation;

pub use config::CoreConfig;
pub use error::{Entity, StoreError, StoreResult};
pub use store::{Store, UnitOfWork};

pub use repositories::country::{Country, CountryPatch};
pub use repositories::discover::{Discover, DiscoverPatch};
pub use repositories::disease::{Disease, DiseasePatch};
pub use repositories::disease_type::{DiseaseType, DiseaseTypePatch};
pub use repositories::doctor::{Doctor, DoctorPatch};
pub use repositories::patient::Patient;
pub use repositories::patient_disease::{PatientDisease, PatientDiseasePatch};
pub use repositories::public_servant::{PublicServant, PublicServantPatch};
pub use repositories::record::{NewRecord, Record, RecordPatch};
pub use repositories::specialize::Specialize;
pub use repositories::users::{User, UserPatch};
