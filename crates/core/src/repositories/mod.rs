//! Repository modules.
//!
//! One repository per table. Each is borrowed from a [`UnitOfWork`](crate::UnitOfWork) and
//! offers the same contract: `get`/`find`, `list`, `create`, `update` with a patch of optional
//! fields (where the table has non-key columns), and `delete`.

pub mod country;
pub mod discover;
pub mod disease;
pub mod disease_type;
pub mod doctor;
pub(crate) mod helpers;
pub mod patient;
pub mod patient_disease;
pub mod public_servant;
pub mod record;
pub mod specialize;
pub mod users;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::country::Country;
    use super::disease::Disease;
    use super::disease_type::DiseaseType;
    use super::doctor::Doctor;
    use super::public_servant::PublicServant;
    use super::users::User;
    use crate::{Store, UnitOfWork};

    pub fn country(cname: &str) -> Country {
        Country {
            cname: cname.into(),
            population: 900_000,
        }
    }

    pub fn user(email: &str, cname: &str) -> User {
        User {
            email: email.into(),
            name: "Ada".into(),
            surname: "Lovelace".into(),
            phone: "+357 22 000000".into(),
            cname: cname.into(),
        }
    }

    pub fn doctor(email: &str) -> Doctor {
        Doctor {
            email: email.into(),
            degree: "MD".into(),
            salary: 5_000,
        }
    }

    pub fn public_servant(email: &str) -> PublicServant {
        PublicServant {
            email: email.into(),
            department: "Epidemiology".into(),
        }
    }

    pub fn disease_type(id: i32) -> DiseaseType {
        DiseaseType {
            id,
            description: "Viral infection".into(),
        }
    }

    pub fn disease(code: &str, type_id: i32) -> Disease {
        Disease {
            disease_code: code.into(),
            pathogen: "virus".into(),
            description: "Respiratory illness".into(),
            type_id,
        }
    }

    /// Store seeded with Cyprus, one disease type (1) with disease "COVID-19", and user
    /// `ps@gov.cy` holding a public servant row.
    pub async fn seeded_store() -> Store {
        let store = Store::in_memory().await.expect("in-memory store");
        let mut uow = store.begin().await.expect("begin");
        seed(&mut uow).await;
        uow.commit().await.expect("commit seed");
        store
    }

    async fn seed(uow: &mut UnitOfWork) {
        uow.countries().create(country("Cyprus")).await.unwrap();
        uow.disease_types().create(disease_type(1)).await.unwrap();
        uow.diseases().create(disease("COVID-19", 1)).await.unwrap();
        uow.users().create(user("ps@gov.cy", "Cyprus")).await.unwrap();
        uow.public_servants()
            .create(public_servant("ps@gov.cy"))
            .await
            .unwrap();
    }
}
