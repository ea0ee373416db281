use std::fmt;

/// The tables managed by the store, used to give errors their context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Country,
    User,
    Patient,
    DiseaseType,
    Disease,
    Discover,
    PatientDisease,
    PublicServant,
    Doctor,
    Specialize,
    Record,
}

impl Entity {
    /// Lower-case noun used inside messages, e.g. "Invalid country".
    pub fn noun(self) -> &'static str {
        match self {
            Entity::Country => "country",
            Entity::User => "user",
            Entity::Patient => "patient",
            Entity::DiseaseType => "disease type",
            Entity::Disease => "disease",
            Entity::Discover => "discovery",
            Entity::PatientDisease => "patient disease",
            Entity::PublicServant => "public servant",
            Entity::Doctor => "doctor",
            Entity::Specialize => "specialization",
            Entity::Record => "record",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = self.noun();
        let mut chars = noun.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },
    #[error("{entity} already exists: {key}")]
    Conflict { entity: Entity, key: String },
    #[error("invalid {noun} reference: {key}", noun = entity.noun())]
    InvalidReference { entity: Entity, key: String },
    #[error("{entity} {key} is still referenced by a {noun}", noun = dependent.noun())]
    InUse {
        entity: Entity,
        key: String,
        dependent: Entity,
    },
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn not_found(entity: Entity, key: impl fmt::Display) -> Self {
        StoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn conflict(entity: Entity, key: impl fmt::Display) -> Self {
        StoreError::Conflict {
            entity,
            key: key.to_string(),
        }
    }

    pub(crate) fn invalid_reference(entity: Entity, key: impl fmt::Display) -> Self {
        StoreError::InvalidReference {
            entity,
            key: key.to_string(),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_display_capitalises_first_letter() {
        assert_eq!(Entity::User.to_string(), "User");
        assert_eq!(Entity::PublicServant.to_string(), "Public servant");
        assert_eq!(Entity::DiseaseType.noun(), "disease type");
    }

    #[test]
    fn test_error_messages_carry_entity_and_key() {
        let err = StoreError::invalid_reference(Entity::Country, "Mars");
        assert_eq!(err.to_string(), "invalid country reference: Mars");

        let err = StoreError::InUse {
            entity: Entity::Country,
            key: "Cyprus".into(),
            dependent: Entity::User,
        };
        assert_eq!(
            err.to_string(),
            "Country Cyprus is still referenced by a user"
        );
    }
}
