//! Constants shared across the core crate.

/// Database location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://health_info.db";

/// Pool size used when `HIS_DB_MAX_CONNECTIONS` is not set.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Column limits, matching the schema the administration frontend was built against.
pub const CNAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 60;
pub const NAME_MAX_LEN: usize = 30;
pub const SURNAME_MAX_LEN: usize = 40;
pub const PHONE_MAX_LEN: usize = 20;
pub const DESCRIPTION_MAX_LEN: usize = 140;
pub const PATHOGEN_MAX_LEN: usize = 20;
pub const DISEASE_CODE_MAX_LEN: usize = 50;
pub const DEPARTMENT_MAX_LEN: usize = 50;
pub const DEGREE_MAX_LEN: usize = 20;
