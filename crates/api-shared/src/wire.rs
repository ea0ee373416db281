//! JSON request and response bodies.
//!
//! Update requests carry only the fields the caller wants to change; anything absent keeps its
//! stored value.

use crate::lenient;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope for errors and for write acknowledgements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CreateUserReq {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub cname: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UpdateUserReq {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub cname: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CreateDoctorReq {
    pub email: String,
    pub degree: String,
    #[serde(deserialize_with = "lenient::number")]
    #[schema(value_type = i32)]
    pub salary: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UpdateDoctorReq {
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    #[schema(value_type = Option<i32>)]
    pub salary: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CreateCountryReq {
    pub cname: String,
    #[serde(deserialize_with = "lenient::number")]
    #[schema(value_type = i64)]
    pub population: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UpdateCountryReq {
    #[serde(default, deserialize_with = "lenient::optional_number")]
    #[schema(value_type = Option<i64>)]
    pub population: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, ToSchema)]
pub struct CreatePublicServantReq {
    pub email: String,
    pub department: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct UpdatePublicServantReq {
    pub department: Option<String>,
}
