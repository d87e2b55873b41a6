use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Role;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `customer`. `admin` cannot be self-registered.
    pub role: Option<Role>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
    /// Suggested landing page for the role.
    pub redirect: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormFields {
    pub action: String,
    pub fields: Vec<String>,
}

impl FormFields {
    pub fn new(action: &str, fields: &[&str]) -> Self {
        Self {
            action: action.to_string(),
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub sid: String,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}
