//! Values accumulated across one wizard run

use serde::{Deserialize, Serialize};
use std::fmt;

/// User-entered and server-issued values for the current run.
///
/// Fields start empty and fill in as steps complete. Nothing here is ever
/// cleared by the wizard itself; "Start Over" leaves it intact.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub username: String,
    pub password: String,
    /// Numeric text, sent as-is
    pub age: String,
    /// Issued by the server at signup/login
    pub user_id: String,
    /// Issued by the server at signup/login
    pub auth_key: String,
    /// Issued by the server when a pet is added
    pub pet_id: String,
    pub pet_name: String,
    pub pet_type: String,
    pub role: String,
}

/// Fields a user can type into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
    Age,
    AuthKey,
    PetName,
    PetType,
    Role,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
            Field::Age => &self.age,
            Field::AuthKey => &self.auth_key,
            Field::PetName => &self.pet_name,
            Field::PetType => &self.pet_type,
            Field::Role => &self.role,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Username => self.username = value,
            Field::Password => self.password = value,
            Field::Age => self.age = value,
            Field::AuthKey => self.auth_key = value,
            Field::PetName => self.pet_name = value,
            Field::PetType => self.pet_type = value,
            Field::Role => self.role = value,
        }
    }
}

// Manual impl so the password never lands in a log line
impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("age", &self.age)
            .field("user_id", &self.user_id)
            .field("auth_key", &self.auth_key)
            .field("pet_id", &self.pet_id)
            .field("pet_name", &self.pet_name)
            .field("pet_type", &self.pet_type)
            .field("role", &self.role)
            .finish()
    }
}
