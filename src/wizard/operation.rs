//! Per-step remote operations: request shape and response consumption

use serde_json::json;

use super::session::SessionState;
use crate::api::{ApiRequest, ApiResponse, HttpMethod};

/// The 15 remote operations, one per non-terminal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateAccount,
    CompleteProfile,
    LoginWithoutKey,
    LoginWithKey,
    UpdateUsername,
    AddPet,
    ListOwnPets,
    /// Expected to be denied for a regular user
    ListAllPets,
    ChangeRole,
    ListAllPetsElevated,
    CountPets,
    DeletePet,
    AgeStatistics,
    CountUsers,
    Logout,
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        match self {
            Operation::CreateAccount
            | Operation::CompleteProfile
            | Operation::LoginWithoutKey
            | Operation::LoginWithKey
            | Operation::AddPet
            | Operation::Logout => HttpMethod::Post,
            Operation::UpdateUsername | Operation::ChangeRole => HttpMethod::Patch,
            Operation::DeletePet => HttpMethod::Delete,
            Operation::ListOwnPets
            | Operation::ListAllPets
            | Operation::ListAllPetsElevated
            | Operation::CountPets
            | Operation::AgeStatistics
            | Operation::CountUsers => HttpMethod::Get,
        }
    }

    /// Path with placeholders, for listings
    pub fn path_template(self) -> &'static str {
        match self {
            Operation::CreateAccount | Operation::CompleteProfile => "/signup",
            Operation::LoginWithoutKey | Operation::LoginWithKey => "/login",
            Operation::UpdateUsername | Operation::ChangeRole => "/users/{userId}",
            Operation::AddPet => "/pets/new",
            Operation::ListOwnPets => "/users/{userId}/pets",
            Operation::ListAllPets | Operation::ListAllPetsElevated => "/pets?userId={userId}",
            Operation::CountPets => "/stats/pets/count",
            Operation::DeletePet => "/pets/{petId}",
            Operation::AgeStatistics => "/stats/users/ages",
            Operation::CountUsers => "/stats/users/count",
            Operation::Logout => "/logout",
        }
    }

    /// Build the request from the current session values
    pub fn request(self, session: &SessionState) -> ApiRequest {
        match self {
            Operation::CreateAccount => ApiRequest::post("/signup").with_body(json!({
                "username": session.username,
                "password": session.password,
            })),
            Operation::CompleteProfile => ApiRequest::post("/signup").with_body(json!({
                "username": session.username,
                "password": session.password,
                "age": session.age,
            })),
            Operation::LoginWithoutKey => ApiRequest::post("/login").with_body(json!({
                "username": session.username,
                "password": session.password,
                "age": session.age,
            })),
            Operation::LoginWithKey => ApiRequest::post("/login").with_body(json!({
                "username": session.username,
                "password": session.password,
                "age": session.age,
                "authKey": session.auth_key,
            })),
            Operation::UpdateUsername => ApiRequest::patch(format!("/users/{}", session.user_id))
                .with_body(json!({
                    "username": session.username,
                    "password": session.password,
                    "age": session.age,
                    "authKey": session.auth_key,
                })),
            Operation::AddPet => ApiRequest::post("/pets/new").with_body(json!({
                "ownerId": session.user_id,
                "name": session.pet_name,
                "type": session.pet_type,
            })),
            Operation::ListOwnPets => ApiRequest::get(format!("/users/{}/pets", session.user_id)),
            Operation::ListAllPets | Operation::ListAllPetsElevated => {
                ApiRequest::get("/pets").with_query("userId", session.user_id.clone())
            }
            Operation::ChangeRole => ApiRequest::patch(format!("/users/{}", session.user_id))
                .with_body(json!({ "role": session.role })),
            Operation::CountPets => ApiRequest::get("/stats/pets/count"),
            Operation::DeletePet => ApiRequest::delete(format!("/pets/{}", session.pet_id)),
            Operation::AgeStatistics => ApiRequest::get("/stats/users/ages"),
            Operation::CountUsers => ApiRequest::get("/stats/users/count"),
            Operation::Logout => ApiRequest::post("/logout"),
        }
    }

    /// Store any identifiers this operation recognizes and return the
    /// transcript text for the response.
    pub fn apply(self, response: &ApiResponse, session: &mut SessionState) -> String {
        let mut text = response.display_text();

        match self {
            Operation::CompleteProfile | Operation::LoginWithKey => {
                if let Some(id) = response.id() {
                    text.push_str(&format!("\nID: {}", id));
                    session.user_id = id;
                }
                if let Some(code) = response.code() {
                    text.push_str(&format!("\nCode: {}", code));
                    session.auth_key = code;
                }
            }
            Operation::AddPet => {
                if let Some(pet_id) = response.pet_id() {
                    text.push_str(&format!("\nPet ID: {}", pet_id));
                    session.pet_id = pet_id;
                }
            }
            _ => {}
        }

        text
    }
}
