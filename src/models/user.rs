use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
    pub user: User,
}

fn bearer() -> String {
    "bearer".to_string()
}

#[derive(Debug, Serialize, Clone)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct SignupData {
    pub username: String,
    pub email: String,
    pub password: String,
}
