//! Authentication bodies and the profile kept for a logged-in customer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/auth/login`. `user_name` may hold a username or an email.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_name: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    pub fn missing_field(&self) -> Option<&'static str> {
        blank_field(&[("userName", &self.user_name), ("password", &self.password)])
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"***")
            .finish()
    }
}

/// Body of `POST /api/auth/register`.
///
/// The backend has no phone column; the phone number is stored in `surname`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub user_name: String,
    pub password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: phone.into(),
            email: email.into(),
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    pub fn missing_field(&self) -> Option<&'static str> {
        blank_field(&[
            ("name", &self.name),
            ("surname", &self.surname),
            ("email", &self.email),
            ("userName", &self.user_name),
            ("password", &self.password),
        ])
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("user_name", &self.user_name)
            .finish_non_exhaustive()
    }
}

/// Logged-in customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Reply of the login and register endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<BackendUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub surname: Option<String>,
}

impl From<BackendUser> for UserProfile {
    fn from(user: BackendUser) -> Self {
        let id = match user.user_id {
            Some(Value::String(id)) => id,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Self {
            id,
            name: user.name.trim().to_string(),
            username: user.user_name,
            email: user.email,
            phone: user.surname.filter(|phone| !phone.is_empty()),
        }
    }
}

fn blank_field(fields: &[(&'static str, &String)]) -> Option<&'static str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_from_backend_user() {
        let reply: AuthReply = serde_json::from_value(json!({
            "success": true,
            "message": "ok",
            "user": {
                "userId": 17,
                "name": "  Huda ",
                "userName": "huda",
                "email": "huda@example.com",
                "surname": "777000111"
            }
        }))
        .unwrap();

        let profile = UserProfile::from(reply.user.unwrap());
        assert_eq!(profile.id, "17");
        assert_eq!(profile.name, "Huda");
        assert_eq!(profile.username, "huda");
        assert_eq!(profile.phone.as_deref(), Some("777000111"));
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let registration = Registration::new("Ali", "", "", "ali", "pw");
        assert_eq!(registration.missing_field(), Some("surname"));

        let credentials = Credentials::new("ali", "  ");
        assert_eq!(credentials.missing_field(), Some("password"));
        assert_eq!(Credentials::new("ali", "pw").missing_field(), None);
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("ali", "secret"));
        assert!(!rendered.contains("secret"));

        let rendered = format!("{:?}", Registration::new("Ali", "7", "a@b", "ali", "secret"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(Credentials::new("ali", "pw")).unwrap();
        assert_eq!(json, json!({ "userName": "ali", "password": "pw" }));
    }
}
