//! Account records exchanged with the backend and kept in the session

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record as stored by the backend.
///
/// Fields the client doesn't know about are kept in `extra` so a
/// full-object PUT writes them back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub organization: String,
    /// Stored in clear by the mock backend
    #[serde(default)]
    pub password: String,
    /// `data:image/...;base64,` URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The part of a user persisted on device. Never holds the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub organization: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            organization: user.organization.clone(),
            profile_image: user.profile_image.clone(),
        }
    }
}

/// Login form
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Signup form
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub password: String,
}

/// Fields to override on a profile save. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    pub profile_image: Option<String>,
}

impl ProfileUpdate {
    /// Only the photo
    pub fn photo(data_uri: impl Into<String>) -> Self {
        Self {
            profile_image: Some(data_uri.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.organization.is_none()
            && self.profile_image.is_none()
    }

    /// Merge over a prior record, producing the full object to PUT
    #[must_use]
    pub fn apply(&self, prior: &User) -> User {
        let mut merged = prior.clone();
        if let Some(ref name) = self.name {
            merged.name.clone_from(name);
        }
        if let Some(ref email) = self.email {
            merged.email.clone_from(email);
        }
        if let Some(ref organization) = self.organization {
            merged.organization.clone_from(organization);
        }
        if let Some(ref image) = self.profile_image {
            merged.profile_image = Some(image.clone());
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1_700_000_000_000_u64,
            "name": "Ada",
            "email": "a@b.com",
            "organization": "Acme",
            "password": "secret1",
            "createdAt": "2025-01-01T00:00:00Z",
            "token": "token_1_1",
            "theme": "dark"
        }))
        .unwrap()
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let user = sample();
        assert_eq!(user.extra.get("theme"), Some(&Value::from("dark")));
        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["theme"], "dark");
        assert_eq!(back["createdAt"], "2025-01-01T00:00:00Z");
    }

    #[test]
    fn session_user_drops_password() {
        let session = SessionUser::from(&sample());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("secret1"));
        assert!(json.contains("\"profileImage\":null"));
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let prior = sample();
        let update = ProfileUpdate {
            organization: Some("Initech".to_string()),
            ..ProfileUpdate::default()
        };
        let merged = update.apply(&prior);
        assert_eq!(merged.organization, "Initech");
        assert_eq!(merged.name, prior.name);
        assert_eq!(merged.email, prior.email);
        assert_eq!(merged.password, prior.password);
        assert_eq!(merged.extra, prior.extra);
    }

    #[test]
    fn photo_update_is_not_empty() {
        assert!(ProfileUpdate::default().is_empty());
        assert!(!ProfileUpdate::photo("data:image/png;base64,AA==").is_empty());
    }
}
