use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as known to the identity provider. The id is the provider's
/// subject, not a locally generated key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: String,
    name: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, name: Option<String>, email: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(
        id: String,
        name: Option<String>,
        email: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
