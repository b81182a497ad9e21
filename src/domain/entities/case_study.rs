use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    id: Uuid,
    user_id: String,
    title: String,
    client_name: Option<String>,
    industry: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Partial update of the editable case-study fields. `None` leaves a field
/// untouched; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct CaseStudyChanges {
    pub title: Option<String>,
    pub client_name: Option<Option<String>>,
    pub industry: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl CaseStudy {
    pub fn new(
        user_id: String,
        title: String,
        client_name: Option<String>,
        industry: Option<String>,
        description: Option<String>,
    ) -> Result<Self, String> {
        let title = validate_title(&title)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            client_name: non_blank(client_name),
            industry: non_blank(industry),
            description: non_blank(description),
            created_at: now,
            updated_at: now,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        user_id: String,
        title: String,
        client_name: Option<String>,
        industry: Option<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            title,
            client_name,
            industry,
            description,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    pub fn industry(&self) -> Option<&str> {
        self.industry.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn apply(&mut self, changes: CaseStudyChanges) -> Result<(), String> {
        if let Some(title) = changes.title {
            self.title = validate_title(&title)?;
        }
        if let Some(client_name) = changes.client_name {
            self.client_name = non_blank(client_name);
        }
        if let Some(industry) = changes.industry {
            self.industry = non_blank(industry);
        }
        if let Some(description) = changes.description {
            self.description = non_blank(description);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    Ok(title.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
