use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// LLM-generated markdown narrative, stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudySummary {
    id: Uuid,
    case_study_id: Uuid,
    summary: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CaseStudySummary {
    pub fn new(case_study_id: Uuid, summary: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            case_study_id,
            summary,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(
        id: Uuid,
        case_study_id: Uuid,
        summary: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            case_study_id,
            summary,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn case_study_id(&self) -> Uuid {
        self.case_study_id
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn edit(&mut self, summary: String) -> Result<(), String> {
        if summary.trim().is_empty() {
            return Err("Summary cannot be empty".to_string());
        }
        self.summary = summary;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit() {
        let mut summary = CaseStudySummary::new(Uuid::new_v4(), "# Draft".to_string());
        summary.edit("# Final".to_string()).unwrap();
        assert_eq!(summary.summary(), "# Final");
        assert!(summary.edit("\n".to_string()).is_err());
        assert_eq!(summary.summary(), "# Final");
    }
}
