use serde::{Deserialize, Serialize};

/// Lifecycle of an extraction job attached to a case-study file.
///
/// There is deliberately no `Failed` variant: a failed extraction is stored as
/// `Complete` with a non-null error on the file row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Processing,
    Complete,
}

impl ProcessingStatus {
    pub fn is_processing(&self) -> bool {
        matches!(self, ProcessingStatus::Processing)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ProcessingStatus::Complete)
    }

    pub fn can_transition_to(&self, new_status: &ProcessingStatus) -> bool {
        matches!(
            (self, new_status),
            (ProcessingStatus::Processing, ProcessingStatus::Complete)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Complete => "complete",
        }
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "processing" => Ok(ProcessingStatus::Processing),
            "complete" => Ok(ProcessingStatus::Complete),
            _ => Err(format!("Invalid processing status: {}", s)),
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_checks() {
        assert!(ProcessingStatus::Processing.is_processing());
        assert!(!ProcessingStatus::Processing.is_complete());
        assert!(ProcessingStatus::Complete.is_complete());
        assert_eq!(ProcessingStatus::default(), ProcessingStatus::Processing);
    }

    #[test]
    fn test_transitions() {
        let processing = ProcessingStatus::Processing;
        let complete = ProcessingStatus::Complete;

        assert!(processing.can_transition_to(&complete));

        assert!(!complete.can_transition_to(&processing));
        assert!(!complete.can_transition_to(&complete));
        assert!(!processing.can_transition_to(&processing));
    }

    #[test]
    fn test_string_conversion() {
        for status in [ProcessingStatus::Processing, ProcessingStatus::Complete] {
            let parsed = ProcessingStatus::from_string(status.as_str()).unwrap();
            assert_eq!(status, parsed);
        }
        assert_eq!(
            ProcessingStatus::from_string("COMPLETE").unwrap(),
            ProcessingStatus::Complete
        );
    }

    #[test]
    fn test_invalid_string_parsing() {
        assert!(ProcessingStatus::from_string("failed").is_err());
        assert!(ProcessingStatus::from_string("").is_err());
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&ProcessingStatus::Complete).unwrap();
        assert_eq!(json, "\"complete\"");
    }
}
