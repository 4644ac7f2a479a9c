// ==========================================
// Agro Asociados - import run model
// ==========================================
// Responsibility: value types shared by one ingestion run
// (result counters, run state, progress, build tier, summary)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::member::MemberRecord;

// ==========================================
// ImportResult - aggregate outcome of one run
// ==========================================
// Owned by the pipeline for the duration of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub error_messages: Vec<String>, // one per failed record, in row order
}

impl ImportResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.failed += 1;
        self.error_messages.push(message);
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Completed with nothing stored
    pub fn is_total_failure(&self) -> bool {
        self.succeeded == 0
    }

    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && self.failed > 0
    }
}

// ==========================================
// ImportState - run state machine
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportState {
    Idle,
    Reading,
    Parsing,
    Persisting,
    Completed,
    Failed,
}

impl ImportState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportState::Completed | ImportState::Failed)
    }

    /// Legal forward transitions of a run
    pub fn can_transition_to(&self, next: ImportState) -> bool {
        use ImportState::*;
        matches!(
            (self, next),
            (Idle, Reading)
                | (Idle, Failed)
                | (Reading, Parsing)
                | (Reading, Failed)
                | (Parsing, Persisting)
                | (Parsing, Failed)
                | (Persisting, Completed)
        )
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportState::Idle => "IDLE",
            ImportState::Reading => "READING",
            ImportState::Parsing => "PARSING",
            ImportState::Persisting => "PERSISTING",
            ImportState::Completed => "COMPLETED",
            ImportState::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// ImportProgress - snapshot after each attempt
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

impl ImportProgress {
    /// succeeded-so-far / total, in percent
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f64 * 100.0 / self.total as f64
    }
}

impl From<&ImportResult> for ImportProgress {
    fn from(result: &ImportResult) -> Self {
        Self {
            attempted: result.attempted(),
            succeeded: result.succeeded,
            failed: result.failed,
            total: result.total,
        }
    }
}

// ==========================================
// BuildTier - which record builder strategy produced the records
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildTier {
    HeaderMapped,
    Headerless,
    WhitespaceFallback,
    Json,
}

// ==========================================
// ImportSummary - what the caller gets back from a completed run
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub run_id: String,
    pub source_label: String,
    pub delimiter: Option<char>, // None for JSON sources
    pub tier: BuildTier,
    pub result: ImportResult,
    pub elapsed_ms: u64,
    pub message: String, // localised completion text
}

// ==========================================
// ImportPreview - parse without persisting
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub delimiter: Option<char>,
    pub tier: BuildTier,
    pub total_records: usize,
    pub records: Vec<MemberRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_counters() {
        let mut result = ImportResult::new(3);
        result.record_success();
        result.record_failure("row 2 failed".to_string());

        assert_eq!(result.attempted(), 2);
        assert!(result.is_partial());
        assert!(!result.is_total_failure());
        assert_eq!(result.error_messages, vec!["row 2 failed".to_string()]);
    }

    #[test]
    fn test_total_failure_when_nothing_stored() {
        let mut result = ImportResult::new(1);
        result.record_failure("x".to_string());
        assert!(result.is_total_failure());
        assert!(!result.is_partial());
    }

    #[test]
    fn test_state_transitions() {
        assert!(ImportState::Idle.can_transition_to(ImportState::Reading));
        assert!(ImportState::Parsing.can_transition_to(ImportState::Failed));
        assert!(ImportState::Persisting.can_transition_to(ImportState::Completed));
        assert!(!ImportState::Persisting.can_transition_to(ImportState::Failed));
        assert!(!ImportState::Completed.can_transition_to(ImportState::Reading));
        assert!(ImportState::Failed.is_terminal());
    }

    #[test]
    fn test_progress_percent() {
        let progress = ImportProgress {
            attempted: 2,
            succeeded: 1,
            failed: 1,
            total: 4,
        };
        assert!((progress.percent() - 25.0).abs() < f64::EPSILON);
        assert_eq!(ImportProgress::default().percent(), 0.0);
    }
}
