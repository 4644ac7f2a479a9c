// ==========================================
// Agro Asociados - importer traits
// ==========================================
// Responsibility: interfaces of the ingestion pipeline and its
// stateless components (no implementations here)
// ==========================================

use crate::domain::import::{ImportPreview, ImportProgress, ImportState, ImportSummary};
use crate::domain::member::{CanonicalField, MemberRecord};
use crate::importer::error::ImporterResult;
use crate::importer::file_parser::ParsedTable;
use crate::importer::record_builder::BuiltRecords;
use crate::importer::source::ImportSource;
use async_trait::async_trait;

// ==========================================
// MemberImporter Trait
// ==========================================
// Implementor: MemberImporterImpl
#[async_trait]
pub trait MemberImporter: Send + Sync {
    /// Run one ingestion: Reading -> Parsing -> Persisting -> Completed.
    ///
    /// # Arguments
    /// - source: file path, in-memory bytes or pasted JSON text
    ///
    /// # Returns
    /// - Ok(ImportSummary): the run completed (possibly with per-record failures)
    /// - Err: FileNotFound / ReadError / FormatError; the run ended in Failed
    async fn import(&self, source: ImportSource) -> ImporterResult<ImportSummary>;

    /// Reading + Parsing only; nothing is persisted.
    async fn preview(&self, source: ImportSource) -> ImporterResult<ImportPreview>;

    /// Manual single-record entry: validate, duplicate guard, insert.
    ///
    /// # Returns
    /// - Ok(String): id of the new record
    /// - Err(ValidationError | DuplicateError | Repository)
    async fn register(&self, record: MemberRecord) -> ImporterResult<String>;
}

// ==========================================
// DelimiterSniffer Trait
// ==========================================
pub trait DelimiterSniffer: Send + Sync {
    /// Pick the field separator from the first line. Never fails.
    fn sniff(&self, text: &str) -> char;
}

// ==========================================
// TabularParser Trait
// ==========================================
pub trait TabularParser: Send + Sync {
    /// Split text into non-blank lines and tokenised rows.
    ///
    /// # Returns
    /// - Err(FormatError): no non-blank line
    fn parse(&self, text: &str, delimiter: char) -> ImporterResult<ParsedTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
pub trait FieldMapper: Send + Sync {
    /// Map one lower-cased header token to a canonical field.
    /// Pure function of its input.
    fn map_header(&self, header: &str) -> CanonicalField;
}

// ==========================================
// RecordBuilder Trait
// ==========================================
pub trait RecordBuilder: Send + Sync {
    /// Turn parsed rows into member records (three tiers).
    ///
    /// # Returns
    /// - Err(FormatError): no tier produced a record
    fn build(&self, table: &ParsedTable, mapper: &dyn FieldMapper)
        -> ImporterResult<BuiltRecords>;
}

// ==========================================
// ImportObserver Trait
// ==========================================
// Receives run state changes and per-attempt progress.
pub trait ImportObserver: Send + Sync {
    fn on_state_change(&self, run_id: &str, from: ImportState, to: ImportState);

    fn on_progress(&self, run_id: &str, progress: ImportProgress);
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpImportObserver;

impl ImportObserver for NoOpImportObserver {
    fn on_state_change(&self, _run_id: &str, _from: ImportState, _to: ImportState) {}

    fn on_progress(&self, _run_id: &str, _progress: ImportProgress) {}
}
