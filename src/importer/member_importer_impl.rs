// ==========================================
// Agro Asociados - member importer implementation
// ==========================================
// Responsibility: one ingestion run from source to storage
// Flow: Reading -> Parsing (sniff, split, build) -> Persisting -> Completed
// Any Reading/Parsing error ends the run in Failed
// Records are persisted one at a time, in order
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{
    BuildTier, ImportPreview, ImportProgress, ImportResult, ImportState, ImportSummary,
};
use crate::domain::member::MemberRecord;
use crate::importer::delimiter::DelimiterSniffer as DefaultDelimiterSniffer;
use crate::importer::duplicate_guard::DuplicateGuard;
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::field_mapper::FieldMapper as DefaultFieldMapper;
use crate::importer::file_parser::DelimitedTextParser;
use crate::importer::json_parser::JsonRecordParser;
use crate::importer::member_importer_trait::{
    DelimiterSniffer, FieldMapper, ImportObserver, MemberImporter, NoOpImportObserver,
    RecordBuilder, TabularParser,
};
use crate::importer::record_builder::TieredRecordBuilder;
use crate::importer::source::ImportSource;
use crate::repository::MemberRepository;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Failure reason for records without name, surname and national ID
pub const MISSING_KEY_FIELDS_REASON: &str = "record has no name, surname or national ID";

/// Records produced by the Parsing stage
#[derive(Debug, Clone)]
struct ParsedRecords {
    records: Vec<MemberRecord>,
    delimiter: Option<char>,
    tier: BuildTier,
}

// ==========================================
// RunTracker - state machine of one run
// ==========================================
struct RunTracker<'a> {
    run_id: &'a str,
    state: ImportState,
    observer: &'a dyn ImportObserver,
}

impl<'a> RunTracker<'a> {
    fn new(run_id: &'a str, observer: &'a dyn ImportObserver) -> Self {
        Self {
            run_id,
            state: ImportState::Idle,
            observer,
        }
    }

    fn transition(&mut self, next: ImportState) {
        if !self.state.can_transition_to(next) {
            warn!(run_id = self.run_id, from = %self.state, to = %next, "unexpected state transition");
        }
        debug!(run_id = self.run_id, from = %self.state, to = %next, "run state change");
        self.observer.on_state_change(self.run_id, self.state, next);
        self.state = next;
    }

    /// Move to Failed and hand the error back
    fn fail(&mut self, err: ImportError) -> ImportError {
        error!(run_id = self.run_id, stage = %self.state, error = %err, "import run failed");
        self.transition(ImportState::Failed);
        err
    }
}

// ==========================================
// MemberImporterImpl
// ==========================================
pub struct MemberImporterImpl<R, C>
where
    R: MemberRepository,
    C: ImportConfigReader,
{
    // data access
    member_repo: R,

    // configuration
    config: C,

    // pipeline components
    delimiter_sniffer: Box<dyn DelimiterSniffer>,
    tabular_parser: Box<dyn TabularParser>,
    field_mapper: Box<dyn FieldMapper>,
    record_builder: Box<dyn RecordBuilder>,
    json_parser: JsonRecordParser,
    duplicate_guard: DuplicateGuard,

    observer: Arc<dyn ImportObserver>,
}

impl<R, C> MemberImporterImpl<R, C>
where
    R: MemberRepository,
    C: ImportConfigReader,
{
    /// # Arguments
    /// - member_repo: member storage
    /// - config: import configuration reader
    /// - delimiter_sniffer / tabular_parser / field_mapper / record_builder: pipeline stages
    pub fn new(
        member_repo: R,
        config: C,
        delimiter_sniffer: Box<dyn DelimiterSniffer>,
        tabular_parser: Box<dyn TabularParser>,
        field_mapper: Box<dyn FieldMapper>,
        record_builder: Box<dyn RecordBuilder>,
    ) -> Self {
        Self {
            member_repo,
            config,
            delimiter_sniffer,
            tabular_parser,
            field_mapper,
            record_builder,
            json_parser: JsonRecordParser,
            duplicate_guard: DuplicateGuard,
            observer: Arc::new(NoOpImportObserver),
        }
    }

    /// Importer wired with the standard components
    pub fn with_default_components(member_repo: R, config: C) -> Self {
        Self::new(
            member_repo,
            config,
            Box::new(DefaultDelimiterSniffer),
            Box::new(DelimitedTextParser),
            Box::new(DefaultFieldMapper),
            Box::new(TieredRecordBuilder),
        )
    }

    pub fn with_observer(mut self, observer: Arc<dyn ImportObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn repository(&self) -> &R {
        &self.member_repo
    }

    /// Parsing stage shared by import and preview
    async fn parse_records(
        &self,
        source: &ImportSource,
        text: &str,
    ) -> ImporterResult<ParsedRecords> {
        if source.is_json() {
            let sanitize = self.config.get_sanitize_json_values().await?;
            let records = self
                .json_parser
                .parse(text, self.field_mapper.as_ref(), sanitize)?;
            return Ok(ParsedRecords {
                records,
                delimiter: None,
                tier: BuildTier::Json,
            });
        }

        let delimiter = self.delimiter_sniffer.sniff(text);
        debug!(delimiter = ?delimiter, "delimiter sniffed");

        let table = self.tabular_parser.parse(text, delimiter)?;
        debug!(lines = table.line_count(), "text split into lines");

        let built = self
            .record_builder
            .build(&table, self.field_mapper.as_ref())?;
        info!(
            records = built.records.len(),
            tier = ?built.tier,
            "records built"
        );

        Ok(ParsedRecords {
            records: built.records,
            delimiter: Some(delimiter),
            tier: built.tier,
        })
    }

    /// Persisting stage: one insert per record, strictly sequential.
    /// Insert failures are counted, never propagated.
    async fn persist_records(
        &self,
        run_id: &str,
        records: Vec<MemberRecord>,
        progress_every: usize,
    ) -> ImportResult {
        let mut result = ImportResult::new(records.len());

        for (idx, record) in records.into_iter().enumerate() {
            let row = idx + 1;
            let record = record.trimmed();

            let outcome = if record.has_key_fields() {
                self.member_repo
                    .insert(&record)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            } else {
                Err(MISSING_KEY_FIELDS_REASON.to_string())
            };

            match outcome {
                Ok(()) => result.record_success(),
                Err(reason) => {
                    let err = ImportError::PersistenceError {
                        row,
                        message: reason.clone(),
                    };
                    warn!(run_id = run_id, error = %err, "record not stored");
                    let row_text = row.to_string();
                    result.record_failure(crate::i18n::t_with_args(
                        "import.record_failed",
                        &[("row", row_text.as_str()), ("reason", reason.as_str())],
                    ));
                }
            }

            let progress = ImportProgress::from(&result);
            self.observer.on_progress(run_id, progress);
            if progress.attempted % progress_every == 0 || progress.attempted == progress.total {
                info!(
                    run_id = run_id,
                    succeeded = progress.succeeded,
                    failed = progress.failed,
                    total = progress.total,
                    percent = progress.percent(),
                    "import progress"
                );
            }
        }

        result
    }
}

/// Localised completion text for a finished run
pub fn completion_message(result: &ImportResult) -> String {
    let succeeded = result.succeeded.to_string();
    let total = result.total.to_string();
    let failed = result.failed.to_string();

    if result.is_total_failure() {
        crate::i18n::t("import.total_failure")
    } else if result.failed == 0 {
        crate::i18n::t_with_args(
            "import.completed",
            &[("succeeded", succeeded.as_str()), ("total", total.as_str())],
        )
    } else {
        crate::i18n::t_with_args(
            "import.partial",
            &[
                ("succeeded", succeeded.as_str()),
                ("total", total.as_str()),
                ("failed", failed.as_str()),
            ],
        )
    }
}

#[async_trait::async_trait]
impl<R, C> MemberImporter for MemberImporterImpl<R, C>
where
    R: MemberRepository + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, source), fields(source_kind = source.kind()))]
    async fn import(&self, source: ImportSource) -> ImporterResult<ImportSummary> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        let source_label = source.label();
        let mut run = RunTracker::new(&run_id, self.observer.as_ref());

        info!(
            run_id = %run_id,
            source = %source_label,
            collection = crate::MEMBERS_COLLECTION,
            "import run started"
        );

        // === Reading ===
        run.transition(ImportState::Reading);
        let text = match source.read_text().await {
            Ok(text) => text,
            Err(e) => return Err(run.fail(e)),
        };
        debug!(chars = text.chars().count(), "input read");

        // === Parsing ===
        run.transition(ImportState::Parsing);
        let parsed = match self.parse_records(&source, &text).await {
            Ok(parsed) => parsed,
            Err(e) => return Err(run.fail(e)),
        };
        let progress_every = match self.config.get_progress_log_every().await {
            Ok(every) => every.max(1),
            Err(e) => return Err(run.fail(e.into())),
        };

        // === Persisting ===
        run.transition(ImportState::Persisting);
        let result = self
            .persist_records(&run_id, parsed.records, progress_every)
            .await;

        // === Completed ===
        run.transition(ImportState::Completed);
        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        if result.is_total_failure() {
            warn!(
                run_id = %run_id,
                total = result.total,
                failed = result.failed,
                "import completed without storing any record"
            );
        } else {
            info!(
                run_id = %run_id,
                total = result.total,
                succeeded = result.succeeded,
                failed = result.failed,
                elapsed_ms = elapsed_ms,
                "import run completed"
            );
        }

        let message = completion_message(&result);
        Ok(ImportSummary {
            run_id,
            source_label,
            delimiter: parsed.delimiter,
            tier: parsed.tier,
            result,
            elapsed_ms,
            message,
        })
    }

    #[instrument(skip(self, source), fields(source_kind = source.kind()))]
    async fn preview(&self, source: ImportSource) -> ImporterResult<ImportPreview> {
        let text = source.read_text().await?;
        let parsed = self.parse_records(&source, &text).await?;
        let preview_rows = self.config.get_preview_rows().await?;

        let total_records = parsed.records.len();
        let records = parsed.records.into_iter().take(preview_rows).collect();
        debug!(total_records, preview_rows, "preview built");

        Ok(ImportPreview {
            delimiter: parsed.delimiter,
            tier: parsed.tier,
            total_records,
            records,
        })
    }

    #[instrument(skip(self, record))]
    async fn register(&self, record: MemberRecord) -> ImporterResult<String> {
        let record = record.trimmed();
        if !record.has_key_fields() {
            return Err(ImportError::ValidationError(
                MISSING_KEY_FIELDS_REASON.to_string(),
            ));
        }

        self.duplicate_guard
            .ensure_unique(&self.member_repo, &record.national_id)
            .await?;

        let id = self.member_repo.insert(&record).await?;
        info!(id = %id, "member registered");
        Ok(id)
    }
}
