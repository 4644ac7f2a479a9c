// ==========================================
// Agro Asociados - import layer
// ==========================================
// Responsibility: turn external data into member records
// Sources: delimited text (file or bytes), pasted JSON
// ==========================================

pub mod delimiter;
pub mod duplicate_guard;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod json_parser;
pub mod member_importer_impl;
pub mod member_importer_trait;
pub mod record_builder;
pub mod source;

pub use delimiter::DelimiterSniffer as DelimiterSnifferImpl;
pub use duplicate_guard::DuplicateGuard;
pub use error::{ImportError, ImporterResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{DelimitedTextParser, HeaderMap, ParsedTable, RawRow};
pub use json_parser::{sanitize_value, JsonRecordParser};
pub use member_importer_impl::{completion_message, MemberImporterImpl, MISSING_KEY_FIELDS_REASON};
pub use record_builder::{BuiltRecords, TieredRecordBuilder};
pub use source::ImportSource;

pub use member_importer_trait::{
    DelimiterSniffer, FieldMapper, ImportObserver, MemberImporter, NoOpImportObserver,
    RecordBuilder, TabularParser,
};
