// ==========================================
// Agro Asociados - record builder
// ==========================================
// Stage: Parsing (raw rows -> MemberRecord)
// Tiers, in order:
// 1. header-mapped: first line is a header (>= 2 non-empty tokens)
// 2. headerless: default field order
// 3. whitespace fallback: only when 1 and 2 produced nothing
// ==========================================

use crate::domain::import::BuildTier;
use crate::domain::member::{CanonicalField, MemberField, MemberRecord};
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::file_parser::{ParsedTable, RawRow};
use crate::importer::member_importer_trait::{
    FieldMapper, RecordBuilder as RecordBuilderTrait,
};
use tracing::debug;

/// Minimum number of non-empty tokens for the first line to count as a header
const MIN_HEADER_TOKENS: usize = 2;

/// Minimum words per line in the whitespace fallback
const MIN_FALLBACK_WORDS: usize = 2;

// ==========================================
// BuiltRecords - records plus the tier that produced them
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRecords {
    pub records: Vec<MemberRecord>,
    pub tier: BuildTier,
}

pub struct TieredRecordBuilder;

impl RecordBuilderTrait for TieredRecordBuilder {
    fn build(
        &self,
        table: &ParsedTable,
        mapper: &dyn FieldMapper,
    ) -> ImporterResult<BuiltRecords> {
        let (records, tier) = if table.line_count() == 1 {
            (self.build_single_line(table), BuildTier::Headerless)
        } else {
            self.build_with_header(table, mapper)
        };

        if !records.is_empty() {
            return Ok(BuiltRecords { records, tier });
        }

        debug!(
            lines = table.line_count(),
            "delimited tiers produced no records, trying whitespace fallback"
        );
        let records = self.build_whitespace_fallback(&table.lines);
        if records.is_empty() {
            return Err(ImportError::no_records());
        }

        Ok(BuiltRecords {
            records,
            tier: BuildTier::WhitespaceFallback,
        })
    }
}

impl TieredRecordBuilder {
    /// One line in total: its tokens are data in default field order.
    /// A single token carries no delimiter evidence and yields nothing.
    fn build_single_line(&self, table: &ParsedTable) -> Vec<MemberRecord> {
        let default_header = default_header();
        table
            .rows
            .iter()
            .filter(|row| row.len() >= MIN_HEADER_TOKENS)
            .filter_map(|row| pair_row(&default_header, row))
            .collect()
    }

    /// Two or more lines: the first line is consumed as header. When it is
    /// not header-like the default field order is used instead.
    fn build_with_header(
        &self,
        table: &ParsedTable,
        mapper: &dyn FieldMapper,
    ) -> (Vec<MemberRecord>, BuildTier) {
        let header = table.header();
        let non_empty = header.iter().filter(|token| !token.is_empty()).count();

        let (fields, tier) = if non_empty >= MIN_HEADER_TOKENS {
            let fields: Vec<Option<CanonicalField>> = header
                .iter()
                .map(|token| {
                    if token.is_empty() {
                        None
                    } else {
                        Some(mapper.map_header(token))
                    }
                })
                .collect();
            (fields, BuildTier::HeaderMapped)
        } else {
            debug!(
                header_tokens = header.len(),
                "first line is not a usable header, using default field order"
            );
            (default_header(), BuildTier::Headerless)
        };

        let records = table
            .rows
            .iter()
            .skip(1)
            .filter_map(|row| pair_row(&fields, row))
            .collect();

        (records, tier)
    }

    /// Split every line on whitespace, independent of the delimiter
    fn build_whitespace_fallback(&self, lines: &[String]) -> Vec<MemberRecord> {
        lines
            .iter()
            .filter_map(|line| {
                let words: Vec<&str> = line.split_whitespace().collect();
                if words.len() < MIN_FALLBACK_WORDS {
                    return None;
                }

                let mut record = MemberRecord::new(words[0], words[1], "");
                if let Some(national_id) = words.get(2) {
                    record.national_id = national_id.to_string();
                }
                if let Some(phone) = words.get(3) {
                    record.phone = phone.to_string();
                }
                if words.len() > 4 {
                    record.address = words[4..].join(" ");
                }
                Some(record)
            })
            .collect()
    }
}

fn default_header() -> Vec<Option<CanonicalField>> {
    MemberField::DEFAULT_ORDER
        .iter()
        .map(|field| Some(CanonicalField::Known(*field)))
        .collect()
}

/// Pair header fields and values by position, up to the shorter of the two.
/// Rows where every paired value is empty are dropped.
fn pair_row(fields: &[Option<CanonicalField>], row: &RawRow) -> Option<MemberRecord> {
    let mut record = MemberRecord::default();
    let mut has_value = false;

    for (field, value) in fields.iter().zip(row.iter()) {
        if let Some(field) = field {
            if !value.trim().is_empty() {
                has_value = true;
            }
            record.set(field, value.as_str());
        }
    }

    if has_value {
        Some(record)
    } else {
        None
    }
}
