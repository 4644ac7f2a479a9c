// ==========================================
// Agro Asociados - JSON record parser
// ==========================================
// Stage: Parsing for pasted JSON text
// Accepts an array of objects or a single object
// ==========================================

use crate::domain::member::{CanonicalField, MemberField, MemberRecord};
use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::member_importer_trait::FieldMapper;
use serde_json::Value;
use tracing::debug;

/// Accented letters kept by the value filter
const KEPT_ACCENTED: &str = "áéíóúÁÉÍÓÚñÑüÜ";

/// Punctuation kept by the value filter
const KEPT_PUNCTUATION: &str = ".,;:-";

/// Drop every character outside the allowed set
/// (ASCII word characters, whitespace, `. , ; : -` and Spanish accented letters).
pub fn sanitize_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || *c == '_'
                || c.is_whitespace()
                || KEPT_PUNCTUATION.contains(*c)
                || KEPT_ACCENTED.contains(*c)
        })
        .collect()
}

/// Stringify one JSON value
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

pub struct JsonRecordParser;

impl JsonRecordParser {
    /// Parse JSON text into member records.
    ///
    /// # Arguments
    /// - text: JSON array of objects or a single object
    /// - mapper: applied to keys that are not already canonical
    /// - sanitize: apply `sanitize_value` to every value
    ///
    /// # Returns
    /// - Err(FormatError): invalid JSON, or an empty array
    pub fn parse(
        &self,
        text: &str,
        mapper: &dyn FieldMapper,
        sanitize: bool,
    ) -> ImporterResult<Vec<MemberRecord>> {
        let parsed: Value = serde_json::from_str(text.trim())?;

        let items = match parsed {
            Value::Array(items) => items,
            other => vec![other],
        };

        if items.is_empty() {
            return Err(ImportError::empty_input());
        }

        let records: Vec<MemberRecord> = items
            .iter()
            .map(|item| self.object_to_record(item, mapper, sanitize))
            .collect();

        debug!(records = records.len(), sanitize, "JSON records parsed");
        Ok(records)
    }

    /// Non-object elements become empty records; they fail validation later
    fn object_to_record(
        &self,
        item: &Value,
        mapper: &dyn FieldMapper,
        sanitize: bool,
    ) -> MemberRecord {
        let mut record = MemberRecord::default();
        let Some(object) = item.as_object() else {
            return record;
        };

        for (key, value) in object {
            let field = match MemberField::from_key(key) {
                Some(known) => CanonicalField::Known(known),
                None => mapper.map_header(&key.trim().to_lowercase()),
            };

            let text = value_to_string(value);
            let text = if sanitize { sanitize_value(&text) } else { text };
            record.set(&field, text);
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::field_mapper::FieldMapper as DefaultFieldMapper;

    #[test]
    fn test_array_with_canonical_and_spanish_keys() {
        let text = r#"[
            {"name": "Ana", "surname": "Ruiz", "nationalId": "001-2"},
            {"Nombre": "Juan", "Apellido": "Perez", "Cantidad Tareas": 12}
        ]"#;
        let records = JsonRecordParser
            .parse(text, &DefaultFieldMapper, true)
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], MemberRecord::new("Ana", "Ruiz", "001-2"));
        assert_eq!(records[1].name, "Juan");
        assert_eq!(records[1].land_area, "12");
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let records = JsonRecordParser
            .parse(r#"{"cedula": "001-9"}"#, &DefaultFieldMapper, false)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].national_id, "001-9");
    }

    #[test]
    fn test_values_stringified() {
        let text = r#"{"name": null, "criaAnimales": true, "finca": [1, 2]}"#;
        let records = JsonRecordParser
            .parse(text, &DefaultFieldMapper, false)
            .unwrap();
        let record = &records[0];
        assert_eq!(record.name, "");
        assert_eq!(record.livestock_count, "true");
        assert_eq!(record.extra.get("finca"), Some(&"[1,2]".to_string()));
    }

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value("José <b>Núñez</b>!"), "José bNúñezb");
        assert_eq!(sanitize_value("Calle 5, Km. 3-A; lote_2"), "Calle 5, Km. 3-A; lote_2");
        assert_eq!(sanitize_value("809/555@0000"), "8095550000");
    }

    #[test]
    fn test_non_object_elements_become_empty_records() {
        let records = JsonRecordParser
            .parse(r#"[{"name": "Ana"}, 42, "x"]"#, &DefaultFieldMapper, true)
            .unwrap();
        assert_eq!(records.len(), 3);
        assert!(!records[1].has_any_value());
        assert!(!records[2].has_key_fields());
    }

    #[test]
    fn test_invalid_json_and_empty_array_are_format_errors() {
        let err = JsonRecordParser
            .parse("{not json", &DefaultFieldMapper, true)
            .unwrap_err();
        assert!(matches!(err, ImportError::FormatError(_)));

        let err = JsonRecordParser
            .parse("[]", &DefaultFieldMapper, true)
            .unwrap_err();
        assert!(matches!(err, ImportError::FormatError(_)));
    }
}
