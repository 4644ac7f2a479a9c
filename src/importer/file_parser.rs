// ==========================================
// Agro Asociados - tabular parser
// ==========================================
// Stage: Parsing (text -> lines -> raw rows)
// Tokenising: csv crate with quoting disabled, so a delimiter inside
// quoted text still splits the field
// ==========================================

use crate::importer::error::{ImportError, ImporterResult};
use crate::importer::member_importer_trait::TabularParser as TabularParserTrait;
use csv::{ReaderBuilder, Trim};

/// Ordered tokens of one input line
pub type RawRow = Vec<String>;

/// Lower-cased, trimmed, quote-stripped tokens of the first line
pub type HeaderMap = Vec<String>;

// ==========================================
// ParsedTable - output of the parsing stage
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub lines: Vec<String>, // non-blank source lines, kept for the whitespace tier
    pub rows: Vec<RawRow>,  // one per line
    pub delimiter: char,
}

impl ParsedTable {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// First row as a header map
    pub fn header(&self) -> HeaderMap {
        self.rows
            .first()
            .map(|row| row.iter().map(|token| token.to_lowercase()).collect())
            .unwrap_or_default()
    }
}

/// Split on any run of CR/LF and drop blank lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Remove one layer of matching surrounding quotes
pub fn strip_quotes(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            return &token[1..token.len() - 1];
        }
    }
    token
}

pub struct DelimitedTextParser;

impl TabularParserTrait for DelimitedTextParser {
    fn parse(&self, text: &str, delimiter: char) -> ImporterResult<ParsedTable> {
        let lines = split_lines(text);
        if lines.is_empty() {
            return Err(ImportError::empty_input());
        }

        let delimiter_byte = u8::try_from(delimiter).map_err(|_| {
            ImportError::FormatError(format!("unsupported delimiter: {:?}", delimiter))
        })?;

        let joined = lines.join("\n");
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter_byte)
            .has_headers(false)
            .flexible(true) // rows may differ in length
            .quoting(false)
            .trim(Trim::All)
            .from_reader(joined.as_bytes());

        let mut rows = Vec::with_capacity(lines.len());
        for result in reader.records() {
            let record = result?;
            let row: RawRow = record
                .iter()
                .map(|token| strip_quotes(token.trim()).to_string())
                .collect();
            rows.push(row);
        }

        Ok(ParsedTable {
            lines,
            rows,
            delimiter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_drops_blank_lines() {
        let lines = split_lines("a,b\r\n\r\n   \nc,d\r");
        assert_eq!(lines, vec!["a,b".to_string(), "c,d".to_string()]);
    }

    #[test]
    fn test_parse_trims_and_strips_quotes() {
        let table = DelimitedTextParser
            .parse("\"Nombre\" ; 'Apellido'\n Juan ;\"Perez\"\n", ';')
            .unwrap();

        assert_eq!(table.line_count(), 2);
        assert_eq!(table.rows[0], vec!["Nombre", "Apellido"]);
        assert_eq!(table.rows[1], vec!["Juan", "Perez"]);
        assert_eq!(table.header(), vec!["nombre", "apellido"]);
    }

    #[test]
    fn test_only_one_quote_layer_removed() {
        assert_eq!(strip_quotes("\"\"x\"\""), "\"x\"");
        assert_eq!(strip_quotes("'x\""), "'x\"");
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn test_quoted_delimiter_is_not_protected() {
        let table = DelimitedTextParser
            .parse("direccion,nombre\n\"Calle 1, Km 3\",Ana\n", ',')
            .unwrap();
        assert_eq!(table.rows[1], vec!["\"Calle 1", "Km 3\"", "Ana"]);
    }

    #[test]
    fn test_ragged_rows_accepted() {
        let table = DelimitedTextParser
            .parse("a\tb\tc\n1\n1\t2\t3\t4", '\t')
            .unwrap();
        assert_eq!(table.rows[1].len(), 1);
        assert_eq!(table.rows[2].len(), 4);
    }

    #[test]
    fn test_empty_input_is_format_error() {
        let err = DelimitedTextParser.parse("  \r\n\n", ',').unwrap_err();
        assert!(matches!(err, ImportError::FormatError(ref msg) if msg == "empty or no valid lines"));
    }
}
