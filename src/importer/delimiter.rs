// ==========================================
// Agro Asociados - delimiter sniffer
// ==========================================
// Only the first non-blank line is inspected:
// ';' wins over '\t', which wins over the ',' default
// ==========================================

use crate::importer::member_importer_trait::DelimiterSniffer as DelimiterSnifferTrait;

pub struct DelimiterSniffer;

impl DelimiterSnifferTrait for DelimiterSniffer {
    fn sniff(&self, text: &str) -> char {
        let first_line = text
            .split(['\r', '\n'])
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");

        if first_line.contains(';') {
            ';'
        } else if first_line.contains('\t') {
            '\t'
        } else {
            ','
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semicolon_wins_over_later_commas() {
        let text = "nombre;apellido\nAna,Maria;Ruiz\n";
        assert_eq!(DelimiterSniffer.sniff(text), ';');
    }

    #[test]
    fn test_tab_detected() {
        assert_eq!(DelimiterSniffer.sniff("nombre\tapellido\nAna\tRuiz"), '\t');
    }

    #[test]
    fn test_semicolon_wins_over_tab_on_same_line() {
        assert_eq!(DelimiterSniffer.sniff("a\tb;c"), ';');
    }

    #[test]
    fn test_defaults_to_comma() {
        assert_eq!(DelimiterSniffer.sniff("Ana Ruiz 001-2"), ',');
        assert_eq!(DelimiterSniffer.sniff(""), ',');
    }

    #[test]
    fn test_later_lines_ignored() {
        assert_eq!(DelimiterSniffer.sniff("nombre,apellido\nAna;Ruiz"), ',');
    }

    #[test]
    fn test_leading_blank_lines_skipped() {
        assert_eq!(DelimiterSniffer.sniff("\r\n  \nnombre;apellido"), ';');
    }
}
