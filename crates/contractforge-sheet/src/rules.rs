//! Format rules from the rules sheet

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use contractforge_core::{Diagnostic, DiagnosticCode, FormatOverride, FormatRules, Location, Severity};

use crate::layout::rules as layout;
use crate::workbook::Sheet;

/// Field names carrying a date rule contain a `*dat*` or `*date*` token
fn date_field_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\*date?\*").expect("date field pattern is valid"))
}

/// Resolves date/decimal format rules per file
pub struct FormatRulesResolver;

impl FormatRulesResolver {
    /// Whether a rules-sheet field name designates a date rule
    pub fn is_date_field(field: &str) -> bool {
        date_field_pattern().is_match(field)
    }

    /// Resolve format rules for a set of known file identifiers
    ///
    /// Every date rule updates the global default (last one wins) and
    /// becomes the override of each known file id contained in the field
    /// name. Once any per-file override exists the global default is
    /// dropped.
    pub fn resolve(sheet: &Sheet, file_ids: &BTreeSet<String>, diagnostics: &mut Vec<Diagnostic>) -> FormatRules {
        let mut global = FormatOverride::default();
        let mut overrides = BTreeMap::new();

        for (index, row) in sheet.rows_from(layout::FIRST_ROW) {
            if row.get(layout::FILE).is_empty() {
                break;
            }
            let Some(field) = row.text(layout::FIELD) else {
                continue;
            };
            if !Self::is_date_field(&field) {
                continue;
            }

            let rule = row.text(layout::RULE).unwrap_or_default().replace('"', "");
            let format = FormatOverride::with_date_format(rule);
            tracing::debug!(row = index + 1, field = %field, date_format = %format.date_format, "Date rule");

            let field_lower = field.to_lowercase();
            for file_id in file_ids {
                if !file_id.is_empty() && field_lower.contains(&file_id.to_lowercase()) {
                    overrides.insert(file_id.clone(), format.clone());
                }
            }
            global = format;
        }

        if !overrides.is_empty() {
            tracing::info!(files = overrides.len(), "Resolved per-file format overrides");
            return FormatRules::per_file(overrides);
        }

        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::FormatRuleGlobal,
                Severity::Info,
                format!("No file-specific date rule, '{}' applies to every file", global.date_format),
            )
            .with_location(Location::new(&sheet.name)),
        );

        FormatRules::global(global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::Row;
    use contractforge_core::FormatLookupError;
    use pretty_assertions::assert_eq;

    fn rule_row(file: &str, field: &str, rule: &str) -> Row {
        let mut row = Row::default();
        row.set(layout::FILE, file.into());
        row.set(layout::FIELD, field.into());
        row.set(layout::RULE, rule.into());
        row
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn date_field_tokens() {
        assert!(FormatRulesResolver::is_date_field("*DATE*"));
        assert!(FormatRulesResolver::is_date_field("F1 *dat*"));
        assert!(!FormatRulesResolver::is_date_field("BIRTH_DATE"));
    }

    #[test]
    fn per_file_overrides_replace_global() {
        let sheet = Sheet::from_rows(
            layout::SHEET,
            vec![
                rule_row("ALL", "*DATE*", "\"yyyy-MM-dd\""),
                rule_row("F1", "F1 *date*", "\"yyyyMMdd\""),
            ],
        );
        let mut diagnostics = Vec::new();

        let rules = FormatRulesResolver::resolve(&sheet, &ids(&["F1", "F2"]), &mut diagnostics);

        assert_eq!(rules.default, None);
        assert_eq!(rules.resolve("F1").unwrap().date_format, "yyyyMMdd");
        assert_eq!(
            rules.resolve("F2"),
            Err(FormatLookupError::MissingOverride("F2".to_string()))
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn global_rule_when_no_file_matches() {
        let sheet = Sheet::from_rows(
            layout::SHEET,
            vec![
                rule_row("ALL", "*date*", "dd-MM-yyyy"),
                rule_row("ALL", "*date*", "dd/MM/yyyy"),
                rule_row("ALL", "AMOUNT", "#.##"),
            ],
        );
        let mut diagnostics = Vec::new();

        let rules = FormatRulesResolver::resolve(&sheet, &ids(&["F1"]), &mut diagnostics);

        assert_eq!(rules.resolve("F1").unwrap().date_format, "dd/MM/yyyy");
        assert_eq!(diagnostics[0].code, DiagnosticCode::FormatRuleGlobal);
    }

    #[test]
    fn scanning_stops_at_empty_file_cell() {
        let sheet = Sheet::from_rows(
            layout::SHEET,
            vec![
                rule_row("ALL", "NAME", "upper"),
                rule_row("", "*date*", "yyyy"),
                rule_row("ALL", "*date*", "MM/yyyy"),
            ],
        );

        let rules = FormatRulesResolver::resolve(&sheet, &ids(&["F1"]), &mut Vec::new());
        assert_eq!(rules, FormatRules::default());
    }
}
