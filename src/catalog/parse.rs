//! Text extraction from DFHRMUTL SYSPRINT output.
//!
//! The report is column-formatted console text. Every line is compacted by
//! removing all whitespace and upper-casing it before matching, so
//! `Auto-start override : AUTOCOLD` and `AUTO-STARTOVERRIDE:AUTOCOLD` read the
//! same.

use super::CatalogStatus;

const AUTOSTART_OVERRIDE_LABEL: &str = "AUTO-STARTOVERRIDE:";
const NEXTSTART_TYPE_LABEL: &str = "NEXTSTARTTYPE:";

/// Marker for the reason-code field of a diagnostic line.
pub const REASON_CODE_MARKER: &str = "REASON:X";

/// Split output into lines, strip all whitespace and upper-case each line.
pub fn normalize_lines(output: &str) -> Vec<String> {
    output
        .split('\n')
        .map(|line| {
            line.chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_uppercase()
        })
        .collect()
}

/// Read the autostart override and next start type out of an inquiry report.
pub fn parse_catalog_status(output: &str) -> CatalogStatus {
    let lines = normalize_lines(output);
    CatalogStatus {
        autostart_override: single_value(&lines, AUTOSTART_OVERRIDE_LABEL),
        nextstart_type: single_value(&lines, NEXTSTART_TYPE_LABEL),
    }
}

/// Value after the first colon, only when exactly one line carries `label`.
fn single_value(lines: &[String], label: &str) -> Option<String> {
    let mut matching = lines.iter().filter(|line| line.contains(label));
    match (matching.next(), matching.next()) {
        (Some(line), None) => line.split(':').nth(1).map(str::to_string),
        _ => None,
    }
}

/// Extract the reason code from the first of `lines`.
///
/// Lines must already be normalized. The code is the quoted token of the first
/// comma-separated field containing `REASON:X`, with every `0` character
/// removed: `REASON:X'0A80'` yields `A8`. Zero removal is positional-blind, so
/// `A08` also yields `A8`; callers compare against that compacted form.
pub fn reason_code<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    let first = lines.first()?.as_ref();
    let field = first
        .split(',')
        .find(|field| field.contains(REASON_CODE_MARKER))?;
    field
        .split('\'')
        .map(|token| token.replace('0', ""))
        .nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_inquiry() -> String {
        [
            "===DFHRMUTL CICS RECOVERY MANAGER BATCH UTILITY===",
            "",
            "---RMUTL Summary of Global Catalog",
            "   Last System Activity: 2024-01-16 10:21:48",
            "   Auto-start override : AUTOASIS",
            "   Next start type : Emergency",
            "",
        ]
        .join("\n")
    }

    #[test]
    fn test_normalize_strips_whitespace_and_upcases() {
        let lines = normalize_lines(" Next start\ttype : warm\r\nok");
        assert_eq!(lines, vec!["NEXTSTARTTYPE:WARM".to_string(), "OK".to_string()]);
    }

    #[test]
    fn test_parse_inquiry_report() {
        let status = parse_catalog_status(&fixture_inquiry());
        assert_eq!(status.autostart_override.as_deref(), Some("AUTOASIS"));
        assert_eq!(status.nextstart_type.as_deref(), Some("EMERGENCY"));
    }

    #[test]
    fn test_parse_compact_labels() {
        let status = parse_catalog_status("AUTO-STARTOVERRIDE:AUTOCOLD\nNEXTSTARTTYPE:COLD");
        assert_eq!(status.autostart_override.as_deref(), Some("AUTOCOLD"));
        assert_eq!(status.nextstart_type.as_deref(), Some("COLD"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let status = parse_catalog_status("===DFHRMUTL CICS RECOVERY MANAGER BATCH UTILITY===");
        assert_eq!(status, CatalogStatus::default());
    }

    #[test]
    fn test_duplicate_field_is_none() {
        let output = "Auto-start override : AUTOCOLD\n\
                      Next start type : Cold\n\
                      Auto-start override : AUTOINIT";
        let status = parse_catalog_status(output);
        assert_eq!(status.autostart_override, None);
        assert_eq!(status.nextstart_type.as_deref(), Some("COLD"));
    }

    #[test]
    fn test_value_stops_at_next_colon() {
        let status = parse_catalog_status("Next start type : Warm : pending");
        assert_eq!(status.nextstart_type.as_deref(), Some("WARM"));
    }

    #[test]
    fn test_parse_is_repeatable() {
        let output = fixture_inquiry();
        assert_eq!(parse_catalog_status(&output), parse_catalog_status(&output));
    }

    #[test]
    fn test_reason_code_empty_input() {
        let lines: Vec<String> = Vec::new();
        assert_eq!(reason_code(&lines), None);
    }

    #[test]
    fn test_reason_code_strips_every_zero() {
        let lines = ["DFHRM0401,RETURN:X'08',REASON:X'0A80',MODULE:DFHRMUT"];
        assert_eq!(reason_code(&lines).as_deref(), Some("A8"));
    }

    #[test]
    fn test_reason_code_interior_zero_is_lost() {
        let lines = ["RC:X'08',REASON:X'A08'"];
        assert_eq!(reason_code(&lines).as_deref(), Some("A8"));
    }

    #[test]
    fn test_reason_code_without_marker() {
        let lines = ["DFHRM0401,RETURN:X'08',MODULE:DFHRMUT"];
        assert_eq!(reason_code(&lines), None);
    }

    #[test]
    fn test_reason_code_only_reads_first_line() {
        let lines = ["NOREASONHERE", "RC:X'08',REASON:X'10'"];
        assert_eq!(reason_code(&lines), None);
    }

    #[test]
    fn test_reason_code_without_quote() {
        let lines = ["RETURN:X'08',REASON:X"];
        assert_eq!(reason_code(&lines), None);
    }
}
