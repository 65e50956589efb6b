//! Decide what a DFHRMUTL response means for the retry loop.

use crate::catalog::{normalize_lines, reason_code, REASON_CODE_MARKER};
use crate::mvs::ProgramResponse;

use super::{BENIGN_REASON_CODE, PROGRAM, PROGRAM_HEADER, SUBPROCESS_EXIT_MESSAGE};

/// How the loop should proceed after one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stop retrying. `rc_overridden` is set when the return code was non-zero
    /// but DFHRMUTL's own markers show it completed; the run counts as rc 0.
    Success { rc_overridden: bool },
    /// A known transient failure; run again.
    BenignRetry { reason_code: String },
    /// Give up.
    TerminalFailure(FailureDetails),
}

/// What went wrong in a terminal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetails {
    pub rc: i32,
    pub reason_code: Option<String>,
    /// First normalized output line carrying a reason code.
    pub diagnostic: Option<String>,
}

impl FailureDetails {
    /// Operator-facing summary.
    pub fn message(&self) -> String {
        match (&self.reason_code, &self.diagnostic) {
            (Some(_), Some(line)) => {
                format!("{} failed with RC {} - {}", PROGRAM, self.rc, line)
            }
            _ => format!(
                "{} failed with RC {} but no reason code was found",
                PROGRAM, self.rc
            ),
        }
    }
}

/// Classify one DFHRMUTL response.
///
/// A non-zero return code is trusted only when the banner is missing from
/// stdout or the launcher's exit confirmation is missing from stderr. In that
/// case the reason code decides: `A8` is retried, anything else is terminal.
pub fn classify(response: &ProgramResponse) -> Outcome {
    if response.rc == 0 {
        return Outcome::Success {
            rc_overridden: false,
        };
    }

    if response.stdout.contains(PROGRAM_HEADER) && response.stderr.contains(SUBPROCESS_EXIT_MESSAGE)
    {
        return Outcome::Success {
            rc_overridden: true,
        };
    }

    let diagnostics: Vec<String> = normalize_lines(&response.stdout)
        .into_iter()
        .filter(|line| line.contains(REASON_CODE_MARKER))
        .collect();

    match reason_code(&diagnostics) {
        // An empty code (e.g. X'00') is neither a known failure nor missing.
        Some(code) if code == BENIGN_REASON_CODE || code.is_empty() => {
            Outcome::BenignRetry { reason_code: code }
        }
        Some(code) => Outcome::TerminalFailure(FailureDetails {
            rc: response.rc,
            reason_code: Some(code),
            diagnostic: diagnostics.into_iter().next(),
        }),
        None => Outcome::TerminalFailure(FailureDetails {
            rc: response.rc,
            reason_code: None,
            diagnostic: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(rc: i32, stdout: &str, stderr: &str) -> ProgramResponse {
        ProgramResponse {
            rc,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    const A8_FAILURE: &str = "DFHRM0401 RMUTL, RETURN: X'08', REASON: X'00A8', CATALOG IN USE";
    const HARD_FAILURE: &str = "DFHRM0402 RMUTL, RETURN: X'08', REASON: X'0010', BAD CATALOG";

    #[test]
    fn test_zero_rc_is_success() {
        assert_eq!(
            classify(&response(0, "", "")),
            Outcome::Success {
                rc_overridden: false
            }
        );
    }

    #[test]
    fn test_markers_override_nonzero_rc() {
        let outcome = classify(&response(
            8,
            "===DFHRMUTL CICS RECOVERY MANAGER BATCH UTILITY===\nAuto-start override : AUTOCOLD",
            "BGYSC0000I something\nAttach Exit code: 0 from DFHRMUTL.",
        ));
        assert_eq!(
            outcome,
            Outcome::Success {
                rc_overridden: true
            }
        );
    }

    #[test]
    fn test_header_alone_is_not_enough() {
        let outcome = classify(&response(
            8,
            &format!("===DFHRMUTL CICS RECOVERY MANAGER BATCH UTILITY===\n{HARD_FAILURE}"),
            "Attach Exit code: 8 from DFHRMUTL.",
        ));
        assert!(matches!(outcome, Outcome::TerminalFailure(_)));
    }

    #[test]
    fn test_a8_is_retried() {
        assert_eq!(
            classify(&response(8, A8_FAILURE, "")),
            Outcome::BenignRetry {
                reason_code: "A8".to_string()
            }
        );
    }

    #[test]
    fn test_other_reason_code_is_terminal() {
        let outcome = classify(&response(8, &format!("line one\n{HARD_FAILURE}"), ""));
        let Outcome::TerminalFailure(details) = outcome else {
            panic!("expected terminal failure");
        };
        assert_eq!(details.rc, 8);
        assert_eq!(details.reason_code.as_deref(), Some("1"));
        assert_eq!(
            details.diagnostic.as_deref(),
            Some("DFHRM0402RMUTL,RETURN:X'08',REASON:X'0010',BADCATALOG")
        );
        assert_eq!(
            details.message(),
            "DFHRMUTL failed with RC 8 - DFHRM0402RMUTL,RETURN:X'08',REASON:X'0010',BADCATALOG"
        );
    }

    #[test]
    fn test_missing_reason_code_is_terminal() {
        let outcome = classify(&response(12, "IEC130I SYSPRINT DD STATEMENT MISSING", ""));
        let Outcome::TerminalFailure(details) = outcome else {
            panic!("expected terminal failure");
        };
        assert_eq!(details.reason_code, None);
        assert_eq!(
            details.message(),
            "DFHRMUTL failed with RC 12 but no reason code was found"
        );
    }

    #[test]
    fn test_empty_reason_code_is_retried() {
        let outcome = classify(&response(4, "RETURN: X'04', REASON: X'00'", ""));
        assert_eq!(
            outcome,
            Outcome::BenignRetry {
                reason_code: String::new()
            }
        );
    }
}
