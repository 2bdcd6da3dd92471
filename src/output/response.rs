//! What the binary writes: the JSON envelope for `--json` and `config`,
//! a plain error line for text mode, and the exit code for each error.

use fieldfix::error::Hint;
use fieldfix::{Error, ErrorCode, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// `{ "success": true, "data": ... }` or `{ "success": false, "error": ... }`.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

impl Envelope {
    pub fn from_result(result: Result<Value>) -> Self {
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
            },
            Err(err) => Self {
                success: false,
                data: None,
                error: Some(ErrorBody {
                    code: err.code.as_str(),
                    message: err.message,
                    details: err.details,
                    hints: err.hints,
                }),
            },
        }
    }
}

/// Serialize a command's output, keeping its exit code. Errors map through
/// `exit_code_for_error`.
pub fn map_cmd_result_to_json<T: Serialize>(result: Result<(T, i32)>) -> (Result<Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

/// Write the envelope for `result` to stdout. A closed pipe is not an error.
pub fn print_envelope(result: Result<Value>) -> Result<()> {
    let payload = serde_json::to_string_pretty(&Envelope::from_result(result))
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize response".to_string())))?;

    match writeln!(io::stdout().lock(), "{}", payload) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(Error::internal_io(e.to_string(), Some("write stdout".to_string()))),
    }
}

/// Text-mode rendering of an error: `Error [code]: message (reason)`, then
/// one `Hint:` line per hint.
pub fn render_error(err: &Error) -> String {
    let mut out = format!("Error [{}]: {}", err.code.as_str(), err.message);

    let reason = err
        .details
        .get("error")
        .or_else(|| err.details.get("problem"))
        .and_then(Value::as_str);
    if let Some(reason) = reason {
        out.push_str(&format!(" ({})", reason));
    }

    for hint in &err.hints {
        out.push_str(&format!("\nHint: {}", hint.message));
    }
    out
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::MappingInvalidEntry
        | ErrorCode::MappingDuplicateKey
        | ErrorCode::RuleConflict => 2,

        ErrorCode::FixFileFailed
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_exit_with_two() {
        let err = Error::validation_invalid_argument("root", "missing");
        let (result, code) = map_cmd_result_to_json::<()>(Err(err));
        assert!(result.is_err());
        assert_eq!(code, 2);
    }

    #[test]
    fn io_errors_exit_with_one() {
        assert_eq!(exit_code_for_error(ErrorCode::InternalIoError), 1);
        assert_eq!(exit_code_for_error(ErrorCode::FixFileFailed), 1);
    }

    #[test]
    fn success_envelope_carries_data_only() {
        let json = serde_json::to_value(Envelope::from_result(Ok(serde_json::json!({ "n": 1 }))))
            .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["n"], 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn error_envelope_includes_code_and_hints() {
        let err = Error::rule_conflict(r"\border\b", "order", "order");
        let json = serde_json::to_value(Envelope::from_result(Err(err))).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
        assert_eq!(json["error"]["code"], "mapping.rule_conflict");
        assert_eq!(json["error"]["details"]["from"], "order");
        assert!(json["error"]["hints"].is_array());
    }

    #[test]
    fn error_envelope_omits_empty_hints() {
        let err = Error::internal_io("disk full", None);
        let json = serde_json::to_value(Envelope::from_result(Err(err))).unwrap();
        assert!(json["error"].get("hints").is_none());
    }

    #[test]
    fn text_error_line_names_code_and_reason() {
        let err = Error::validation_invalid_argument("root", "Directory not found: src");
        assert_eq!(
            render_error(&err),
            "Error [validation.invalid_argument]: Invalid argument (Directory not found: src)"
        );
    }

    #[test]
    fn text_error_lists_hints_on_their_own_lines() {
        let err = Error::mapping_invalid_entry("order_id", "order_id", "key has no uppercase letter");
        let text = render_error(&err);
        assert!(text.starts_with(
            "Error [mapping.invalid_entry]: Invalid field mapping for 'order_id' (key has no uppercase letter)"
        ));
        assert!(text.contains(
            "\nHint: Mapping keys must be camelCase identifiers and values must be snake_case"
        ));
    }
}
