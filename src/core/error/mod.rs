use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,

    ValidationInvalidArgument,

    MappingInvalidEntry,
    MappingDuplicateKey,
    RuleConflict,

    FixFileFailed,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::MappingInvalidEntry => "mapping.invalid_entry",
            ErrorCode::MappingDuplicateKey => "mapping.duplicate_key",
            ErrorCode::RuleConflict => "mapping.rule_conflict",

            ErrorCode::FixFileFailed => "fix.file_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingEntryDetails {
    pub from: String,
    pub to: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConflictDetails {
    pub pattern: String,
    pub from: String,
    pub replacement: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailedDetails {
    pub path: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(field: impl Into<String>, problem: impl Into<String>) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = to_details(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn mapping_invalid_entry(
        from: impl Into<String>,
        to: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        let from = from.into();
        let details = to_details(MappingEntryDetails {
            from: from.clone(),
            to: to.into(),
            problem: problem.into(),
        });

        Self::new(
            ErrorCode::MappingInvalidEntry,
            format!("Invalid field mapping for '{}'", from),
            details,
        )
        .with_hint("Mapping keys must be camelCase identifiers and values must be snake_case")
    }

    pub fn mapping_duplicate_key(from: impl Into<String>, existing: &str, requested: &str) -> Self {
        let from = from.into();
        let details = to_details(MappingEntryDetails {
            from: from.clone(),
            to: requested.to_string(),
            problem: format!("already mapped to '{}'", existing),
        });

        Self::new(
            ErrorCode::MappingDuplicateKey,
            format!("Field '{}' is mapped twice", from),
            details,
        )
    }

    pub fn rule_conflict(
        pattern: impl Into<String>,
        from: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        let details = to_details(RuleConflictDetails {
            pattern: pattern.into(),
            from: from.into(),
            replacement: replacement.into(),
        });

        Self::new(
            ErrorCode::RuleConflict,
            "Rename rule would re-match a replacement",
            details,
        )
        .with_hint("Remove or rename the mapping whose key appears inside another replacement")
    }

    pub fn fix_file_failed(
        path: impl Into<String>,
        error: impl Into<String>,
        context: Option<String>,
    ) -> Self {
        let path = path.into();
        let details = to_details(FileFailedDetails {
            path: path.clone(),
            error: error.into(),
            context,
        });

        Self::new(
            ErrorCode::FixFileFailed,
            format!("File processing failed: {}", path),
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    /// The underlying error text recorded in `details.error`, falling back to the message.
    pub fn detail_error(&self) -> String {
        self.details
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.message.clone())
    }
}
