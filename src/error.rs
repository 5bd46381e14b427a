//! Error types for path compilation and record extraction.

/// A path expression failed to compile. Raised once, when the expression is
/// parsed, never during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid path expression `{expression}` at offset {position}: {kind}")]
pub struct PathExpressionError {
    pub expression: String,
    pub position: usize,
    pub kind: PathErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathErrorKind {
    #[error("expression is empty")]
    Empty,

    #[error("expected {expected}, found end of expression")]
    UnexpectedEnd { expected: &'static str },

    #[error("expected {expected}, found `{found}`")]
    UnexpectedChar { expected: &'static str, found: char },

    #[error("unsupported function `{0}()`")]
    UnsupportedFunction(String),

    #[error("positions start at 1, `[0]` never matches")]
    ZeroPosition,

    #[error("`{0}` must be the last step")]
    ExtractionNotLast(&'static str),

    #[error("unterminated string literal")]
    UnterminatedLiteral,

    #[error("attributes can only be taken from the child axis (`/@name`)")]
    DescendantAttribute,
}

/// A required region or field could not be resolved from a document. This
/// means the fixed path set no longer matches the page layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("required region `{region}` not found in document")]
    MissingRegion { region: &'static str },

    #[error("required field `{field}` could not be resolved in the `{region}` region")]
    MissingField {
        field: &'static str,
        region: &'static str,
    },
}

impl ExtractionError {
    /// Pipeline stage that failed: `"region"` or `"field"`.
    pub fn stage(&self) -> &'static str {
        match self {
            ExtractionError::MissingRegion { .. } => "region",
            ExtractionError::MissingField { .. } => "field",
        }
    }

    /// Name of the missing region or field.
    pub fn missing(&self) -> &'static str {
        match self {
            ExtractionError::MissingRegion { region } => region,
            ExtractionError::MissingField { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_error_names_what_is_missing() {
        let err = ExtractionError::MissingField {
            field: "senate_prev_or_next",
            region: "senate",
        };
        assert_eq!(err.stage(), "field");
        assert_eq!(err.missing(), "senate_prev_or_next");
        assert_eq!(
            err.to_string(),
            "required field `senate_prev_or_next` could not be resolved in the `senate` region"
        );

        let err = ExtractionError::MissingRegion {
            region: "legislative-activity-region",
        };
        assert_eq!(err.stage(), "region");
        assert_eq!(err.missing(), "legislative-activity-region");
    }

    #[test]
    fn path_error_display_carries_source_and_offset() {
        let err = PathExpressionError {
            expression: "//div[0]".into(),
            position: 6,
            kind: PathErrorKind::ZeroPosition,
        };
        assert_eq!(
            err.to_string(),
            "invalid path expression `//div[0]` at offset 6: positions start at 1, `[0]` never matches"
        );
    }
}
