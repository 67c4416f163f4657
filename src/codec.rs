//! Label/code codecs for the two enumerated unit fields.
//!
//! The register stores `Type` and `AssessmentMethod` as small integer codes;
//! the CSV representation uses human-readable labels. Import accepts either
//! a label or a bare integer. Unknown input never errors: decoding falls
//! back to a fixed default with a logged warning, and unknown codes render
//! as `Unknown (<code>)`.

/// Bidirectional mapping between integer codes and labels.
#[derive(Debug, Clone, Copy)]
pub struct EnumCodec {
    /// Field name used in warnings.
    name: &'static str,
    /// Code/label pairs, label match is case-sensitive.
    table: &'static [(i64, &'static str)],
    /// Code applied when neither label nor integer parse succeeds.
    default_code: i64,
}

/// Codec for the unit `Type` field.
pub const UNIT_TYPE: EnumCodec = EnumCodec {
    name: "Type",
    table: &[
        (1, "Course"),
        (2, "Online Resource"),
        (3, "Document"),
        (6, "Face to Face"),
    ],
    default_code: 1,
};

/// Codec for the unit `AssessmentMethod` field.
pub const ASSESSMENT_METHOD: EnumCodec = EnumCodec {
    name: "AssessmentMethod",
    table: &[
        (0, "None"),
        (1, "Self Sign Off"),
        (2, "Supervisor Sign Off"),
    ],
    default_code: 0,
};

impl EnumCodec {
    /// Renders a code as its label.
    ///
    /// Unrecognized codes render as `Unknown (<code>)` rather than failing;
    /// that string is deliberately not a valid input to [`Self::code_of`].
    #[must_use]
    pub fn label_of(&self, code: i64) -> String {
        self.table
            .iter()
            .find(|(c, _)| *c == code)
            .map_or_else(|| format!("Unknown ({code})"), |(_, label)| (*label).to_string())
    }

    /// Decodes a label (or bare integer) into a code.
    ///
    /// The input is whitespace-trimmed and matched case-sensitively against
    /// the label table. If no label matches, the input is parsed as an
    /// integer; if that fails too, the default code is applied and a warning
    /// is emitted. Never errors.
    #[must_use]
    pub fn code_of(&self, label: &str) -> i64 {
        let trimmed = label.trim();
        if let Some((code, _)) = self.table.iter().find(|(_, l)| *l == trimmed) {
            return *code;
        }
        match trimmed.parse::<i64>() {
            Ok(code) => code,
            Err(_) => {
                tracing::warn!(
                    field = self.name,
                    value = trimmed,
                    default = self.default_code,
                    "unrecognized value, applying default"
                );
                self.default_code
            },
        }
    }

    /// The default code applied to unrecognized input.
    #[must_use]
    pub const fn default_code(&self) -> i64 {
        self.default_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(1, "Course")]
    #[test_case(2, "Online Resource")]
    #[test_case(3, "Document")]
    #[test_case(6, "Face to Face")]
    fn test_type_labels(code: i64, label: &str) {
        assert_eq!(UNIT_TYPE.label_of(code), label);
        assert_eq!(UNIT_TYPE.code_of(label), code);
    }

    #[test_case(0, "None")]
    #[test_case(1, "Self Sign Off")]
    #[test_case(2, "Supervisor Sign Off")]
    fn test_assessment_labels(code: i64, label: &str) {
        assert_eq!(ASSESSMENT_METHOD.label_of(code), label);
        assert_eq!(ASSESSMENT_METHOD.code_of(label), code);
    }

    #[test_case(1)]
    #[test_case(2)]
    #[test_case(3)]
    #[test_case(6)]
    fn test_round_trip_stability(code: i64) {
        let label = UNIT_TYPE.label_of(code);
        assert_eq!(UNIT_TYPE.label_of(UNIT_TYPE.code_of(&label)), label);
    }

    #[test]
    fn test_unknown_code_renders_but_never_decodes() {
        let label = UNIT_TYPE.label_of(42);
        assert_eq!(label, "Unknown (42)");
        // "Unknown (42)" is not a label and not an integer: default applies.
        assert_eq!(UNIT_TYPE.code_of(&label), UNIT_TYPE.default_code());
    }

    #[test]
    fn test_code_of_trims_whitespace() {
        assert_eq!(UNIT_TYPE.code_of(" Course "), 1);
        assert_eq!(ASSESSMENT_METHOD.code_of("  Self Sign Off"), 1);
    }

    #[test]
    fn test_code_of_is_case_sensitive() {
        // Wrong case falls through to integer parse, then to the default.
        assert_eq!(UNIT_TYPE.code_of("course"), UNIT_TYPE.default_code());
        assert_eq!(
            ASSESSMENT_METHOD.code_of("NONE"),
            ASSESSMENT_METHOD.default_code()
        );
    }

    #[test]
    fn test_code_of_integer_fallback() {
        assert_eq!(UNIT_TYPE.code_of("3"), 3);
        assert_eq!(UNIT_TYPE.code_of(" 6 "), 6);
        // Integers outside the table are passed through untouched.
        assert_eq!(UNIT_TYPE.code_of("99"), 99);
    }

    #[test]
    fn test_code_of_default_fallback() {
        assert_eq!(UNIT_TYPE.code_of("not a type"), 1);
        assert_eq!(ASSESSMENT_METHOD.code_of(""), 0);
    }
}
