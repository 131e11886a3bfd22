/// A check applied to the raw values bound to a field.
///
/// Single-valued fields are checked against a one-element slice holding the
/// submitted value (empty string when nothing was sent). Multi-valued fields
/// are checked against every selected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Rejects a field whose values are all empty.
    Required { message: String },

    /// Rejects a field with any value longer than `limit` characters.
    MaxLength { limit: usize, message: String },
}

impl Validator {
    /// `Err` carries the configured message of the rejecting validator.
    pub fn check(&self, values: &[String]) -> Result<(), &str> {
        match self {
            Validator::Required { message } => {
                if values.iter().all(|value| value.is_empty()) {
                    return Err(message);
                }
            }
            Validator::MaxLength { limit, message } => {
                if values.iter().any(|value| value.chars().count() > *limit) {
                    return Err(message);
                }
            }
        }
        Ok(())
    }

    pub fn message(&self) -> &str {
        match self {
            Validator::Required { message } | Validator::MaxLength { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|v| v.to_string()).collect()
    }

    fn required() -> Validator {
        Validator::Required {
            message: "required".to_string(),
        }
    }

    fn max_length(limit: usize) -> Validator {
        Validator::MaxLength {
            limit,
            message: format!("at most {}", limit),
        }
    }

    // ==================== Required Tests ====================

    #[test]
    fn test_required_rejects_empty_value() {
        assert_eq!(required().check(&values(&[""])), Err("required"));
    }

    #[test]
    fn test_required_rejects_no_values() {
        assert_eq!(required().check(&[]), Err("required"));
    }

    #[test]
    fn test_required_accepts_non_empty() {
        assert!(required().check(&values(&["Ada"])).is_ok());
        assert!(required().check(&values(&["", "red"])).is_ok());
    }

    #[test]
    fn test_required_accepts_whitespace() {
        assert!(required().check(&values(&[" "])).is_ok());
    }

    // ==================== MaxLength Tests ====================

    #[test]
    fn test_max_length_boundary() {
        let validator = max_length(3);
        assert!(validator.check(&values(&["abc"])).is_ok());
        assert_eq!(validator.check(&values(&["abcd"])), Err("at most 3"));
    }

    #[test]
    fn test_max_length_counts_characters_not_bytes() {
        let validator = max_length(4);
        assert!(validator.check(&values(&["مرحب"])).is_ok());
        assert!(validator.check(&values(&["مرحبا"])).is_err());
    }

    #[test]
    fn test_max_length_checks_every_value() {
        let validator = max_length(2);
        assert!(validator.check(&values(&["ab", "abc"])).is_err());
    }

    #[test]
    fn test_max_length_zero_allows_only_empty() {
        let validator = max_length(0);
        assert!(validator.check(&values(&[""])).is_ok());
        assert!(validator.check(&values(&["a"])).is_err());
    }

    #[test]
    fn test_message_accessor() {
        assert_eq!(required().message(), "required");
        assert_eq!(max_length(9).message(), "at most 9");
    }
}
