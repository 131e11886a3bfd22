//! Field builder: turns schema questions into validator-equipped fields.

use crate::form::{CleanedValue, Validator};
use crate::i18n::{format_template, CatalogError, ErrorTemplate, Locale, MessageCatalog};
use crate::schema::{Question, QuestionKind, QuestionType};
use tracing::warn;

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    pub display: String,
    pub selected_by_default: bool,
    pub disabled: bool,
}

impl ChoiceOption {
    fn from_choice(choice: &str) -> Self {
        Self {
            value: choice.to_string(),
            display: choice.to_string(),
            selected_by_default: false,
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-valued free text.
    Text,

    /// Single-valued integer; `invalid` is shown for non-integer input.
    Integer { invalid: String },

    /// Checkboxes: zero or more of the options.
    MultipleChoice {
        options: Vec<ChoiceOption>,
        invalid: String,
    },

    /// Radio buttons: one of the options.
    SingleChoice {
        options: Vec<ChoiceOption>,
        invalid: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
    pub validators: Vec<Validator>,
}

impl Field {
    pub fn is_multi_valued(&self) -> bool {
        matches!(self.kind, FieldKind::MultipleChoice { .. })
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match &self.kind {
            FieldKind::MultipleChoice { options, .. } | FieldKind::SingleChoice { options, .. } => {
                options.as_slice()
            }
            FieldKind::Text | FieldKind::Integer { .. } => &[],
        }
    }

    /// Values the validator chain sees: every value for multi-valued fields,
    /// otherwise the first submitted value (empty when absent).
    pub fn effective_values(&self, raw: &[String]) -> Vec<String> {
        if self.is_multi_valued() {
            raw.iter().filter(|value| !value.is_empty()).cloned().collect()
        } else {
            vec![raw.first().cloned().unwrap_or_default()]
        }
    }

    /// Run the validator chain, then coerce to the field's cleaned type.
    ///
    /// Stops at the first rejecting validator; `Err` carries its message.
    pub fn clean(&self, raw: &[String]) -> Result<CleanedValue, String> {
        let values = self.effective_values(raw);
        for validator in &self.validators {
            validator.check(&values).map_err(str::to_string)?;
        }

        match &self.kind {
            FieldKind::Text => Ok(CleanedValue::Text(values.concat())),
            FieldKind::Integer { invalid } => {
                let value = values.concat();
                // Only a truly absent answer is empty; blank input is not a number.
                if value.is_empty() {
                    return Ok(CleanedValue::Empty);
                }
                value
                    .trim()
                    .parse::<i64>()
                    .map(CleanedValue::Integer)
                    .map_err(|_| invalid.clone())
            }
            FieldKind::SingleChoice { options, invalid } => {
                let value = values.concat();
                if value.is_empty() || options.iter().any(|option| option.value == value) {
                    Ok(CleanedValue::Text(value))
                } else {
                    Err(invalid.clone())
                }
            }
            FieldKind::MultipleChoice { options, invalid } => {
                if !values
                    .iter()
                    .all(|value| options.iter().any(|option| &option.value == value))
                {
                    return Err(invalid.clone());
                }
                let selected = options
                    .iter()
                    .filter(|option| values.contains(&option.value))
                    .map(|option| option.value.clone())
                    .collect();
                Ok(CleanedValue::Choices(selected))
            }
        }
    }
}

/// Build the fields for a locale's questions, in question order.
///
/// Questions with an unsupported type are dropped with a warning.
pub fn build_fields(
    questions: &[Question],
    locale: Locale,
    catalog: &MessageCatalog,
) -> Result<Vec<Field>, CatalogError> {
    let mut fields = Vec::with_capacity(questions.len());

    for question in questions {
        let question_type = match &question.kind {
            QuestionKind::Known(question_type) => *question_type,
            QuestionKind::Unsupported(raw) => {
                warn!(
                    "Skipping question '{}' ({}): unsupported type '{}'",
                    question.name, locale, raw
                );
                continue;
            }
        };

        let validators = build_validators(question, locale, catalog)?;
        let kind = match question_type {
            QuestionType::TextBox => FieldKind::Text,
            QuestionType::Number => FieldKind::Integer {
                invalid: catalog
                    .error_template(locale, ErrorTemplate::InvalidNumber)?
                    .to_string(),
            },
            QuestionType::MultipleChoice => FieldKind::MultipleChoice {
                options: build_options(question),
                invalid: catalog
                    .error_template(locale, ErrorTemplate::InvalidChoice)?
                    .to_string(),
            },
            QuestionType::SingleChoice => FieldKind::SingleChoice {
                options: build_options(question),
                invalid: catalog
                    .error_template(locale, ErrorTemplate::InvalidChoice)?
                    .to_string(),
            },
        };

        fields.push(Field {
            name: question.name.clone(),
            label: question.label.clone(),
            required: question.required,
            kind,
            validators,
        });
    }

    Ok(fields)
}

/// Required first, then MaxLength.
fn build_validators(
    question: &Question,
    locale: Locale,
    catalog: &MessageCatalog,
) -> Result<Vec<Validator>, CatalogError> {
    let mut validators = Vec::new();

    if question.required {
        validators.push(Validator::Required {
            message: catalog
                .error_template(locale, ErrorTemplate::Required)?
                .to_string(),
        });
    }

    if let Some(raw) = question.max_length {
        match max_length_limit(raw) {
            Some(limit) => validators.push(Validator::MaxLength {
                limit,
                message: format_template(
                    catalog.error_template(locale, ErrorTemplate::MaxChars)?,
                    limit,
                ),
            }),
            None => warn!(
                "Ignoring maxLength {} of question '{}' ({}): not a non-negative integer",
                raw, question.name, locale
            ),
        }
    }

    Ok(validators)
}

fn build_options(question: &Question) -> Vec<ChoiceOption> {
    question
        .choices
        .iter()
        .flatten()
        .map(|choice| ChoiceOption::from_choice(choice))
        .collect()
}

fn max_length_limit(raw: f64) -> Option<usize> {
    if raw.is_finite() && raw >= 0.0 && raw.fract() == 0.0 && raw <= u32::MAX as f64 {
        Some(raw as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MessageCatalog {
        serde_json::from_str(
            r#"{
                "en": {"required": "Required.", "maxChars": "Max %d chars.", "invalidNumber": "Not a number."},
                "ar": {"required": "مطلوب", "maxChars": "الحد %d"}
            }"#,
        )
        .unwrap()
    }

    fn question(json: &str) -> Question {
        serde_json::from_str(json).expect("question should parse")
    }

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn build_one(json: &str) -> Field {
        let mut fields = build_fields(&[question(json)], Locale::ENGLISH, &catalog()).unwrap();
        assert_eq!(fields.len(), 1);
        fields.remove(0)
    }

    // ==================== Builder Tests ====================

    #[test]
    fn test_build_text_with_validator_chain_order() {
        let field = build_one(
            r#"{"type": "textBoxQuestion", "question": "Name", "name": "name", "required": true, "maxLength": 5}"#,
        );
        assert_eq!(field.kind, FieldKind::Text);
        assert_eq!(field.label, "Name");
        assert_eq!(
            field.validators,
            vec![
                Validator::Required {
                    message: "Required.".to_string()
                },
                Validator::MaxLength {
                    limit: 5,
                    message: "Max 5 chars.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_build_optional_without_limit_has_no_validators() {
        let field = build_one(
            r#"{"type": "textBoxQuestion", "question": "Note", "name": "note", "required": false}"#,
        );
        assert!(field.validators.is_empty());
    }

    #[test]
    fn test_build_number_uses_catalog_message() {
        let field = build_one(
            r#"{"type": "numberQuestion", "question": "Age", "name": "age", "required": false}"#,
        );
        assert_eq!(
            field.kind,
            FieldKind::Integer {
                invalid: "Not a number.".to_string()
            }
        );
    }

    #[test]
    fn test_build_choice_options() {
        let field = build_one(
            r#"{"type": "singleChoiceQuestion", "question": "Pick", "name": "pick", "required": true, "choices": ["a", "b"]}"#,
        );
        let options = field.options();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, "a");
        assert_eq!(options[0].display, "a");
        assert!(!options[0].selected_by_default);
        assert!(!options[1].disabled);
        assert!(!field.is_multi_valued());
    }

    #[test]
    fn test_build_skips_unsupported_type() {
        let questions = vec![
            question(r#"{"type": "sliderQuestion", "question": "S", "name": "s", "required": true}"#),
            question(r#"{"type": "textBoxQuestion", "question": "T", "name": "t", "required": false}"#),
        ];
        let fields = build_fields(&questions, Locale::ENGLISH, &catalog()).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "t");
    }

    #[test]
    fn test_build_ignores_invalid_max_length() {
        for limit in ["-1", "2.5"] {
            let field = build_one(&format!(
                r#"{{"type": "textBoxQuestion", "question": "T", "name": "t", "required": false, "maxLength": {}}}"#,
                limit
            ));
            assert!(field.validators.is_empty(), "maxLength {} should be ignored", limit);
        }
    }

    #[test]
    fn test_build_uses_locale_messages() {
        let questions = vec![question(
            r#"{"type": "textBoxQuestion", "question": "الاسم", "name": "name", "required": true, "maxLength": 10}"#,
        )];
        let fields = build_fields(&questions, Locale::ARABIC, &catalog()).unwrap();
        assert_eq!(fields[0].validators[0].message(), "مطلوب");
        assert_eq!(fields[0].validators[1].message(), "الحد 10");
    }

    #[test]
    fn test_build_fails_without_catalog_locale() {
        let catalog: MessageCatalog = serde_json::from_str(r#"{"en": {}}"#).unwrap();
        let questions = vec![question(
            r#"{"type": "textBoxQuestion", "question": "T", "name": "t", "required": true}"#,
        )];
        assert!(build_fields(&questions, Locale::ARABIC, &catalog).is_err());
    }

    // ==================== clean Tests ====================

    #[test]
    fn test_clean_short_circuits_on_first_failure() {
        let field = build_one(
            r#"{"type": "textBoxQuestion", "question": "T", "name": "t", "required": true, "maxLength": 0}"#,
        );
        assert_eq!(field.clean(&raw(&[""])), Err("Required.".to_string()));
        assert_eq!(field.clean(&raw(&["x"])), Err("Max 0 chars.".to_string()));
    }

    #[test]
    fn test_clean_text_uses_first_value() {
        let field = build_one(
            r#"{"type": "textBoxQuestion", "question": "T", "name": "t", "required": false}"#,
        );
        assert_eq!(field.clean(&raw(&["a", "b"])), Ok(CleanedValue::Text("a".to_string())));
        assert_eq!(field.clean(&[]), Ok(CleanedValue::Text(String::new())));
    }

    #[test]
    fn test_clean_integer() {
        let field = build_one(
            r#"{"type": "numberQuestion", "question": "N", "name": "n", "required": false}"#,
        );
        assert_eq!(field.clean(&raw(&[" 42 "])), Ok(CleanedValue::Integer(42)));
        assert_eq!(field.clean(&raw(&["-7"])), Ok(CleanedValue::Integer(-7)));
        assert_eq!(field.clean(&raw(&[""])), Ok(CleanedValue::Empty));
        assert_eq!(field.clean(&raw(&["4.5"])), Err("Not a number.".to_string()));
        assert_eq!(field.clean(&raw(&["abc"])), Err("Not a number.".to_string()));
        assert_eq!(field.clean(&raw(&["   "])), Err("Not a number.".to_string()));
    }

    #[test]
    fn test_clean_required_integer_rejects_blank_input() {
        let field = build_one(
            r#"{"type": "numberQuestion", "question": "N", "name": "n", "required": true}"#,
        );
        assert_eq!(field.clean(&raw(&[""])), Err("Required.".to_string()));
        assert_eq!(field.clean(&raw(&["   "])), Err("Not a number.".to_string()));
        assert_eq!(field.clean(&raw(&["\t"])), Err("Not a number.".to_string()));
        assert_eq!(field.clean(&raw(&["5"])), Ok(CleanedValue::Integer(5)));
    }

    #[test]
    fn test_clean_single_choice_rejects_unknown_value() {
        let field = build_one(
            r#"{"type": "singleChoiceQuestion", "question": "P", "name": "p", "required": false, "choices": ["a", "b"]}"#,
        );
        assert_eq!(field.clean(&raw(&["b"])), Ok(CleanedValue::Text("b".to_string())));
        assert_eq!(field.clean(&[]), Ok(CleanedValue::Text(String::new())));
        assert_eq!(
            field.clean(&raw(&["z"])),
            Err("Select a valid choice.".to_string())
        );
    }

    #[test]
    fn test_clean_multiple_choice_declared_order_and_dedup() {
        let field = build_one(
            r#"{"type": "multipleChoiceQuestion", "question": "C", "name": "c", "required": false, "choices": ["red", "green", "blue"]}"#,
        );
        assert_eq!(
            field.clean(&raw(&["blue", "red", "blue"])),
            Ok(CleanedValue::Choices(vec!["red".to_string(), "blue".to_string()]))
        );
        assert_eq!(field.clean(&[]), Ok(CleanedValue::Choices(vec![])));
        assert!(field.clean(&raw(&["purple"])).is_err());
    }

    #[test]
    fn test_clean_required_multiple_choice_needs_selection() {
        let field = build_one(
            r#"{"type": "multipleChoiceQuestion", "question": "C", "name": "c", "required": true, "choices": ["red"]}"#,
        );
        assert_eq!(field.clean(&[]), Err("Required.".to_string()));
        assert!(field.clean(&raw(&["red"])).is_ok());
    }
}
