//! Question schema: per-locale ordered question definitions.

use crate::i18n::{CatalogError, Locale, MessageCatalog};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("question schema has no entry for locale '{locale}'")]
    MissingLocale { locale: String },

    #[error("question '{name}' in locale '{locale}' is a choice question without choices")]
    MissingChoices { locale: String, name: String },

    #[error("schema locales {schema:?} do not match catalog locales {catalog:?}")]
    LocaleMismatch {
        schema: Vec<String>,
        catalog: Vec<String>,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Question types the field builder knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "textBoxQuestion")]
    TextBox,
    #[serde(rename = "numberQuestion")]
    Number,
    #[serde(rename = "multipleChoiceQuestion")]
    MultipleChoice,
    #[serde(rename = "singleChoiceQuestion")]
    SingleChoice,
}

impl QuestionType {
    pub fn has_choices(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::SingleChoice)
    }
}

/// The `type` of a question as written in the source. Unrecognized strings
/// are kept so the builder can report them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum QuestionKind {
    Known(QuestionType),
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub name: String,
    #[serde(rename = "question")]
    pub label: String,
    pub required: bool,
    #[serde(default)]
    pub max_length: Option<f64>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
}

/// Schema keyed by locale code; each locale maps to an ordered question list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct QuestionSchema {
    locales: BTreeMap<String, Vec<Question>>,
}

impl QuestionSchema {
    pub fn locale_codes(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    /// Ordered questions for a locale.
    pub fn questions_for(&self, locale: Locale) -> Result<&[Question], SchemaError> {
        let questions = self
            .locales
            .get(locale.code())
            .ok_or_else(|| SchemaError::MissingLocale {
                locale: locale.code().to_string(),
            })?;

        let missing_choices = questions.iter().find(|question| {
            matches!(question.kind, QuestionKind::Known(kind) if kind.has_choices())
                && question.choices.is_none()
        });
        if let Some(question) = missing_choices {
            return Err(SchemaError::MissingChoices {
                locale: locale.code().to_string(),
                name: question.name.clone(),
            });
        }

        Ok(questions)
    }
}

/// Startup integrity check over both sources.
///
/// Every supported locale must resolve in the schema and in the catalog
/// (with all required keys), and both sources must list the same locales.
pub fn verify_sources(schema: &QuestionSchema, catalog: &MessageCatalog) -> Result<(), SchemaError> {
    for locale in Locale::all() {
        schema.questions_for(locale)?;
        catalog.verify_locale(locale)?;
    }

    let schema_codes: Vec<String> = schema.locale_codes().map(str::to_string).collect();
    let catalog_codes: Vec<String> = catalog.locale_codes().map(str::to_string).collect();
    if schema_codes != catalog_codes {
        return Err(SchemaError::LocaleMismatch {
            schema: schema_codes,
            catalog: catalog_codes,
        });
    }

    Ok(())
}
