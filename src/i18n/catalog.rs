//! Message catalog: per-locale UI strings and validator error templates.

use crate::i18n::Locale;
use regex::{NoExpand, Regex};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::OnceLock;
use thiserror::Error;

pub const QUESTIONNAIRE_EXPLANATION: &str = "questionnaireExplanation";
pub const REQUIRED_FIELDS: &str = "requiredFields";
pub const SCALE_EXPLANATION: &str = "scaleExplanation";
pub const THANK_YOU: &str = "thankYou";
pub const SUBMIT: &str = "submit";

/// Keys every supported locale must define.
pub const REQUIRED_KEYS: [&str; 6] = [
    "required",
    "maxChars",
    QUESTIONNAIRE_EXPLANATION,
    REQUIRED_FIELDS,
    SCALE_EXPLANATION,
    THANK_YOU,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("message catalog has no entry for locale '{locale}'")]
    MissingLocale { locale: String },

    #[error("message catalog for locale '{locale}' has no key '{key}'")]
    MissingKey { locale: String, key: String },
}

/// Error messages a field can produce, each backed by a catalog key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTemplate {
    Required,
    MaxChars,
    InvalidNumber,
    InvalidChoice,
}

impl ErrorTemplate {
    pub fn key(&self) -> &'static str {
        match self {
            ErrorTemplate::Required => "required",
            ErrorTemplate::MaxChars => "maxChars",
            ErrorTemplate::InvalidNumber => "invalidNumber",
            ErrorTemplate::InvalidChoice => "invalidChoice",
        }
    }

    /// Text used when an optional key is absent from the catalog.
    fn fallback(&self) -> Option<&'static str> {
        match self {
            ErrorTemplate::Required | ErrorTemplate::MaxChars => None,
            ErrorTemplate::InvalidNumber => Some("Enter a whole number."),
            ErrorTemplate::InvalidChoice => Some("Select a valid choice."),
        }
    }
}

/// Catalog keyed first by locale code, then by message key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    locales: BTreeMap<String, BTreeMap<String, String>>,
}

impl MessageCatalog {
    /// Locale codes present in the catalog source, supported or not.
    pub fn locale_codes(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    /// Look up a message for a locale.
    ///
    /// # Arguments
    /// * `locale` - Locale whose messages are searched
    /// * `key` - Message key (e.g., "requiredFields")
    ///
    /// # Returns
    /// The raw message text, or a `CatalogError` naming the missing locale or key.
    pub fn lookup(&self, locale: Locale, key: &str) -> Result<&str, CatalogError> {
        self.messages(locale)?
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::MissingKey {
                locale: locale.code().to_string(),
                key: key.to_string(),
            })
    }

    /// Like `lookup`, but a missing key yields `fallback`. A missing locale
    /// is still an error.
    pub fn lookup_or<'a>(
        &'a self,
        locale: Locale,
        key: &str,
        fallback: &'a str,
    ) -> Result<&'a str, CatalogError> {
        match self.lookup(locale, key) {
            Err(CatalogError::MissingKey { .. }) => Ok(fallback),
            result => result,
        }
    }

    /// Unformatted error template for a validator or coercion failure.
    ///
    /// # Returns
    /// The catalog text for `kind`. Optional templates fall back to built-in
    /// English text when the key is absent; required ones are an error.
    pub fn error_template(&self, locale: Locale, kind: ErrorTemplate) -> Result<&str, CatalogError> {
        match kind.fallback() {
            Some(fallback) => self.lookup_or(locale, kind.key(), fallback),
            None => self.lookup(locale, kind.key()),
        }
    }

    /// The thank-you text with its link target filled in.
    pub fn thank_you(&self, locale: Locale, link: &str) -> Result<String, CatalogError> {
        Ok(format_template(self.lookup(locale, THANK_YOU)?, link))
    }

    /// Check that a locale has every required key.
    pub fn verify_locale(&self, locale: Locale) -> Result<(), CatalogError> {
        for key in REQUIRED_KEYS {
            self.lookup(locale, key)?;
        }
        Ok(())
    }

    fn messages(&self, locale: Locale) -> Result<&BTreeMap<String, String>, CatalogError> {
        self.locales
            .get(locale.code())
            .ok_or_else(|| CatalogError::MissingLocale {
                locale: locale.code().to_string(),
            })
    }
}

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Substitute the first printf-style placeholder (`%d`, `%s`, `%v`) with `arg`.
///
/// # Arguments
/// * `template` - Message text, possibly without any placeholder
/// * `arg` - Value inserted verbatim; `$` and `%` in it are not interpreted
///
/// # Returns
/// The formatted message. Later placeholders are left untouched.
pub fn format_template(template: &str, arg: impl Display) -> String {
    let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"%[dsv]").unwrap());
    regex
        .replacen(template, 1, NoExpand(&arg.to_string()))
        .into_owned()
}
