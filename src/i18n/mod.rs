//! Internationalization: supported locales and the message catalog.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported locales
//! - `locale`: `Locale` type and the total `resolve` from request tokens
//! - `catalog`: Per-locale UI strings and validator error templates
//!
//! # Example
//!
//! ```rust,ignore
//! use questionnaire::i18n::{ErrorTemplate, Locale};
//!
//! let locale = Locale::resolve("xx"); // falls back to English
//! let template = catalog.error_template(locale, ErrorTemplate::MaxChars)?;
//! ```

mod catalog;
mod locale;
mod registry;

pub use catalog::{
    format_template, CatalogError, ErrorTemplate, MessageCatalog, QUESTIONNAIRE_EXPLANATION,
    REQUIRED_FIELDS, REQUIRED_KEYS, SCALE_EXPLANATION, SUBMIT, THANK_YOU,
};
pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry, TextDirection};
