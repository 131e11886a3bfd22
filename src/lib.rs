//! Localized questionnaire service.
//!
//! Builds an HTML form from a per-locale question schema, validates submitted
//! answers with localized messages, and stores each valid submission as a
//! JSON record.

pub mod config;
pub mod error;
pub mod form;
pub mod i18n;
pub mod persist;
pub mod render;
pub mod schema;
pub mod server;
pub mod source;
