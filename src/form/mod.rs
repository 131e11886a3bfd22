//! Schema-driven forms.
//!
//! A [`Form`] is built fresh per request from the locale's questions. Binding
//! request values yields a [`BoundForm`]; validating it yields either cleaned,
//! typed answers or an [`InvalidForm`] carrying one message per failed field
//! alongside the submitted values.
//!
//! ```rust,ignore
//! let fields = build_fields(schema.questions_for(locale)?, locale, &catalog)?;
//! match Form::new(fields).bind(data).validate() {
//!     Validated::Valid(cleaned) => store.persist(&cleaned).await?,
//!     Validated::Invalid(invalid) => renderer.render_invalid(&invalid, ..)?,
//! }
//! ```

mod field;
mod instance;
mod validator;

pub use field::{build_fields, ChoiceOption, Field, FieldKind};
pub use instance::{BoundForm, CleanedData, CleanedValue, Form, FormData, InvalidForm, Validated};
pub use validator::Validator;
