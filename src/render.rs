//! HTML rendering of the questionnaire and thank-you pages.
//!
//! Templates are Handlebars, built in and optionally overridden from a
//! directory. Values are HTML-escaped except the thank-you message, which is
//! catalog-provided markup.

use crate::form::{Field, FieldKind, Form, FormData, InvalidForm};
use crate::i18n::{
    CatalogError, Locale, MessageCatalog, QUESTIONNAIRE_EXPLANATION, REQUIRED_FIELDS,
    SCALE_EXPLANATION, SUBMIT,
};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const QUESTIONNAIRE_TEMPLATE: &str = "questionnaire";
const THANK_YOU_TEMPLATE: &str = "thank_you";

const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    (
        QUESTIONNAIRE_TEMPLATE,
        include_str!("../templates/questionnaire.hbs"),
    ),
    (THANK_YOU_TEMPLATE, include_str!("../templates/thank_you.hbs")),
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<handlebars::TemplateError> for RenderError {
    fn from(err: handlebars::TemplateError) -> Self {
        RenderError::Template(Box::new(err))
    }
}

/// Page-level inputs shared by every render for one request.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub locale: Locale,
    pub catalog: &'a MessageCatalog,
    pub web_root: &'a str,
}

#[derive(Debug, Serialize)]
struct FormPage {
    lang: &'static str,
    dir: &'static str,
    explanation: String,
    required_fields: String,
    scale_explanation: String,
    submit: String,
    root: String,
    action: String,
    fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
struct FieldView {
    name: String,
    id: String,
    label: String,
    required: bool,
    widget: &'static str,
    is_choice: bool,
    numeric: bool,
    value: String,
    options: Vec<OptionView>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct OptionView {
    value: String,
    display: String,
    checked: bool,
    disabled: bool,
}

#[derive(Debug, Serialize)]
struct ThankYouPage {
    lang: &'static str,
    dir: &'static str,
    message: String,
}

pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    /// Register the page templates. Files named `questionnaire.hbs` or
    /// `thank_you.hbs` in `templates_dir` replace the built-in versions.
    pub fn new(templates_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, builtin) in BUILTIN_TEMPLATES {
            let override_path = templates_dir
                .map(|dir| dir.join(format!("{}.hbs", name)))
                .filter(|path| path.is_file());

            match override_path {
                Some(path) => {
                    let source = std::fs::read_to_string(&path).map_err(|source| {
                        RenderError::Read {
                            path: path.clone(),
                            source,
                        }
                    })?;
                    handlebars.register_template_string(name, source)?;
                    info!("Using template override {}", path.display());
                }
                None => handlebars.register_template_string(name, builtin)?,
            }
        }

        Ok(Self { handlebars })
    }

    /// Empty form, as served on GET.
    pub fn render_unbound(&self, form: &Form, ctx: PageContext<'_>) -> Result<String, RenderError> {
        let page = form_page(ctx, form.fields(), None, |_| None)?;
        Ok(self.handlebars.render(QUESTIONNAIRE_TEMPLATE, &page)?)
    }

    /// Form with the submitted values and per-field errors.
    pub fn render_invalid(
        &self,
        form: &InvalidForm,
        ctx: PageContext<'_>,
    ) -> Result<String, RenderError> {
        let page = form_page(ctx, form.fields(), Some(form.data()), |name| {
            form.error_for(name).map(str::to_string)
        })?;
        Ok(self.handlebars.render(QUESTIONNAIRE_TEMPLATE, &page)?)
    }

    pub fn render_thank_you(&self, ctx: PageContext<'_>) -> Result<String, RenderError> {
        let page = ThankYouPage {
            lang: ctx.locale.code(),
            dir: ctx.locale.direction().as_html(),
            message: ctx.catalog.thank_you(ctx.locale, ctx.web_root)?,
        };
        Ok(self.handlebars.render(THANK_YOU_TEMPLATE, &page)?)
    }
}

fn form_page(
    ctx: PageContext<'_>,
    fields: &[Field],
    data: Option<&FormData>,
    error_for: impl Fn(&str) -> Option<String>,
) -> Result<FormPage, CatalogError> {
    let catalog = ctx.catalog;
    let locale = ctx.locale;

    Ok(FormPage {
        lang: locale.code(),
        dir: locale.direction().as_html(),
        explanation: catalog.lookup(locale, QUESTIONNAIRE_EXPLANATION)?.to_string(),
        required_fields: catalog.lookup(locale, REQUIRED_FIELDS)?.to_string(),
        scale_explanation: catalog.lookup(locale, SCALE_EXPLANATION)?.to_string(),
        submit: catalog.lookup_or(locale, SUBMIT, "Submit")?.to_string(),
        root: ctx.web_root.to_string(),
        action: format!("{}{}", ctx.web_root, locale.code()),
        fields: fields
            .iter()
            .map(|field| field_view(field, data, error_for(&field.name)))
            .collect(),
    })
}

fn field_view(field: &Field, data: Option<&FormData>, error: Option<String>) -> FieldView {
    let submitted = data.map(|data| data.values(&field.name)).unwrap_or(&[]);

    let widget = match field.kind {
        FieldKind::Text => "text",
        FieldKind::Integer { .. } => "number",
        FieldKind::MultipleChoice { .. } => "checkbox",
        FieldKind::SingleChoice { .. } => "radio",
    };

    let options = field
        .options()
        .iter()
        .map(|option| OptionView {
            value: option.value.clone(),
            display: option.display.clone(),
            checked: match data {
                Some(_) => submitted.contains(&option.value),
                None => option.selected_by_default,
            },
            disabled: option.disabled,
        })
        .collect();

    FieldView {
        name: field.name.clone(),
        id: field.name.clone(),
        label: field.label.clone(),
        required: field.required,
        widget,
        is_choice: matches!(
            field.kind,
            FieldKind::MultipleChoice { .. } | FieldKind::SingleChoice { .. }
        ),
        numeric: matches!(field.kind, FieldKind::Integer { .. }),
        value: submitted.first().cloned().unwrap_or_default(),
        options,
        error,
    }
}
