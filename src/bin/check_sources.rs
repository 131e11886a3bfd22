//! Check the question schema and message catalog before deploying them.
//!
//! Usage:
//!   cargo run --bin check-sources
//!
//! Reads the same environment as the server:
//! - QUESTIONNAIRE_DATA_DIR (defaults to /opt/questionnaire)
//! - QUESTIONNAIRE_TEMPLATES_DIR (optional)
//!
//! Unlike the server it never creates the answers directory.
//! Exits non-zero when the sources would stop the server from starting.

use anyhow::{Context, Result};
use questionnaire::config::Config;
use questionnaire::form::{build_fields, FieldKind};
use questionnaire::i18n::Locale;
use questionnaire::server::{AppState, Sources};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("questionnaire=warn".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let data_dir = config.data_dir.clone();
    let state = AppState::new(config).context("Templates failed to load")?;
    let Sources { schema, catalog } = state
        .verify_sources()
        .await
        .context("Sources failed the startup check")?;

    println!("Sources in {} are valid", data_dir.display());
    for locale in Locale::all() {
        let questions = schema.questions_for(locale)?;
        let fields = build_fields(questions, locale, &catalog)?;
        println!(
            "\n[{}] {}: {} question(s), {} field(s)",
            locale,
            locale.name(),
            questions.len(),
            fields.len()
        );
        for field in &fields {
            let kind = match &field.kind {
                FieldKind::Text => "text".to_string(),
                FieldKind::Integer { .. } => "number".to_string(),
                FieldKind::MultipleChoice { options, .. } => format!("checkboxes ({})", options.len()),
                FieldKind::SingleChoice { options, .. } => format!("radio ({})", options.len()),
            };
            println!(
                "  {}{} - {} [{} validator(s)]",
                field.name,
                if field.required { "*" } else { "" },
                kind,
                field.validators.len()
            );
        }
    }

    Ok(())
}
