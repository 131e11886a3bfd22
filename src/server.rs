//! HTTP surface: one questionnaire endpoint per locale.
//!
//! The first path segment selects the locale (`/ar`, `/en/...`); anything
//! unrecognized is served in the default locale. GET renders the empty form.
//! POST validates the submission and either re-renders the form with errors
//! (status 200, like the GET page) or stores the answers and renders the
//! thank-you page.

use crate::config::Config;
use crate::error::AppError;
use crate::form::{self, build_fields, FormData, Validated};
use crate::i18n::{Locale, MessageCatalog};
use crate::persist::AnswerStore;
use crate::render::{PageContext, Renderer};
use crate::schema::{verify_sources, QuestionSchema};
use crate::source::JsonSource;
use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub struct AppState {
    config: Config,
    schema: JsonSource<QuestionSchema>,
    catalog: JsonSource<MessageCatalog>,
    renderer: Renderer,
    store: AnswerStore,
}

pub type SharedState = Arc<AppState>;

/// Schema and catalog from one integrity check.
pub struct Sources {
    pub schema: Arc<QuestionSchema>,
    pub catalog: Arc<MessageCatalog>,
}

impl AppState {
    /// Build the state without touching the answers directory or the sources.
    pub fn new(config: Config) -> Result<Self, AppError> {
        Ok(Self {
            renderer: Renderer::new(config.templates_dir.as_deref())?,
            store: AnswerStore::new(&config.answers_directory),
            schema: JsonSource::new(config.questions_path(), config.cache_sources),
            catalog: JsonSource::new(config.messages_path(), config.cache_sources),
            config,
        })
    }

    /// Prepare everything a request needs and check source integrity.
    ///
    /// Any error here is a deployment problem; callers should not start
    /// serving.
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let state = Self::new(config)?;
        state.store.ensure_directory().await?;
        state.verify_sources().await?;
        Ok(state)
    }

    /// Load both sources and check that every supported locale resolves in each.
    ///
    /// # Returns
    /// The sources that passed, so callers can inspect them without a reload.
    pub async fn verify_sources(&self) -> Result<Sources, AppError> {
        let schema = self.schema.load().await?;
        let catalog = self.catalog.load().await?;
        verify_sources(&schema, &catalog)?;

        for locale in Locale::all() {
            let questions = schema.questions_for(locale)?;
            let fields = build_fields(questions, locale, &catalog)?;
            if fields.len() < questions.len() {
                warn!(
                    "Locale {} builds {} of {} questions",
                    locale,
                    fields.len(),
                    questions.len()
                );
            }
        }

        Ok(Sources { schema, catalog })
    }

    /// Fresh unbound form for `locale`, with the catalog it was built from.
    async fn load_form(&self, locale: Locale) -> Result<(Arc<MessageCatalog>, form::Form), AppError> {
        let catalog = self.catalog.load().await?;
        let schema = self.schema.load().await?;
        let fields = build_fields(schema.questions_for(locale)?, locale, &catalog)?;
        Ok((catalog, form::Form::new(fields)))
    }

    fn page_context<'a>(&'a self, locale: Locale, catalog: &'a MessageCatalog) -> PageContext<'a> {
        PageContext {
            locale,
            catalog,
            web_root: &self.config.web_root,
        }
    }
}

/// Build the questionnaire router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_form))
        .route("/*path", get(show_form).post(submit_form))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C.
pub async fn serve(state: SharedState) -> anyhow::Result<()> {
    let addr = state.config.listen_addr;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Locale named by the first path segment.
pub fn locale_from_path(path: &str) -> Locale {
    let segment = path.trim_start_matches('/').split('/').next().unwrap_or("");
    Locale::resolve(segment)
}

async fn show_form(State(state): State<SharedState>, uri: Uri) -> Result<Html<String>, AppError> {
    let locale = locale_from_path(uri.path());
    let (catalog, form) = state.load_form(locale).await?;

    let html = state
        .renderer
        .render_unbound(&form, state.page_context(locale, &catalog))?;
    Ok(Html(html))
}

async fn submit_form(
    State(state): State<SharedState>,
    uri: Uri,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let locale = locale_from_path(uri.path());
    let (catalog, form) = state.load_form(locale).await?;
    let ctx = state.page_context(locale, &catalog);

    match form.bind(pairs.into_iter().collect::<FormData>()).validate() {
        Validated::Valid(cleaned) => {
            let location = state.store.persist(&cleaned).await?;
            info!(
                "Accepted submission ({}) as {}",
                locale,
                location.path().display()
            );
            Ok(Html(state.renderer.render_thank_you(ctx)?))
        }
        Validated::Invalid(invalid) => {
            info!(
                "Rejected submission ({}): {} field error(s)",
                locale,
                invalid.errors().len()
            );
            Ok(Html(state.renderer.render_invalid(&invalid, ctx)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_from_path_first_segment() {
        assert_eq!(locale_from_path("/ar"), Locale::ARABIC);
        assert_eq!(locale_from_path("/ar/extra"), Locale::ARABIC);
        assert_eq!(locale_from_path("/en/"), Locale::ENGLISH);
    }

    #[test]
    fn test_locale_from_path_defaults() {
        assert_eq!(locale_from_path("/"), Locale::ENGLISH);
        assert_eq!(locale_from_path(""), Locale::ENGLISH);
        assert_eq!(locale_from_path("/xx"), Locale::ENGLISH);
    }
}
