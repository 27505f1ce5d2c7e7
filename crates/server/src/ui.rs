//! Single-page catalog UI.
//!
//! One HTML route (`GET /`) rendered through Tera. The page's script talks to
//! the JSON API and re-renders from each response; the only server-provided
//! value is the API base URL, which defaults to the page's own origin.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use tera::{Context, Tera};
use tracing::warn;

#[derive(Clone)]
pub struct UiState {
    templates: Arc<Tera>,
    api_base_url: String,
}

/// Initialize the Tera engine, falling back to the embedded page template so
/// the binary works from any working directory.
fn init_templates() -> Arc<Tera> {
    let mut tera = match Tera::new("templates/ui/**/*") {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "failed to load UI templates from filesystem, using embedded template");
            Tera::default()
        }
    };

    if !tera.get_template_names().any(|name| name == "index.html") {
        tera.add_raw_template("index.html", include_str!("../../../templates/ui/index.html")).ok();
    }

    Arc::new(tera)
}

pub fn router(public_base_url: Option<String>) -> Router {
    let state = UiState {
        templates: init_templates(),
        api_base_url: public_base_url.unwrap_or_default(),
    };

    Router::new().route("/", get(index_page)).with_state(state)
}

async fn index_page(
    State(state): State<UiState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let mut context = Context::new();
    context.insert("base_url", &state.api_base_url);

    let html = state.templates.render("index.html", &context).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("<h1>Template Error</h1><pre>{:?}</pre>", e)),
        )
    })?;

    Ok(Html(html))
}
